pub mod crash;
pub mod effective;
pub mod gbm;
