pub mod lognormal;
pub mod summary;
