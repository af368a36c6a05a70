pub mod engine;
pub mod investment;
