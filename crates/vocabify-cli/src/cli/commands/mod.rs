pub mod config;
pub mod hunt;
