//! Core Vocabify library (config, providers, Error Hunt domain).

pub mod config;
pub mod hunt;
pub mod prompts;
pub mod providers;
