pub mod alerts;
pub mod analyzers;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod registry;
pub mod utils;
pub mod writers;

pub use error::{ProcessingError, Result};
