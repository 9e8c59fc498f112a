pub mod config;
pub mod error;
pub mod models;
pub mod prompt;
pub mod services;
pub mod utils;

pub use error::{ApiError, Error, Result, TranscriptServiceError};
pub use models::*;
