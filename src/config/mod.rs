pub mod settings;

pub use settings::Config;

use crate::error::NewsError;
use std::sync::Arc;

/// Loads, validates and returns the application configuration as an `Arc<Config>`.
/// A `.env` file in the working directory is honoured when present.
pub fn load_config() -> Result<Arc<Config>, NewsError> {
    load_env();
    Ok(Arc::new(Config::from_env().validate()?))
}

/// Loads a `.env` file into the process environment if one is present.
pub fn load_env() {
    dotenv::dotenv().ok(); // Load .env file if present, ignore errors
}
