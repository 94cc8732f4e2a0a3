// config.rs
use crate::errors::PipelineError;
use std::env;

pub const DEFAULT_API_HOST: &str = "realty-in-us.p.rapidapi.com";
pub const DEFAULT_DB_PATH: &str = "realty.sqlite3";

/// Everything the pipeline needs from the environment, resolved once at
/// startup. Core logic never reads env vars itself; it gets this injected.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_host: String,
    pub db_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, PipelineError> {
        let api_key = env::var("RAPIDAPI_KEY").map_err(|_| {
            PipelineError::Config("RAPIDAPI_KEY environment variable not set".into())
        })?;

        let api_host = env::var("RAPIDAPI_HOST").unwrap_or_else(|_| DEFAULT_API_HOST.to_string());

        let db_path = match env::var("DB_PATH") {
            Ok(path) => {
                eprintln!("Using configured database at {path}");
                path
            }
            Err(_) => {
                eprintln!("DB_PATH not set, using local database {DEFAULT_DB_PATH}");
                DEFAULT_DB_PATH.to_string()
            }
        };

        Ok(Self {
            api_key,
            api_host,
            db_path,
        })
    }
}
