use std::{env, path::PathBuf};

use tracing::{info, warn};

use crate::error::ConfigError;

pub struct Config {
    pub bind_addr: String,
    pub database_path: String,
    pub seed_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:3030")?,
            database_path: try_load("DATABASE_PATH", "dealerships.db")?,
            seed_dir: try_load("SEED_DIR", "data")?.into(),
        })
    }
}

fn try_load(key: &'static str, default: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError {
            key,
            reason: "value is empty".into(),
        }),
        Ok(value) => Ok(value),
        Err(env::VarError::NotPresent) => {
            info!("{key} not set, using default: {default}");
            Ok(default.to_string())
        }
        Err(env::VarError::NotUnicode(_)) => {
            warn!("{key} is not valid unicode");
            Err(ConfigError {
                key,
                reason: "value is not valid unicode".into(),
            })
        }
    }
}
