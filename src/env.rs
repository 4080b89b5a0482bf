//! Environment-variable configuration for the oracle connection.

use std::env;
use tracing::warn;

pub const API_KEY_VAR: &str = "ORACLE_API_KEY";
pub const MODEL_VAR: &str = "ORACLE_MODEL";
pub const RATE_LIMIT_VAR: &str = "RATE_LIMIT";

const DEFAULT_RATE_LIMIT: usize = 60;

/// Oracle settings read from the environment.
#[derive(Debug, Clone)]
pub struct OracleEnv {
    pub api_key: Option<String>,
    pub model: Option<String>,
    /// Oracle calls allowed per rolling minute.
    pub rate_limit: usize,
}

impl OracleEnv {
    pub fn load() -> Self {
        let rate_limit = match env::var(RATE_LIMIT_VAR) {
            Ok(raw) => match raw.parse::<usize>() {
                Ok(value) if value > 0 => value,
                _ => {
                    warn!(raw = %raw, "ignoring invalid {RATE_LIMIT_VAR}, using default");
                    DEFAULT_RATE_LIMIT
                }
            },
            Err(_) => DEFAULT_RATE_LIMIT,
        };

        Self {
            api_key: env::var(API_KEY_VAR).ok().filter(|key| !key.is_empty()),
            model: env::var(MODEL_VAR).ok().filter(|model| !model.is_empty()),
            rate_limit,
        }
    }
}
