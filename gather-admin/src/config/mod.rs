//! Configuration for the admin binary, read from environment variables.

use std::env;

use tracing::{info, warn};

use crate::errors::AdminError;

/// Default for whether the demo dataset is loaded after migrations.
const DEFAULT_SEED_DEMO_DATA: bool = true;

/// Runtime configuration for a single admin run.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Whether to load the demo dataset after migrating.
    pub seed_demo_data: bool,
}

impl AdminConfig {
    /// Reads the configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection string (required)
    /// - `SEED_DEMO_DATA`: whether to load the demo dataset, `true` or
    ///   `false` (default: `true`)
    pub fn from_env() -> Result<Self, AdminError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AdminError::config("DATABASE_URL is not set"))?;

        let seed_demo_data = match env::var("SEED_DEMO_DATA") {
            Ok(value) => match value.to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    warn!("Invalid SEED_DEMO_DATA, defaulting to 'true'");
                    DEFAULT_SEED_DEMO_DATA
                }
            },
            Err(_) => DEFAULT_SEED_DEMO_DATA,
        };

        info!(
            seed_demo_data = seed_demo_data,
            "Admin configuration loaded"
        );

        Ok(Self {
            database_url,
            seed_demo_data,
        })
    }
}
