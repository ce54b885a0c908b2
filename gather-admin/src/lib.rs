//! # Gather Admin
//!
//! Database administration binary for the gather service. It applies the
//! schema migrations and loads the idempotent demo dataset used by local
//! development environments.

pub mod config;
pub mod errors;
pub mod seed;

pub use config::AdminConfig;
pub use errors::AdminError;
pub use seed::{seed_demo_data, SeedSummary};
