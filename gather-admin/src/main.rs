//! Gather Admin Entry Point
//!
//! Prepares a PostgreSQL database for the gather service: applies the
//! schema migrations and, unless disabled, loads the demo dataset.

use std::env;
use std::sync::Arc;

use dotenv::dotenv;
use gather_admin::config::AdminConfig;
use gather_admin::errors::AdminError;
use gather_admin::seed::seed_demo_data;
use gather_core::Argon2PasswordHasher;
use gather_repository::{
    PostgresEventRepository, PostgresFriendshipRepository, PostgresIdentityRepository, MIGRATOR,
};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging
fn init_tracing() -> Result<(), AdminError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("gather_admin=info,gather_repository=info,gather_core=info")
    });

    let json_logs = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "gather-admin",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON formatting"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "gather-admin",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console formatting"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AdminError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting gather admin");

    let config = match AdminConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(e);
        }
    };

    let pool = match sqlx::PgPool::connect(&config.database_url).await {
        Ok(pool) => {
            info!("Database connection established");
            pool
        }
        Err(e) => {
            error!(error = %e, "Failed to connect to the database");
            return Err(e.into());
        }
    };

    if let Err(e) = MIGRATOR.run(&pool).await {
        error!(error = %e, "Failed to apply migrations");
        return Err(e.into());
    }
    info!("Migrations applied");

    if config.seed_demo_data {
        let identities = Arc::new(PostgresIdentityRepository::new(pool.clone()));
        let friendships = Arc::new(PostgresFriendshipRepository::new(pool.clone()));
        let events = Arc::new(PostgresEventRepository::new(pool));

        if let Err(e) = seed_demo_data(identities, friendships, events, &Argon2PasswordHasher).await
        {
            error!(error = %e, "Failed to seed demo data");
            return Err(e);
        }
    } else {
        info!("Demo data seeding disabled");
    }

    info!("Gather admin finished");
    Ok(())
}
