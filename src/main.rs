//! Server entrypoint.
//!
//! Fail-fast bootstrap: if the task store cannot be opened, log the error
//! with a credential-masked connection string plus actionable hints, then
//! exit non-zero.

use tracing_subscriber::EnvFilter;

use todolist::api;
use todolist::config::{redact_credentials, Config};
use todolist::store::{StoreError, TaskStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let store = match TaskStore::connect(&config.database_url).await {
        Ok(store) => {
            tracing::info!(
                "Task store ready: {}",
                redact_credentials(&config.database_url)
            );
            store
        }
        Err(err) => {
            tracing::error!("Task store connection failed: {err}");
            tracing::error!(
                "Connection string: {}",
                redact_credentials(&config.database_url)
            );
            if is_cannot_open(&err) {
                tracing::error!("Possible issues:");
                tracing::error!("  1. The database path does not exist or its parent directory is missing");
                tracing::error!("  2. The process lacks write permission on the database file");
                tracing::error!("  3. DATABASE_URL is malformed (expected a path, sqlite:// URL, or :memory:)");
            }
            std::process::exit(1);
        }
    };

    if let Err(err) = api::serve(config, store).await {
        tracing::error!("Server error: {err}");
        std::process::exit(1);
    }
}

/// True for the unreachable-database class of failures that deserve hints.
fn is_cannot_open(err: &StoreError) -> bool {
    matches!(
        err,
        StoreError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::CannotOpen
    )
}
