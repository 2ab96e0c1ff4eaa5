use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};
use std::time::Duration;

use crate::settings::AppConfig;

const INITIAL_BACKOFF_SECS: u64 = 2;
const MAX_BACKOFF_SECS: u64 = 30;

pub async fn create_pool(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    let max_retries = config.connect_retries;
    let mut retry_count = 0;
    let mut wait_seconds = INITIAL_BACKOFF_SECS;

    loop {
        match PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => {
                info!("Database connection established.");
                return Ok(pool);
            }
            Err(e) if retry_count < max_retries => {
                retry_count += 1;
                warn!(
                    "Failed to connect to database (attempt {}/{}): {}. Retrying in {}s...",
                    retry_count, max_retries, e, wait_seconds);

                tokio::time::sleep(Duration::from_secs(wait_seconds)).await;

                wait_seconds = next_backoff(wait_seconds);
            }
            Err(e) => return Err(e),
        }
    }
}

fn next_backoff(current: u64) -> u64 {
    current.saturating_mul(2).min(MAX_BACKOFF_SECS)
}
