use std::env;

use anyhow::Context;
use portfolio_schema::{
    db::postgres::create_pool,
    repositories::sqlx_repo::SqlxRepo,
    schema::schema_ddl,
    settings::AppConfig,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match env::args().nth(1).as_deref() {
        Some("ddl") => {
            print!("{}", schema_ddl());
            Ok(())
        }
        None | Some("init") => init_schema().await,
        Some(other) => {
            tracing::error!("Unknown command: {}", other);
            eprintln!("usage: portfolio_schema [init|ddl]");
            std::process::exit(2);
        }
    }
}

async fn init_schema() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if config.is_production() {
        tracing::warn!("Applying schema to a production database");
    }

    let pool = create_pool(&config)
        .await
        .context("Failed to create database connection pool")?;

    let repo = SqlxRepo::new(pool);
    repo.check_connection().await?;
    repo.init_schema().await?;

    tracing::info!("✅ {} schema is ready", config.name);
    Ok(())
}
