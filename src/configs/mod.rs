use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

use crate::{api::error, constants::Env};

fn pool_options(env: &Env) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(env.db_max_connections)
        .acquire_timeout(Duration::from_secs(env.db_acquire_timeout))
        .acquire_slow_threshold(Duration::from_secs(3))
}

/// Connects eagerly and brings the schema up to date.
pub async fn connect_database(env: &Env) -> Result<PgPool, error::SystemError> {
    let pool = pool_options(env).min_connections(1).connect(&env.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

/// Pool that only dials the database when a request asks for a connection.
pub fn lazy_database(env: &Env) -> Result<PgPool, error::SystemError> {
    let pool = pool_options(env).connect_lazy(&env.database_url)?;
    Ok(pool)
}

/// A failed startup connection is not fatal: requests that need the database
/// fail individually until it becomes reachable.
pub async fn open_database(env: &Env) -> Result<PgPool, error::SystemError> {
    match connect_database(env).await {
        Ok(pool) => {
            log::info!("Database connected");
            Ok(pool)
        }
        Err(e) => {
            log::error!("Database connection error: {}", e);
            log::warn!("Continuing without a live database connection");
            lazy_database(env)
        }
    }
}

pub async fn ensure_upload_dir(upload_dir: &str) -> Result<(), error::SystemError> {
    tokio::fs::create_dir_all(upload_dir).await?;
    Ok(())
}
