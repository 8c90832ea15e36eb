pub mod book;
pub mod error;

use std::{str::FromStr as _, time::Duration};

pub use error::Error;
use sqlx::{
    Connection as _,
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type Pool = sqlx::Pool<ChosenDB>;

/// Number of records returned by the "top" listings (new, featured, discounted).
pub const TOP_LIMIT: i64 = 5;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub max_lifetime: Duration,
}

/// Connection options for `database_url`, with the `REGEXP` function used by search.
pub fn connect_options(database_url: &str) -> Result<SqliteConnectOptions> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .with_regexp();
    Ok(options)
}

pub async fn new_pool(database_url: &str, settings: &PoolSettings) -> Result<Pool> {
    let options = connect_options(database_url)?;
    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .max_lifetime(settings.max_lifetime)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub async fn migrate(pool: &Pool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Checks that a connection can be taken from the pool and that the store answers.
pub async fn ping(pool: &Pool) -> Result<()> {
    let mut conn = pool.acquire().await?;
    conn.ping().await?;
    Ok(())
}
