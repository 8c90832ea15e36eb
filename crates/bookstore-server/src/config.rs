use std::time::Duration;

use crate::error::Result;
pub use clap::Parser;

#[derive(Debug, Clone, clap::Parser)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 8080,
        env = "BOOKSTORE_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "BOOKSTORE_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "BOOKSTORE_DATABASE_URL",
        default_value = "sqlite://bookstore.db",
        help = "Database URL e.g. sqlite://file.db, database file is created if missing"
    )]
    pub database_url: String,

    #[arg(
        long,
        env = "BOOKSTORE_DB_MAX_CONNECTIONS",
        default_value_t = 25,
        help = "Maximum number of open database connections"
    )]
    pub db_max_connections: u32,

    #[arg(
        long,
        env = "BOOKSTORE_DB_MAX_LIFETIME",
        default_value = "5m",
        help = "Maximum lifetime of database connection in human friendly format (e.g. 5m, 1h, 30s)",
        value_parser = humantime::parse_duration
    )]
    pub db_max_lifetime: Duration,

    #[arg(long, env = "BOOKSTORE_NO_CORS", help = "Disable CORS")]
    pub no_cors: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn pool_settings(&self) -> bookstore_dal::PoolSettings {
        bookstore_dal::PoolSettings {
            max_connections: self.db_max_connections,
            max_lifetime: self.db_max_lifetime,
        }
    }
}
