use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env_or("APP_PORT", 3000);
        let db_max_connections = env_or("DB_MAX_CONNECTIONS", 10);
        let db_acquire_timeout_secs = env_or("DB_ACQUIRE_TIMEOUT_SECS", 5);
        Ok(Self {
            port,
            database_url,
            host,
            db_max_connections,
            db_acquire_timeout_secs,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
