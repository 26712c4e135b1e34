use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Base URL of the personalized-ranking service. `None` means every
    /// search ranks brands by popularity.
    pub recsys_url: Option<String>,
    pub recsys_timeout_ms: u64,
    pub store_logo_url: String,
    pub rate_limit_per_minute: usize,
    pub catalog_refresh_cron: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("recsys_url", &self.recsys_url)
            .field("recsys_timeout_ms", &self.recsys_timeout_ms)
            .field("store_logo_url", &self.store_logo_url)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("catalog_refresh_cron", &self.catalog_refresh_cron)
            .finish()
    }
}
