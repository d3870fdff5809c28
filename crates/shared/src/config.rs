//! Application configuration management.

use serde::Deserialize;

use crate::types::pagination::MAX_PER_PAGE;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Billing and ledger read settings.
    #[serde(default)]
    pub billing: BillingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration as read from config sources.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Role name that grants access to the admin adjustment path.
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_admin_role() -> String {
    "admin".to_string()
}

/// Billing and ledger read settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Number of entries in the "recent" windows (wallet summary, recent orders).
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u64,
    /// Upper bound on page size for paged reads.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_recent_limit() -> u64 {
    10
}

fn default_max_page_size() -> u32 {
    MAX_PER_PAGE
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("HEARTS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
