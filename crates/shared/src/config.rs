//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Telegram integration configuration.
    pub telegram: TelegramConfig,
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

/// Telegram integration configuration.
///
/// The bot token is the HMAC key for init-data verification; `admin_ids`
/// lists Telegram ids that are promoted to the admin role on first contact.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token used to verify Mini App init data.
    pub bot_token: String,
    /// Comma-separated Telegram ids that get the admin role automatically.
    #[serde(default)]
    pub admin_ids: String,
    /// Maximum accepted age of init data, in seconds.
    #[serde(default = "default_auth_ttl")]
    pub auth_ttl_secs: i64,
}

fn default_auth_ttl() -> i64 {
    86400 // 24 hours
}

impl TelegramConfig {
    /// Parses `admin_ids` into a list, ignoring empty segments.
    #[must_use]
    pub fn admin_ids_list(&self) -> Vec<i64> {
        self.admin_ids
            .split(',')
            .filter_map(|part| part.trim().parse().ok())
            .collect()
    }
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
            .add_source(config::Environment::with_prefix("KASSA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telegram(admin_ids: &str) -> TelegramConfig {
        TelegramConfig {
            bot_token: "token".to_string(),
            admin_ids: admin_ids.to_string(),
            auth_ttl_secs: default_auth_ttl(),
        }
    }

    #[test]
    fn test_admin_ids_parsing() {
        assert_eq!(telegram("1,2,3").admin_ids_list(), vec![1, 2, 3]);
        assert_eq!(telegram(" 42 , 7 ").admin_ids_list(), vec![42, 7]);
        assert!(telegram("").admin_ids_list().is_empty());
        assert_eq!(telegram("1,abc,2").admin_ids_list(), vec![1, 2]);
    }
}
