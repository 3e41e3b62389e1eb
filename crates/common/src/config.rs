//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Chat platform configuration.
    pub chat: ChatConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Chat platform configuration.
///
/// Loaded once at startup and passed to handlers at construction time;
/// secrets are never held in mutable module state.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the chat platform API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Shared-secret verification token expected on every inbound webhook.
    pub verification_token: String,
    /// Bearer credential for user-facing calls (dialogs, file info).
    pub client_secret: String,
    /// Bearer credential for bot-authored messages.
    pub bot_secret: String,
    /// Channel used for REST-created polls that do not name one.
    #[serde(default)]
    pub default_channel: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

fn default_api_base() -> String {
    "https://slack.com/api".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `POLLCAST_ENV`)
    /// 3. Environment variables with `POLLCAST` prefix
    pub fn load() -> Result<Self, crate::AppError> {
        // Pick up a local .env if present.
        dotenvy::dotenv().ok();

        let env = std::env::var("POLLCAST_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("POLLCAST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, crate::AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("POLLCAST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_missing_fields() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]

                [database]
                url = "postgres://localhost/pollcast"

                [chat]
                verification_token = "tok"
                client_secret = "client"
                bot_secret = "bot"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.chat.api_base, "https://slack.com/api");
        assert!(config.chat.default_channel.is_empty());
    }
}
