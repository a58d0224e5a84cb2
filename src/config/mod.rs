// Configuration module entry point
// Layered startup configuration and the shared application state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::StartupError;

// Re-export public types
pub use state::AppState;
pub use types::{AccessLogFormat, Config, LogLevel, LoggingConfig};

/// Config file looked up when `PRODUCTS_CONFIG` is not set (extension optional)
pub const DEFAULT_CONFIG_FILE: &str = "config";

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "PRODUCTS_CONFIG";

/// Prefix for per-key environment overrides, e.g. `PRODUCTS__SERVER__PORT`
pub const ENV_PREFIX: &str = "PRODUCTS";

/// Conventional port variable set by container platforms
pub const PORT_ENV: &str = "PORT";

impl Config {
    /// Load configuration from the file named by `PRODUCTS_CONFIG` (or `config.toml`),
    /// environment overrides, and `PORT`
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&config_path, std::env::var(PORT_ENV).ok())
    }

    /// Load configuration from specified file path (without extension).
    /// A missing file is not an error; defaults apply.
    pub fn load_from(
        config_path: &str,
        port_override: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        Self::load_layers(config_path, None, port_override)
    }

    /// Build the layered configuration. `env` replaces the process
    /// environment as the `PRODUCTS__*` source when given.
    fn load_layers(
        config_path: &str,
        env: Option<config::Map<String, String>>,
        port_override: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 30)?
            .set_default("http.server_name", "products-service")?
            .set_override_option("server.port", port_override)?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that deserialize fine but cannot be used at startup
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.workers == Some(0) {
            return Err(config::ConfigError::Message(
                "server.workers must be at least 1".to_string(),
            ));
        }
        if self.performance.connection_timeout == 0 {
            return Err(config::ConfigError::Message(
                "performance.connection_timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| StartupError::Address { addr, source })
    }
}
