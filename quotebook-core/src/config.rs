use config::{Config, ConfigBuilder, ConfigError, File};
use serde::Deserialize;

/// Environment variable holding the Postgres connection string.
pub const DATABASE_CONN_ENV: &str = "DATABASE_CONN";

/// Environment variable overriding the HTTP listen port.
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct QuotebookConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
            run_migrations: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    /// Send `Access-Control-Allow-Origin: *` on every response.
    pub cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors: true,
        }
    }
}

impl HttpConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl QuotebookConfig {
    /// Load from an optional TOML file, then apply `DATABASE_CONN` and `PORT`.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        Self::load_with(
            path,
            std::env::var(DATABASE_CONN_ENV).ok(),
            std::env::var(PORT_ENV).ok(),
        )
    }

    pub fn load_with(
        path: &str,
        database_url: Option<String>,
        port: Option<String>,
    ) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::with_name(path).required(false));
        Self::finish(builder, database_url, port)
    }

    fn finish(
        builder: ConfigBuilder<config::builder::DefaultState>,
        database_url: Option<String>,
        port: Option<String>,
    ) -> Result<Self, ConfigError> {
        builder
            .set_override_option("database.url", database_url)?
            .set_override_option("http.port", port)?
            .build()?
            .try_deserialize()
    }
}
