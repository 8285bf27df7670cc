use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

use crate::domain::UndecidedPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub attendance: AttendanceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// How attendance commits treat members nobody marked.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AttendanceConfig {
    #[serde(default)]
    pub undecided: UndecidedPolicy,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite://atelier.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("attendance.undecided", "absent")?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with ATELIER__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("ATELIER").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://atelier.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            attendance: AttendanceConfig::default(),
        }
    }
}
