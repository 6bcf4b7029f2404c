use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

/// Service configuration, read from the process environment.
///
/// Recognized variables: `HOST`, `PORT`, `DEBUG`, `STORAGE_ROOT`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub storage_root: PathBuf,
}

impl ApiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8000_i64)?
            .set_default("debug", true)?
            .set_default("storage_root", "storage/databases")?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
