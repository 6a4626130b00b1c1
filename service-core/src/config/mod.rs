//! Listener settings shared by every service binary.

use crate::error::AppError;
use config::{Config as Loader, Environment as EnvSource, File};
use serde::Deserialize;

/// Where the HTTP listener binds. Service-specific settings flatten this into
/// their own config struct.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load from an optional `configuration` file, overridden by
    /// `APP__`-prefixed environment variables (`APP__HOST`, `APP__PORT`).
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let loaded = Loader::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(EnvSource::with_prefix("APP").separator("__"))
            .build()?;

        Ok(loaded.try_deserialize()?)
    }

    /// Socket address string for the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_joins_host_and_port() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 9000,
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
    }
}
