//! Configuration management for boxstash.
//!
//! Configuration loading and validation using figment, supporting TOML
//! config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default application directory name (config dir).
const APP_DIR_NAME: &str = "boxstash";

/// Default data root, relative to the working directory.
const DEFAULT_DATA_ROOT: &str = "data";

/// Default bind address for the HTTP server.
const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Default maximum upload size in bytes (16 MiB).
const DEFAULT_UPLOAD_LIMIT: usize = 16 * 1024 * 1024;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `BOXSTASH_`)
/// 2. TOML config file at `~/.config/boxstash/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Upload configuration.
    pub upload: UploadConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:5000`.
    pub bind: String,
    /// Public base URL used in generated QR codes, e.g.
    /// `https://boxes.example.com`. When unset, the request `Host` header
    /// is used with an `http://` scheme.
    pub public: Option<String>,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root data directory holding `boxes/` and `photos/`.
    /// Defaults to `./data`. Override with `BOXSTASH_STORAGE_ROOT`.
    pub root: Option<PathBuf>,
}

/// Upload configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum request body size for photo uploads, in bytes.
    pub limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            public: None,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_UPLOAD_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `BOXSTASH_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("BOXSTASH_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.upload.limit == 0 {
            return Err(Error::ConfigValidation {
                message: "upload limit must be greater than 0".to_string(),
            });
        }

        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(Error::ConfigValidation {
                message: format!("bind address is not valid: {}", self.server.bind),
            });
        }

        Ok(())
    }

    /// Get the data root directory, resolving the default if not set.
    #[must_use]
    pub fn data_root(&self) -> PathBuf {
        self.storage
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_ROOT))
    }

    /// Parse the configured bind address.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the address cannot be parsed.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|_| Error::ConfigValidation {
                message: format!("bind address is not valid: {}", self.server.bind),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert!(config.server.public.is_none());
        assert!(config.storage.root.is_none());
        assert_eq!(config.upload.limit, 16 * 1024 * 1024);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_upload_limit() {
        let mut config = Config::default();
        config.upload.limit = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("upload limit"));
    }

    #[test]
    fn test_validate_bad_bind_address() {
        let mut config = Config::default();
        config.server.bind = "not-an-address".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("bind address"));
    }

    #[test]
    fn test_data_root_default() {
        let config = Config::default();
        assert_eq!(config.data_root(), PathBuf::from("data"));
    }

    #[test]
    fn test_data_root_custom() {
        let mut config = Config::default();
        config.storage.root = Some(PathBuf::from("/var/lib/boxstash"));
        assert_eq!(config.data_root(), PathBuf::from("/var/lib/boxstash"));
    }

    #[test]
    fn test_bind_addr_parses() {
        let config = Config::default();
        let addr = config.bind_addr().unwrap();
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("boxstash"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_toml_file_overrides_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("config.toml");
        std::fs::write(
            &file,
            "[server]\nbind = \"0.0.0.0:9999\"\n\n[storage]\nroot = \"/srv/boxes\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(file)).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9999");
        assert_eq!(config.storage.root, Some(PathBuf::from("/srv/boxes")));
        // Sections the file does not mention keep their defaults
        assert_eq!(config.upload.limit, 16 * 1024 * 1024);
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), Config::default());
    }

    #[test]
    fn test_server_config_serialize() {
        let server = ServerConfig::default();
        let json = serde_json::to_string(&server).unwrap();
        assert!(json.contains("bind"));
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"root": "/data"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.root, Some(PathBuf::from("/data")));
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        let cloned = config.clone();
        assert_eq!(config, cloned);
    }
}
