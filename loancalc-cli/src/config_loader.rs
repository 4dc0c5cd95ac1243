//! Persistent CLI Configuration Loader
//!
//! Configuration is loaded from `~/.config/loancalc/config.toml` on Linux,
//! `~/Library/Application Support/loancalc/config.toml` on macOS or
//! `%APPDATA%\loancalc\config.toml` on Windows. Command-line flags win over
//! the file, and the file wins over `LOANCALC_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

use loancalc::config::ControllerConfig;
use loancalc::form::FormLayout;
use loancalc::schedule::WireFormat;

/// CLI Configuration structure loaded from TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliConfig {
    /// Calculation server, e.g. "http://localhost:8080".
    pub base_url: Option<String>,
    /// "basic" or "with-installments".
    pub layout: Option<FormLayout>,
    /// Send Portuguese field names.
    pub legacy_wire: Option<bool>,
    /// Request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Enable file logging by default.
    pub enable_logging: Option<bool>,
}

/// Command-line overrides, already parsed by clap.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub legacy_wire: bool,
    pub installments_field: bool,
}

impl CliConfig {
    /// Returns the platform-specific configuration directory.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("loancalc"))
    }

    /// Returns the full path to the config file.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Attempts to load configuration from the default config file location.
    /// Returns `CliConfig::default()` if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            debug!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            debug!("No config file found at {:?}", path);
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::parse(&content) {
                Ok(config) => {
                    debug!("Loaded configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Layers this file and the command-line overrides on top of `base`.
    pub fn apply(&self, base: ControllerConfig, overrides: &Overrides) -> ControllerConfig {
        let mut config = base;

        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(layout) = self.layout {
            config.layout = layout;
        }
        if let Some(true) = self.legacy_wire {
            config.wire_format = WireFormat::Legacy;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }

        if let Some(url) = &overrides.base_url {
            config.base_url = url.clone();
        }
        if overrides.legacy_wire {
            config.wire_format = WireFormat::Legacy;
        }
        if overrides.installments_field {
            config.layout = FormLayout::WithInstallments;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CliConfig::default();
        assert!(config.base_url.is_none());
        assert!(config.layout.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = CliConfig {
            base_url: Some("http://calc:8080".to_string()),
            layout: Some(FormLayout::WithInstallments),
            ..Default::default()
        };
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("base-url"));
        assert!(toml_str.contains("with-installments"));
        assert_eq!(CliConfig::parse(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_flags_win_over_file() {
        let file = CliConfig::parse(
            r#"
            base-url = "http://from-file:8080"
            layout = "basic"
            request-timeout-secs = 4
            "#,
        )
        .unwrap();
        let overrides = Overrides {
            base_url: Some("http://from-flag:9090".to_string()),
            legacy_wire: true,
            installments_field: true,
        };

        let config = file.apply(ControllerConfig::default(), &overrides);
        assert_eq!(config.base_url, "http://from-flag:9090");
        assert_eq!(config.layout, FormLayout::WithInstallments);
        assert_eq!(config.wire_format, WireFormat::Legacy);
        assert_eq!(config.request_timeout_secs, 4);
    }

    #[test]
    fn test_flag_repairs_bad_env_url() {
        let env = ControllerConfig::default()
            .with_lookup(|k| (k == "LOANCALC_BASE_URL").then(|| "localhost".to_string()))
            .unwrap();
        let overrides = Overrides {
            base_url: Some("http://calc:8080".to_string()),
            ..Default::default()
        };

        let config = CliConfig::default().apply(env, &overrides);
        assert_eq!(config.base_url, "http://calc:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_wins_over_base() {
        let file = CliConfig {
            base_url: Some("http://from-file:8080".to_string()),
            ..Default::default()
        };
        let config = file.apply(ControllerConfig::default(), &Overrides::default());
        assert_eq!(config.base_url, "http://from-file:8080");
        assert_eq!(config.wire_format, WireFormat::Standard);
    }
}
