use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dates::DateParsing;
use crate::form::FormLayout;
use crate::schedule::WireFormat;
use crate::types::LoanError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const CALCULATE_PATH: &str = "/api/loan/calculate";
pub const HEALTH_PATH: &str = "/api/loan/health";

/// Controller and endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ControllerConfig {
    /// Scheme, host and port of the calculation server.
    pub base_url: String,
    pub calculate_path: String,
    pub health_path: String,
    pub layout: FormLayout,
    pub date_parsing: DateParsing,
    pub wire_format: WireFormat,
    pub success_alert_ms: u64,
    pub error_alert_ms: u64,
    pub request_timeout_secs: u64,
    /// Refuse a second submit while a request is in flight.
    pub guard_double_submit: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            calculate_path: CALCULATE_PATH.to_string(),
            health_path: HEALTH_PATH.to_string(),
            layout: FormLayout::default(),
            date_parsing: DateParsing::Strict,
            wire_format: WireFormat::default(),
            success_alert_ms: 3000,
            error_alert_ms: 5000,
            request_timeout_secs: 10,
            guard_double_submit: true,
        }
    }
}

impl std::str::FromStr for ControllerConfig {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: ControllerConfig = serde_json::from_str(s)
            .map_err(|e| LoanError::Configuration(format!("Failed to parse config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl ControllerConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_layout(mut self, layout: FormLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_wire_format(mut self, wire_format: WireFormat) -> Self {
        self.wire_format = wire_format;
        self
    }

    pub fn success_alert(&self) -> Duration {
        Duration::from_millis(self.success_alert_ms)
    }

    pub fn error_alert(&self) -> Duration {
        Duration::from_millis(self.error_alert_ms)
    }

    pub fn calculate_url(&self) -> String {
        join_url(&self.base_url, &self.calculate_path)
    }

    pub fn health_url(&self) -> String {
        join_url(&self.base_url, &self.health_path)
    }

    /// Validates the configuration for logical consistency.
    pub fn validate(&self) -> Result<(), LoanError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(LoanError::Configuration(format!(
                "base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        for (name, path) in [
            ("calculate-path", &self.calculate_path),
            ("health-path", &self.health_path),
        ] {
            if !path.starts_with('/') {
                return Err(LoanError::Configuration(format!(
                    "{} must start with '/', got '{}'",
                    name, path
                )));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(LoanError::Configuration(
                "request timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// Layers `LOANCALC_*` environment variables on `self` without validating,
    /// so later layers can still replace a bad value.
    pub fn with_env(self) -> Result<Self, LoanError> {
        self.with_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::with_env`] with an injectable variable source.
    /// Only values that cannot be parsed at all are rejected here.
    pub fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoanError> {
        if let Some(url) = lookup("LOANCALC_BASE_URL") {
            self.base_url = url;
        }
        if let Some(secs) = lookup("LOANCALC_TIMEOUT_SECS") {
            self.request_timeout_secs = secs.parse().map_err(|e| {
                LoanError::Configuration(format!("Invalid LOANCALC_TIMEOUT_SECS: {}", e))
            })?;
        }
        if let Some(layout) = lookup("LOANCALC_LAYOUT") {
            self.layout = match layout.as_str() {
                "basic" => FormLayout::Basic,
                "with-installments" => FormLayout::WithInstallments,
                other => {
                    return Err(LoanError::Configuration(format!(
                        "Unknown LOANCALC_LAYOUT '{}'",
                        other
                    )));
                }
            };
        }
        Ok(self)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.calculate_url(), "http://localhost:8080/api/loan/calculate");
        assert_eq!(config.health_url(), "http://localhost:8080/api/loan/health");
        assert_eq!(config.success_alert(), Duration::from_secs(3));
        assert_eq!(config.error_alert(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_trailing_slash_is_joined_once() {
        let config = ControllerConfig::default().with_base_url("https://loans.example/");
        assert_eq!(config.calculate_url(), "https://loans.example/api/loan/calculate");
    }

    #[test]
    fn test_from_json_partial() {
        let config: ControllerConfig =
            r#"{"base-url":"http://10.0.0.2:9000","layout":"with-installments"}"#
                .parse()
                .unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:9000");
        assert_eq!(config.layout, FormLayout::WithInstallments);
        assert_eq!(config.error_alert_ms, 5000);
    }

    #[test]
    fn test_rejects_bad_url() {
        let result: Result<ControllerConfig, _> = r#"{"base-url":"localhost"}"#.parse();
        assert!(matches!(result, Err(LoanError::Configuration(_))));
    }

    #[test]
    fn test_with_lookup() {
        let vars = HashMap::from([
            ("LOANCALC_BASE_URL", "http://calc:8081"),
            ("LOANCALC_TIMEOUT_SECS", "3"),
            ("LOANCALC_LAYOUT", "with-installments"),
        ]);
        let config = ControllerConfig::default()
            .with_lookup(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url, "http://calc:8081");
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.layout, FormLayout::WithInstallments);
    }

    #[test]
    fn test_with_lookup_defers_validation() {
        let lookup = |k: &str| (k == "LOANCALC_BASE_URL").then(|| "localhost".to_string());
        let layered = ControllerConfig::default().with_lookup(lookup).unwrap();
        assert_eq!(layered.base_url, "localhost");
        assert!(layered.validate().is_err());
        assert!(layered.with_base_url("http://calc:8080").validate().is_ok());
    }

    #[test]
    fn test_with_lookup_rejects_bad_timeout() {
        let result = ControllerConfig::default().with_lookup(|k| {
            (k == "LOANCALC_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }
}
