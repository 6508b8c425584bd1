//! Configuration module for the Sales Portal harness.
//!
//! This module provides structures and utilities for managing harness
//! configuration. It supports loading configuration from TOML files and
//! provides validation to ensure all required values are properly set.
//!
//! Manager ids are part of this configuration and are handed to the
//! orchestrator explicitly; nothing in the harness reads them from
//! process-wide state.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the harness.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HarnessConfig {
	/// Base URL of the Sales Portal backend, e.g. `http://localhost:8686`.
	pub base_url: String,
	/// Login credentials used to obtain the auth token.
	pub credentials: Credentials,
	/// Manager ids available for assignment during order builds.
	#[serde(default)]
	pub manager_ids: Vec<String>,
	/// HTTP client settings.
	#[serde(default)]
	pub http: HttpConfig,
}

/// Login credentials for the portal.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Credentials {
	pub username: String,
	pub password: String,
}

/// HTTP client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
	/// Per-request timeout in seconds.
	#[serde(default = "default_timeout_seconds")]
	pub timeout_seconds: u64,
}

impl Default for HttpConfig {
	fn default() -> Self {
		Self {
			timeout_seconds: default_timeout_seconds(),
		}
	}
}

fn default_timeout_seconds() -> u64 {
	30
}

impl HarnessConfig {
	/// Loads and validates a configuration from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let raw = std::fs::read_to_string(path)?;
		Self::from_toml_str(&raw)
	}

	/// Parses and validates a configuration from a TOML string.
	pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
		let config: HarnessConfig = toml::from_str(raw)?;
		config.validate()?;
		Ok(config)
	}

	/// Validates the configuration values.
	fn validate(&self) -> Result<(), ConfigError> {
		if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
			return Err(ConfigError::Validation(format!(
				"base_url must be an http(s) URL, got '{}'",
				self.base_url
			)));
		}
		if self.credentials.username.is_empty() || self.credentials.password.is_empty() {
			return Err(ConfigError::Validation(
				"credentials.username and credentials.password must be set".into(),
			));
		}
		if self.http.timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"http.timeout_seconds must be greater than zero".into(),
			));
		}
		if self.manager_ids.iter().any(|id| id.trim().is_empty()) {
			return Err(ConfigError::Validation(
				"manager_ids must not contain blank entries".into(),
			));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	const VALID: &str = r#"
		base_url = "http://localhost:8686"
		manager_ids = ["m1", "m2"]

		[credentials]
		username = "qa@portal.test"
		password = "secret"
	"#;

	#[test]
	fn test_parses_valid_config_with_defaults() {
		let config = HarnessConfig::from_toml_str(VALID).unwrap();
		assert_eq!(config.base_url, "http://localhost:8686");
		assert_eq!(config.manager_ids, vec!["m1", "m2"]);
		assert_eq!(config.http.timeout_seconds, 30);
	}

	#[test]
	fn test_rejects_non_http_base_url() {
		let raw = VALID.replace("http://localhost:8686", "localhost:8686");
		let err = HarnessConfig::from_toml_str(&raw).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn test_rejects_blank_credentials() {
		let raw = VALID.replace("\"secret\"", "\"\"");
		let err = HarnessConfig::from_toml_str(&raw).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn test_loads_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(VALID.as_bytes()).unwrap();
		let config = HarnessConfig::from_file(file.path()).unwrap();
		assert_eq!(config.credentials.username, "qa@portal.test");
	}

	#[test]
	fn test_parse_error_carries_message_only() {
		let err = HarnessConfig::from_toml_str("base_url = [").unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}
}
