//! Configuration module for the delight order backend.
//!
//! This module provides structures and utilities for managing service
//! configuration. It supports loading configuration from TOML files with
//! environment variable resolution and validates that every configured
//! component references an implementation that is actually declared.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
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

/// Main configuration structure for the delight service.
///
/// This structure contains all configuration sections required to run the
/// service: the service identity, the storage backend, the catalog and
/// agent roster implementations, the notifier, order policy knobs, and
/// the optional HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to this service instance.
	pub service: ServiceConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
	/// Configuration for the product catalog.
	pub catalog: CatalogConfig,
	/// Configuration for the delivery agent roster.
	pub agent: AgentConfig,
	/// Configuration for customer notifications.
	pub notifier: NotifierConfig,
	/// Order policy knobs.
	#[serde(default)]
	pub order: OrderPolicyConfig,
	/// Configuration for the HTTP API server.
	pub api: Option<ApiConfig>,
}

/// Configuration specific to this service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
	/// Unique identifier for this service instance.
	pub id: String,
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the product catalog.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of catalog implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the delivery agent roster.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of agent roster implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for customer notifications.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of notifier implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Order policy knobs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderPolicyConfig {
	/// Minutes from order creation to the estimated delivery time.
	/// Defaults to 90 minutes if not specified.
	#[serde(default = "default_estimated_delivery_minutes")]
	pub estimated_delivery_minutes: i64,
}

impl Default for OrderPolicyConfig {
	fn default() -> Self {
		Self {
			estimated_delivery_minutes: default_estimated_delivery_minutes(),
		}
	}
}

/// Returns the default estimated delivery window in minutes.
fn default_estimated_delivery_minutes() -> i64 {
	90
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server is enabled.
	#[serde(default)]
	pub enabled: bool,
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
}

/// Returns the default API host.
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default API port.
fn default_api_port() -> u16 {
	3000
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	// Limit input size to prevent ReDoS attacks
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let Some(full_match) = cap.get(0) else {
			continue;
		};
		let Some(var_name) = cap.get(1).map(|m| m.as_str()) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => {
				if let Some(default) = default_value {
					default.to_string()
				} else {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file with environment variable resolution.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let contents = tokio::fs::read_to_string(path).await?;
		contents.parse()
	}

	/// Validates the configuration to ensure all values are acceptable.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.service.id.is_empty() {
			return Err(ConfigError::Validation(
				"Service ID cannot be empty".to_string(),
			));
		}

		Self::validate_section("storage", &self.storage.primary, &self.storage.implementations)?;
		Self::validate_section("catalog", &self.catalog.primary, &self.catalog.implementations)?;
		Self::validate_section("agent", &self.agent.primary, &self.agent.implementations)?;
		Self::validate_section(
			"notifier",
			&self.notifier.primary,
			&self.notifier.implementations,
		)?;

		if self.order.estimated_delivery_minutes <= 0 {
			return Err(ConfigError::Validation(
				"order.estimated_delivery_minutes must be positive".to_string(),
			));
		}

		if let Some(api) = &self.api {
			if api.enabled && api.port == 0 {
				return Err(ConfigError::Validation(
					"api.port must be non-zero when the API is enabled".to_string(),
				));
			}
		}

		Ok(())
	}

	/// Checks that a component's primary implementation is declared.
	fn validate_section(
		section: &str,
		primary: &str,
		implementations: &HashMap<String, toml::Value>,
	) -> Result<(), ConfigError> {
		if primary.is_empty() {
			return Err(ConfigError::Validation(format!(
				"{}.primary cannot be empty",
				section
			)));
		}
		if implementations.is_empty() {
			return Err(ConfigError::Validation(format!(
				"At least one {} implementation must be configured",
				section
			)));
		}
		if !implementations.contains_key(primary) {
			return Err(ConfigError::Validation(format!(
				"{}.primary '{}' is not among the configured implementations",
				section, primary
			)));
		}
		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const BASE_CONFIG: &str = r#"
		[service]
		id = "delight-test"

		[storage]
		primary = "memory"
		[storage.implementations.memory]

		[catalog]
		primary = "store"
		[catalog.implementations.store]

		[agent]
		primary = "store"
		[agent.implementations.store]

		[notifier]
		primary = "log"
		[notifier.implementations.log]
	"#;

	#[test]
	fn resolves_env_vars_with_values() {
		std::env::set_var("DELIGHT_TEST_VAR", "hello");
		let result = resolve_env_vars("value = \"${DELIGHT_TEST_VAR}\"").unwrap();
		assert_eq!(result, "value = \"hello\"");
		std::env::remove_var("DELIGHT_TEST_VAR");
	}

	#[test]
	fn resolves_env_vars_with_defaults() {
		let result = resolve_env_vars("value = \"${DELIGHT_MISSING_VAR:-fallback}\"").unwrap();
		assert_eq!(result, "value = \"fallback\"");
	}

	#[test]
	fn missing_env_var_without_default_is_an_error() {
		let result = resolve_env_vars("value = \"${DELIGHT_DEFINITELY_MISSING}\"");
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn parses_a_full_config() {
		let config: Config = BASE_CONFIG.parse().unwrap();
		assert_eq!(config.service.id, "delight-test");
		assert_eq!(config.storage.primary, "memory");
		assert_eq!(config.order.estimated_delivery_minutes, 90);
		assert!(config.api.is_none());
	}

	#[test]
	fn api_section_fills_in_defaults() {
		let with_api = format!("{}\n[api]\nenabled = true\n", BASE_CONFIG);
		let config: Config = with_api.parse().unwrap();
		let api = config.api.unwrap();
		assert!(api.enabled);
		assert_eq!(api.host, "127.0.0.1");
		assert_eq!(api.port, 3000);
	}

	#[test]
	fn unknown_primary_fails_validation() {
		let broken = BASE_CONFIG.replace("primary = \"memory\"", "primary = \"redis\"");
		let result = broken.parse::<Config>();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn empty_service_id_fails_validation() {
		let broken = BASE_CONFIG.replace("id = \"delight-test\"", "id = \"\"");
		let result = broken.parse::<Config>();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn non_positive_delivery_window_fails_validation() {
		let broken = format!(
			"{}\n[order]\nestimated_delivery_minutes = 0\n",
			BASE_CONFIG
		);
		let result = broken.parse::<Config>();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[tokio::test]
	async fn loads_config_from_a_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		std::fs::write(&path, BASE_CONFIG).unwrap();

		let config = Config::from_file(path.to_str().unwrap()).await.unwrap();
		assert_eq!(config.service.id, "delight-test");
	}
}
