//! Configuration module for the oracle roster service.
//!
//! The configuration names the feed and carries the oracle directory: every
//! known oracle with its canonical address, display name and the node
//! addresses newer aggregator contracts report for it. It is loaded from TOML
//! with `${VAR}` / `${VAR:-default}` environment substitution.
//!
//! ## Modular Configuration Support
//!
//! A large oracle directory can live in its own file:
//! - Use `include = ["oracles.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

#[cfg(any(test, feature = "testing"))]
pub mod builders;
mod loader;

use feeds_types::{
	address_key, with_0x_prefix, without_0x_prefix, OracleDirectory, OracleIdentity,
	UNKNOWN_ORACLE_NAME,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
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
		// Keep the message only, not the full input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Settings of the feed whose oracles are listed.
	pub feeds: FeedsConfig,
	/// Oracle directory keyed by canonical oracle address.
	#[serde(default)]
	pub oracles: BTreeMap<String, OracleConfig>,
}

/// Settings of the feed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedsConfig {
	/// Identifier of the feed, used in log output.
	pub id: String,
	/// Name shown for active addresses missing from the directory.
	#[serde(default = "default_unknown_name")]
	pub unknown_name: String,
}

fn default_unknown_name() -> String {
	UNKNOWN_ORACLE_NAME.to_string()
}

/// One oracle of the directory.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
	/// Display name.
	pub name: String,
	/// Node addresses reported for this oracle by v3 aggregators.
	#[serde(default)]
	pub node_addresses: Vec<String>,
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, following include directives.
	///
	/// Each top-level section must be unique across all configuration files.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	/// Builds the oracle directory from the `[oracles]` section.
	///
	/// Addresses written without a `0x` prefix get one.
	pub fn oracle_directory(&self) -> OracleDirectory {
		self.oracles
			.iter()
			.map(|(address, oracle)| {
				OracleIdentity::new(with_0x_prefix(address), oracle.name.trim())
					.with_aliases(oracle.node_addresses.iter().map(|node| with_0x_prefix(node)))
			})
			.collect()
	}

	/// Validates the configuration.
	///
	/// - the feed id and the unknown-oracle name must not be empty
	/// - every oracle needs a name and non-empty addresses
	/// - an address may belong to one oracle only, whether canonical or node
	fn validate(&self) -> Result<(), ConfigError> {
		if self.feeds.id.trim().is_empty() {
			return Err(ConfigError::Validation("Feed id cannot be empty".into()));
		}
		if self.feeds.unknown_name.trim().is_empty() {
			return Err(ConfigError::Validation(
				"feeds.unknown_name cannot be empty".into(),
			));
		}

		// Address key -> oracle address that claims it
		let mut owners: HashMap<String, &str> = HashMap::new();

		for address in self.oracles.keys() {
			if without_0x_prefix(address).is_empty() {
				return Err(ConfigError::Validation(format!(
					"Invalid oracle address '{}'",
					address
				)));
			}
			let key = address_key(&with_0x_prefix(address));
			if let Some(existing) = owners.insert(key, address.as_str()) {
				return Err(ConfigError::Validation(format!(
					"Oracle address '{}' is listed twice (as '{}' and '{}')",
					address, existing, address
				)));
			}
		}

		for (address, oracle) in &self.oracles {
			if oracle.name.trim().is_empty() {
				return Err(ConfigError::Validation(format!(
					"Oracle {} must have a name",
					address
				)));
			}
			for node in &oracle.node_addresses {
				if without_0x_prefix(node).is_empty() {
					return Err(ConfigError::Validation(format!(
						"Oracle {} has an invalid node address '{}'",
						address, node
					)));
				}
				let key = address_key(&with_0x_prefix(node));
				if let Some(existing) = owners.insert(key, address.as_str()) {
					if existing != address.as_str() {
						return Err(ConfigError::Validation(format!(
							"Node address '{}' of oracle {} is already used by oracle {}",
							node, address, existing
						)));
					}
				}
			}
		}

		Ok(())
	}
}

/// Parses a configuration from a TOML string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl Config {
	/// Parses and validates text whose environment variables are already resolved.
	pub(crate) fn from_resolved(s: &str) -> Result<Self, ConfigError> {
		let config: Config = toml::from_str(s)?;
		config.validate()?;
		Ok(config)
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Config::from_resolved(&resolve_env_vars(s)?)
	}
}
