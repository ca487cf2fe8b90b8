//! Loader for configurations split across several files.
//!
//! The main file may pull in other files through an `include` directive. The
//! combined document is parsed as one configuration; a top-level section may
//! appear in one file only.

use crate::{resolve_env_vars, Config, ConfigError};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Configuration loader that handles multi-file configurations with includes.
pub struct ConfigLoader {
	/// Directory relative includes are resolved against
	base_path: PathBuf,
	/// Canonical paths already read, for cycle detection
	loaded_files: HashSet<PathBuf>,
	/// File each top-level section was read from
	section_owners: HashMap<String, PathBuf>,
}

impl ConfigLoader {
	/// Creates a new ConfigLoader with the given base path.
	pub fn new(base_path: impl AsRef<Path>) -> Self {
		Self {
			base_path: base_path.as_ref().to_path_buf(),
			loaded_files: HashSet::new(),
			section_owners: HashMap::new(),
		}
	}

	/// Loads a configuration file and all its includes.
	pub async fn load_config(
		&mut self,
		config_path: impl AsRef<Path>,
	) -> Result<Config, ConfigError> {
		let config_path = self.resolve_path(config_path)?;

		let main_content = self.load_file(&config_path).await?;
		let main_document: toml::Value = toml::from_str(&main_content)?;

		let includes = self.extract_includes(&main_document)?;

		if includes.is_empty() {
			tracing::debug!(path = %config_path.display(), "Loaded single configuration file");
			return Config::from_resolved(&main_content);
		}

		let combined = self
			.load_and_combine(main_document, includes, config_path.clone())
			.await?;

		let config_str = toml::to_string(&combined).map_err(|e| {
			ConfigError::Parse(format!("Failed to serialize combined config: {}", e))
		})?;
		tracing::debug!(
			path = %config_path.display(),
			files = self.loaded_files.len(),
			"Loaded configuration with includes"
		);
		Config::from_resolved(&config_str)
	}

	/// Loads a file and resolves environment variables.
	async fn load_file(&mut self, path: &Path) -> Result<String, ConfigError> {
		let canonical_path = path.canonicalize().map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("Cannot resolve path {}: {}", path.display(), e),
			))
		})?;

		if !self.loaded_files.insert(canonical_path.clone()) {
			return Err(ConfigError::Validation(format!(
				"Circular include detected: {} was already loaded",
				canonical_path.display()
			)));
		}

		let content = tokio::fs::read_to_string(path).await?;
		resolve_env_vars(&content)
	}

	/// Reads the `include` directive: a single path or an array of paths.
	fn extract_includes(&self, document: &toml::Value) -> Result<Vec<PathBuf>, ConfigError> {
		match document.get("include") {
			None => Ok(Vec::new()),
			Some(toml::Value::String(path)) => Ok(vec![PathBuf::from(path)]),
			Some(toml::Value::Array(items)) => items
				.iter()
				.map(|item| {
					item.as_str().map(PathBuf::from).ok_or_else(|| {
						ConfigError::Validation("Include array must contain only strings".into())
					})
				})
				.collect(),
			Some(_) => Err(ConfigError::Validation(
				"Include must be a string or array of strings".into(),
			)),
		}
	}

	/// Merges included files into the main document.
	///
	/// Fails when a top-level section is defined by more than one file.
	async fn load_and_combine(
		&mut self,
		main_document: toml::Value,
		includes: Vec<PathBuf>,
		main_file_path: PathBuf,
	) -> Result<toml::Value, ConfigError> {
		let toml::Value::Table(mut main_table) = main_document else {
			return Err(ConfigError::Parse(
				"Configuration root must be a table".into(),
			));
		};
		main_table.remove("include");
		for key in main_table.keys() {
			self.section_owners.insert(key.clone(), main_file_path.clone());
		}

		for include_path in includes {
			let resolved_path = self.resolve_path(&include_path)?;
			let content = self.load_file(&resolved_path).await?;
			let toml::Value::Table(included) = toml::from_str::<toml::Value>(&content)? else {
				continue;
			};

			for (key, value) in included {
				if let Some(owner) = self.section_owners.get(&key) {
					return Err(ConfigError::Validation(format!(
						"Duplicate section '{}' found in {} and {}. \
						Each top-level section must be unique across all configuration files.",
						key,
						owner.display(),
						resolved_path.display()
					)));
				}
				self.section_owners.insert(key.clone(), resolved_path.clone());
				main_table.insert(key, value);
			}
		}

		Ok(toml::Value::Table(main_table))
	}

	/// Resolves a path relative to the base path.
	fn resolve_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
		let path = path.as_ref();

		let resolved = if path.is_absolute() {
			path.to_path_buf()
		} else {
			self.base_path.join(path)
		};

		if !resolved.exists() {
			return Err(ConfigError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("Configuration file not found: {}", resolved.display()),
			)));
		}

		Ok(resolved)
	}
}
