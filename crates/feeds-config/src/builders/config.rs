//! Configuration builder for tests and local development.

use crate::{Config, FeedsConfig, OracleConfig};
use feeds_types::UNKNOWN_ORACLE_NAME;
use std::collections::BTreeMap;

/// Builder for `Config` instances with a fluent API.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	feed_id: String,
	unknown_name: String,
	oracles: BTreeMap<String, OracleConfig>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a builder for an empty test feed.
	pub fn new() -> Self {
		Self {
			feed_id: "test-feed".to_string(),
			unknown_name: UNKNOWN_ORACLE_NAME.to_string(),
			oracles: BTreeMap::new(),
		}
	}

	pub fn feed_id(mut self, id: impl Into<String>) -> Self {
		self.feed_id = id.into();
		self
	}

	pub fn unknown_name(mut self, name: impl Into<String>) -> Self {
		self.unknown_name = name.into();
		self
	}

	/// Adds an oracle with its node addresses.
	pub fn oracle<I, S>(
		mut self,
		address: impl Into<String>,
		name: impl Into<String>,
		nodes: I,
	) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.oracles.insert(
			address.into(),
			OracleConfig {
				name: name.into(),
				node_addresses: nodes.into_iter().map(Into::into).collect(),
			},
		);
		self
	}

	/// Builds the configuration without validating it.
	pub fn build(self) -> Config {
		Config {
			feeds: FeedsConfig {
				id: self.feed_id,
				unknown_name: self.unknown_name,
			},
			oracles: self.oracles,
		}
	}
}
