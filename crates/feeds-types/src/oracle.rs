//! Oracle identity types.
//!
//! An oracle is registered under one canonical address. Aggregator contracts
//! before v3 list oracle addresses, while v3 lists node addresses, so each
//! identity also carries the alias addresses that refer to the same oracle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Directory record for a single oracle as it appears on the wire.
///
/// The canonical address is not part of the record; it is the key under
/// which the record is stored in the directory map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleRecord {
	/// Human readable oracle name.
	#[serde(default)]
	pub name: String,
	/// Alternate addresses used by other contract versions.
	#[serde(default, alias = "nodeAddress")]
	pub alias_addresses: Vec<String>,
}

/// A single oracle identity: canonical address, display name and aliases.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OracleIdentity {
	pub address: String,
	pub name: String,
	pub alias_addresses: Vec<String>,
}

impl OracleIdentity {
	/// Creates an identity without alias addresses.
	pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			address: address.into(),
			name: name.into(),
			alias_addresses: Vec::new(),
		}
	}

	/// Adds alias addresses to the identity.
	pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.alias_addresses
			.extend(aliases.into_iter().map(Into::into));
		self
	}

	/// Returns the canonical address followed by every alias address.
	pub fn addresses(&self) -> impl Iterator<Item = &str> {
		std::iter::once(self.address.as_str())
			.chain(self.alias_addresses.iter().map(String::as_str))
	}
}

/// Directory of known oracles keyed by canonical address.
///
/// Iteration is ordered by canonical address so that anything derived from
/// the directory is deterministic regardless of how it was assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
	from = "BTreeMap<String, OracleRecord>",
	into = "BTreeMap<String, OracleRecord>"
)]
pub struct OracleDirectory {
	identities: BTreeMap<String, OracleIdentity>,
}

impl OracleDirectory {
	/// Creates an empty directory.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts an identity, returning the one previously stored under the
	/// same canonical address.
	pub fn insert(&mut self, identity: OracleIdentity) -> Option<OracleIdentity> {
		self.identities.insert(identity.address.clone(), identity)
	}

	/// Looks up an identity by its exact canonical address.
	pub fn get(&self, address: &str) -> Option<&OracleIdentity> {
		self.identities.get(address)
	}

	pub fn len(&self) -> usize {
		self.identities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.identities.is_empty()
	}

	/// Iterates identities in canonical address order.
	pub fn iter(&self) -> impl Iterator<Item = &OracleIdentity> {
		self.identities.values()
	}
}

impl FromIterator<OracleIdentity> for OracleDirectory {
	fn from_iter<T: IntoIterator<Item = OracleIdentity>>(iter: T) -> Self {
		let mut directory = Self::new();
		for identity in iter {
			directory.insert(identity);
		}
		directory
	}
}

impl From<BTreeMap<String, OracleRecord>> for OracleDirectory {
	fn from(records: BTreeMap<String, OracleRecord>) -> Self {
		records
			.into_iter()
			.map(|(address, record)| OracleIdentity {
				address,
				name: record.name,
				alias_addresses: record.alias_addresses,
			})
			.collect()
	}
}

impl From<OracleDirectory> for BTreeMap<String, OracleRecord> {
	fn from(directory: OracleDirectory) -> Self {
		directory
			.identities
			.into_iter()
			.map(|(address, identity)| {
				(
					address,
					OracleRecord {
						name: identity.name,
						alias_addresses: identity.alias_addresses,
					},
				)
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_identity_addresses_start_with_canonical() {
		let identity = OracleIdentity::new("0xA", "Acme").with_aliases(["0xB", "0xC"]);
		let addresses: Vec<&str> = identity.addresses().collect();
		assert_eq!(addresses, vec!["0xA", "0xB", "0xC"]);
	}

	#[test]
	fn test_directory_iterates_in_address_order() {
		let directory: OracleDirectory = vec![
			OracleIdentity::new("0xC", "Gamma"),
			OracleIdentity::new("0xA", "Alpha"),
			OracleIdentity::new("0xB", "Beta"),
		]
		.into_iter()
		.collect();

		let names: Vec<&str> = directory.iter().map(|i| i.name.as_str()).collect();
		assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
		assert_eq!(directory.len(), 3);
		assert_eq!(directory.get("0xB").map(|i| i.name.as_str()), Some("Beta"));
		assert!(directory.get("0xb").is_none());
	}

	#[test]
	fn test_directory_from_json_map() {
		let directory: OracleDirectory = serde_json::from_value(json!({
			"0xA": { "name": "Acme", "aliasAddresses": ["0xB"] },
			"0xD": { "name": "Delta", "nodeAddress": ["0xE", "0xF"] },
			"0xG": {}
		}))
		.unwrap();

		let acme = directory.get("0xA").unwrap();
		assert_eq!(acme.name, "Acme");
		assert_eq!(acme.alias_addresses, vec!["0xB"]);
		assert_eq!(directory.get("0xD").unwrap().alias_addresses.len(), 2);
		assert_eq!(directory.get("0xG").unwrap().name, "");
	}

	#[test]
	fn test_directory_serializes_as_map() {
		let directory: OracleDirectory = std::iter::once(
			OracleIdentity::new("0xA", "Acme").with_aliases(["0xB"]),
		)
		.collect();

		let value = serde_json::to_value(&directory).unwrap();
		assert_eq!(
			value,
			json!({ "0xA": { "name": "Acme", "aliasAddresses": ["0xB"] } })
		);
	}
}
