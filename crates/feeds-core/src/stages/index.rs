//! Address to name index over the oracle directory.
//!
//! Aggregator contracts up to v2 report oracle addresses while v3 reports node
//! addresses. The index maps both forms to the same display name so that
//! either list can be resolved against one directory.

use feeds_types::{address_key, truncate_id, OracleDirectory};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddressOrigin {
	Canonical,
	Alias,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexedName {
	/// Address exactly as supplied by the directory.
	address: String,
	name: String,
	origin: AddressOrigin,
}

/// Lookup from any canonical or alias address to an oracle display name.
///
/// Entries keep the address spelling supplied by the directory; lookups
/// ignore case. When two identities claim the same address, canonical addresses take
/// precedence over aliases and otherwise the identity that comes first in
/// directory order keeps the address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressNameIndex {
	names: HashMap<String, IndexedName>,
}

impl AddressNameIndex {
	/// Builds the index from every canonical and alias address in the directory.
	pub fn from_directory(directory: &OracleDirectory) -> Self {
		let mut index = Self::default();

		for identity in directory.iter() {
			index.insert(&identity.address, &identity.name, AddressOrigin::Canonical);
		}
		for identity in directory.iter() {
			for alias in &identity.alias_addresses {
				index.insert(alias, &identity.name, AddressOrigin::Alias);
			}
		}

		tracing::debug!(
			identities = directory.len(),
			addresses = index.len(),
			"Built address name index"
		);
		index
	}

	fn insert(&mut self, address: &str, name: &str, origin: AddressOrigin) {
		match self.names.entry(address_key(address)) {
			Entry::Occupied(existing) => {
				if existing.get().name != name {
					tracing::warn!(
						address = %truncate_id(address),
						kept_as = %truncate_id(&existing.get().address),
						kept = %existing.get().name,
						kept_origin = ?existing.get().origin,
						ignored = %name,
						ignored_origin = ?origin,
						"Address claimed by more than one oracle"
					);
				}
			},
			Entry::Vacant(slot) => {
				slot.insert(IndexedName {
					address: address.to_string(),
					name: name.to_string(),
					origin,
				});
			},
		}
	}

	/// Resolves an address to its oracle name, ignoring case.
	///
	/// Identities recorded without a name do not resolve, so callers apply
	/// the same fallback they use for unknown addresses.
	pub fn resolve(&self, address: &str) -> Option<&str> {
		self.names
			.get(&address_key(address))
			.map(|indexed| indexed.name.as_str())
			.filter(|name| !name.is_empty())
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}
