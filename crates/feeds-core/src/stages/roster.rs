//! Named, sorted roster of the oracles active in the current round.

use super::index::AddressNameIndex;
use feeds_types::RosterEntry;
use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Builds one roster entry per active address, sorted by display name.
///
/// Addresses missing from the index are named `unknown_name`. The output has
/// exactly one entry per input address, duplicates included. Entries with
/// equal names keep their relative input order.
pub fn build_roster(
	active_oracles: &[String],
	index: &AddressNameIndex,
	unknown_name: &str,
) -> Vec<RosterEntry> {
	let mut roster: Vec<RosterEntry> = active_oracles
		.iter()
		.map(|address| {
			let name = index.resolve(address).unwrap_or(unknown_name);
			RosterEntry::oracle(address.as_str(), name)
		})
		.collect();

	roster.sort_by(|a, b| compare_names(&a.name, &b.name));
	roster
}

/// Orders display names with the root locale collation at tertiary strength.
///
/// Punctuation sorts before digits and digits before letters. Accented
/// letters sort next to their base letter, and names that differ only in
/// case put the lowercase form first.
pub fn compare_names(a: &str, b: &str) -> Ordering {
	match root_collator() {
		Some(collator) => collator.compare(a, b),
		None => a.cmp(b),
	}
}

fn root_collator() -> Option<&'static CollatorBorrowed<'static>> {
	static COLLATOR: OnceLock<Option<CollatorBorrowed<'static>>> = OnceLock::new();

	COLLATOR
		.get_or_init(|| {
			Collator::try_new(Default::default(), CollatorOptions::default())
				.map_err(|e| {
					tracing::warn!(
						error = %e,
						"Root collation unavailable, sorting names by code point"
					);
				})
				.ok()
		})
		.as_ref()
}
