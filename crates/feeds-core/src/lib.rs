//! Derivation core for the price feed oracle roster.
//!
//! Turns an [`OracleSnapshot`] (oracle directory, active oracle list and
//! submitted answers) into the ordered list of [`DerivedOracleView`]s shown
//! for an aggregation round. The work is split in three pure stages:
//!
//! 1. [`AddressNameIndex`] resolves canonical and alias addresses to names.
//! 2. [`build_roster`] names and sorts the active oracles.
//! 3. [`merge_answers`] joins answers and classifies fulfillment.
//!
//! [`derive_oracle_view`] runs the stages once. [`OracleViewDeriver`] keeps the
//! last result of every stage and only recomputes a stage when its inputs
//! change.

use feeds_types::{
	DerivedOracleView, OracleDirectory, OracleSnapshot, RosterEntry, SubmittedAnswer,
	UNKNOWN_ORACLE_NAME,
};
use std::sync::Arc;
use tracing::instrument;

pub mod memo;
pub mod stages;

pub use memo::Memo;
pub use stages::{build_roster, compare_names, merge_answers, AddressNameIndex};

/// Options applied to every derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeriveOptions {
	/// Name given to active addresses that the directory does not know.
	pub unknown_name: String,
}

impl Default for DeriveOptions {
	fn default() -> Self {
		Self {
			unknown_name: UNKNOWN_ORACLE_NAME.to_string(),
		}
	}
}

/// Derives the oracle views for a snapshot with default options.
pub fn derive_oracle_view(snapshot: &OracleSnapshot) -> Vec<DerivedOracleView> {
	derive_oracle_view_with(snapshot, &DeriveOptions::default())
}

/// Derives the oracle views for a snapshot without any caching.
pub fn derive_oracle_view_with(
	snapshot: &OracleSnapshot,
	options: &DeriveOptions,
) -> Vec<DerivedOracleView> {
	let index = AddressNameIndex::from_directory(&snapshot.oracle_directory);
	let roster = build_roster(snapshot.active_oracles(), &index, &options.unknown_name);
	merge_answers(&roster, snapshot.answers(), snapshot.pending_answer_id)
}

struct RosterKey {
	active_oracles: Vec<String>,
	index: Arc<AddressNameIndex>,
}

struct ViewsKey {
	roster: Arc<Vec<RosterEntry>>,
	answers: Vec<SubmittedAnswer>,
	pending_answer_id: u64,
}

/// Memoizing derivation pipeline.
///
/// Each stage is cached against its own inputs. Upstream stage outputs are
/// compared by pointer, since an unchanged upstream input returns the very
/// same `Arc`; the raw snapshot fragments are compared by value. Calling
/// [`derive`](Self::derive) twice with an equal snapshot therefore returns
/// the same shared vector.
pub struct OracleViewDeriver {
	options: DeriveOptions,
	index: Memo<OracleDirectory, AddressNameIndex>,
	roster: Memo<RosterKey, Vec<RosterEntry>>,
	views: Memo<ViewsKey, Vec<DerivedOracleView>>,
}

impl OracleViewDeriver {
	pub fn new(options: DeriveOptions) -> Self {
		Self {
			options,
			index: Memo::new("address_name_index"),
			roster: Memo::new("oracle_roster"),
			views: Memo::new("oracle_views"),
		}
	}

	/// Derives the oracle views for a snapshot, reusing cached stages.
	#[instrument(skip_all, fields(
		active = snapshot.active_oracles().len(),
		answers = snapshot.answers().len(),
		pending_answer_id = snapshot.pending_answer_id
	))]
	pub fn derive(&self, snapshot: &OracleSnapshot) -> Arc<Vec<DerivedOracleView>> {
		let index = self.index(&snapshot.oracle_directory);
		let roster = self.roster(snapshot.active_oracles(), &index);
		self.views(&roster, snapshot.answers(), snapshot.pending_answer_id)
	}

	/// Address name index for the directory.
	pub fn index(&self, directory: &OracleDirectory) -> Arc<AddressNameIndex> {
		self.index.get_or_compute(
			|cached| cached == directory,
			|| (directory.clone(), AddressNameIndex::from_directory(directory)),
		)
	}

	/// Sorted roster for the active oracles.
	pub fn roster(
		&self,
		active_oracles: &[String],
		index: &Arc<AddressNameIndex>,
	) -> Arc<Vec<RosterEntry>> {
		self.roster.get_or_compute(
			|cached| Arc::ptr_eq(&cached.index, index) && cached.active_oracles == active_oracles,
			|| {
				let roster = build_roster(active_oracles, index, &self.options.unknown_name);
				let key = RosterKey {
					active_oracles: active_oracles.to_vec(),
					index: Arc::clone(index),
				};
				(key, roster)
			},
		)
	}

	/// Oracle views for the roster and the answers submitted so far.
	pub fn views(
		&self,
		roster: &Arc<Vec<RosterEntry>>,
		answers: &[SubmittedAnswer],
		pending_answer_id: u64,
	) -> Arc<Vec<DerivedOracleView>> {
		self.views.get_or_compute(
			|cached| {
				Arc::ptr_eq(&cached.roster, roster)
					&& cached.pending_answer_id == pending_answer_id
					&& cached.answers == answers
			},
			|| {
				let views = merge_answers(roster, answers, pending_answer_id);
				let key = ViewsKey {
					roster: Arc::clone(roster),
					answers: answers.to_vec(),
					pending_answer_id,
				};
				(key, views)
			},
		)
	}

	/// Forgets every cached stage.
	pub fn reset(&self) {
		self.index.clear();
		self.roster.clear();
		self.views.clear();
	}
}

impl Default for OracleViewDeriver {
	fn default() -> Self {
		Self::new(DeriveOptions::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use feeds_types::{addresses_match, OracleIdentity, RoundSummary};
	use serde_json::json;

	fn acme_snapshot(pending_answer_id: u64) -> OracleSnapshot {
		OracleSnapshot {
			oracle_directory: std::iter::once(
				OracleIdentity::new("0xA", "Acme").with_aliases(["0xB"]),
			)
			.collect(),
			active_oracle_list: Some(vec!["0xB".to_string()]),
			submitted_answers: Some(vec![SubmittedAnswer::new("0xb", 5, 100.0)]),
			pending_answer_id,
		}
	}

	#[test]
	fn test_alias_answer_is_fulfilled() {
		let views = derive_oracle_view(&acme_snapshot(4));

		assert_eq!(
			serde_json::to_value(&views).unwrap(),
			json!([{
				"address": "0xB",
				"name": "Acme",
				"type": "oracle",
				"sender": "0xb",
				"answerId": 5,
				"answer": 100.0,
				"id": 0,
				"isFulfilled": true
			}])
		);
	}

	#[test]
	fn test_stale_answer_is_merged_but_pending() {
		let views = derive_oracle_view(&acme_snapshot(6));

		assert_eq!(views.len(), 1);
		assert!(!views[0].is_fulfilled);
		assert_eq!(views[0].answer_id(), Some(5));
		assert_eq!(views[0].answer.as_ref().map(|a| a.answer), Some(100.0));
	}

	#[test]
	fn test_unknown_address_without_directory() {
		let snapshot = OracleSnapshot {
			active_oracle_list: Some(vec!["0xC".to_string()]),
			..Default::default()
		};
		let views = derive_oracle_view(&snapshot);

		assert_eq!(
			serde_json::to_value(&views).unwrap(),
			json!([{
				"address": "0xC",
				"name": "Unknown",
				"type": "oracle",
				"id": 0,
				"isFulfilled": false
			}])
		);
	}

	#[test]
	fn test_empty_or_absent_list_gives_no_views() {
		let mut snapshot = acme_snapshot(0);
		snapshot.active_oracle_list = Some(Vec::new());
		assert!(derive_oracle_view(&snapshot).is_empty());

		snapshot.active_oracle_list = None;
		assert!(derive_oracle_view(&snapshot).is_empty());
	}

	#[test]
	fn test_custom_unknown_name() {
		let snapshot = OracleSnapshot {
			active_oracle_list: Some(vec!["0xC".to_string()]),
			..Default::default()
		};
		let options = DeriveOptions {
			unknown_name: "Unlisted node".to_string(),
		};
		let views = derive_oracle_view_with(&snapshot, &options);
		assert_eq!(views[0].name(), "Unlisted node");
	}

	#[test]
	fn test_deriver_reuses_unchanged_output() {
		let deriver = OracleViewDeriver::default();
		let snapshot = acme_snapshot(4);

		let first = deriver.derive(&snapshot);
		let second = deriver.derive(&snapshot.clone());

		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(*first, derive_oracle_view(&snapshot));
	}

	#[test]
	fn test_deriver_reuses_roster_when_only_answers_change() {
		let deriver = OracleViewDeriver::default();
		let snapshot = acme_snapshot(4);

		let index = deriver.index(&snapshot.oracle_directory);
		let roster = deriver.roster(snapshot.active_oracles(), &index);
		let before = deriver.derive(&snapshot);

		let next_round = acme_snapshot(6);
		let after = deriver.derive(&next_round);

		let roster_again = deriver.roster(next_round.active_oracles(), &index);
		assert!(Arc::ptr_eq(&roster, &roster_again));
		assert!(!Arc::ptr_eq(&before, &after));
		assert!(before[0].is_fulfilled);
		assert!(!after[0].is_fulfilled);
	}

	#[test]
	fn test_deriver_tracks_directory_changes() {
		let deriver = OracleViewDeriver::default();
		let mut snapshot = acme_snapshot(4);
		let before = deriver.derive(&snapshot);

		snapshot
			.oracle_directory
			.insert(OracleIdentity::new("0xA", "Acme Oracles").with_aliases(["0xB"]));
		let after = deriver.derive(&snapshot);

		assert_eq!(before[0].name(), "Acme");
		assert_eq!(after[0].name(), "Acme Oracles");
	}

	#[test]
	fn test_deriver_reset() {
		let deriver = OracleViewDeriver::default();
		let snapshot = acme_snapshot(4);

		let first = deriver.derive(&snapshot);
		deriver.reset();
		let second = deriver.derive(&snapshot);

		assert_eq!(first, second);
		assert!(!Arc::ptr_eq(&first, &second));
	}

	#[test]
	fn test_fulfillment_matches_answer_threshold() {
		let snapshot = OracleSnapshot {
			oracle_directory: vec![
				OracleIdentity::new("0x01", "Alpha"),
				OracleIdentity::new("0x02", "Beta").with_aliases(["0x12"]),
				OracleIdentity::new("0x03", "Gamma"),
				OracleIdentity::new("0x04", "Delta"),
			]
			.into_iter()
			.collect(),
			active_oracle_list: Some(
				["0x04", "0x12", "0x01", "0x03"]
					.iter()
					.map(|a| a.to_string())
					.collect(),
			),
			submitted_answers: Some(vec![
				SubmittedAnswer::new("0x01", 7, 1.0),
				SubmittedAnswer::new("0x12", 6, 1.0),
				SubmittedAnswer::new("0X04", 8, 1.0),
			]),
			pending_answer_id: 7,
		};

		let views = derive_oracle_view(&snapshot);
		let names: Vec<&str> = views.iter().map(|view| view.name()).collect();
		assert_eq!(names, vec!["Alpha", "Beta", "Delta", "Gamma"]);

		for view in &views {
			let expected = snapshot
				.answers()
				.iter()
				.find(|answer| addresses_match(&answer.sender, view.address()))
				.is_some_and(|answer| answer.answer_id >= snapshot.pending_answer_id);
			assert_eq!(view.is_fulfilled, expected, "oracle {}", view.name());
		}
		assert_eq!(
			RoundSummary::from_views(&views),
			RoundSummary {
				total: 4,
				fulfilled: 2,
				pending: 2
			}
		);
	}
}
