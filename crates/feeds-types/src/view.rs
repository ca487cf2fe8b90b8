//! Derived roster and view types consumed by presentation layers.

use crate::SubmittedAnswer;
use serde::{Deserialize, Serialize};

/// Display name assigned to addresses missing from the oracle directory.
pub const UNKNOWN_ORACLE_NAME: &str = "Unknown";

/// Kind of participant in a roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
	#[default]
	Oracle,
}

/// A named roster entry for one active oracle address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RosterEntry {
	/// Address as it appears in the active oracle list.
	pub address: String,
	/// Resolved display name.
	pub name: String,
	#[serde(rename = "type")]
	pub kind: ParticipantKind,
}

impl RosterEntry {
	/// Creates an oracle roster entry.
	pub fn oracle(address: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			address: address.into(),
			name: name.into(),
			kind: ParticipantKind::Oracle,
		}
	}
}

/// Final per-oracle view: the roster entry joined with its latest answer.
///
/// Serializes to a single flat object; answer fields are present only when
/// an answer from the oracle was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedOracleView {
	#[serde(flatten)]
	pub entry: RosterEntry,
	#[serde(flatten)]
	pub answer: Option<SubmittedAnswer>,
	/// Position of the entry in the sorted roster.
	pub id: usize,
	/// Whether the oracle has answered the pending round.
	pub is_fulfilled: bool,
}

impl DerivedOracleView {
	/// Joins a roster entry with the answer found for it, if any.
	///
	/// The entry is fulfilled only when an answer exists and belongs to the
	/// pending round or a later one.
	pub fn new(
		id: usize,
		entry: RosterEntry,
		answer: Option<SubmittedAnswer>,
		pending_answer_id: u64,
	) -> Self {
		let is_fulfilled = answer
			.as_ref()
			.is_some_and(|answer| answer.fulfills(pending_answer_id));
		Self {
			entry,
			answer,
			id,
			is_fulfilled,
		}
	}

	pub fn address(&self) -> &str {
		&self.entry.address
	}

	pub fn name(&self) -> &str {
		&self.entry.name
	}

	/// Round id of the merged answer, if any.
	pub fn answer_id(&self) -> Option<u64> {
		self.answer.as_ref().map(|answer| answer.answer_id)
	}
}

/// Fulfillment counts for a derived roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
	pub total: usize,
	pub fulfilled: usize,
	pub pending: usize,
}

impl RoundSummary {
	pub fn from_views(views: &[DerivedOracleView]) -> Self {
		let fulfilled = views.iter().filter(|view| view.is_fulfilled).count();
		Self {
			total: views.len(),
			fulfilled,
			pending: views.len() - fulfilled,
		}
	}
}
