//! Input snapshot handed to the derivation pipeline.

use crate::{OracleDirectory, SubmittedAnswer};
use serde::{Deserialize, Serialize};

/// Read-only view of aggregator state at one point in time.
///
/// Both lists may be absent while the surrounding application is still
/// loading them; absent lists derive to an empty roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleSnapshot {
	#[serde(default)]
	pub oracle_directory: OracleDirectory,
	#[serde(default)]
	pub active_oracle_list: Option<Vec<String>>,
	#[serde(default)]
	pub submitted_answers: Option<Vec<SubmittedAnswer>>,
	#[serde(default)]
	pub pending_answer_id: u64,
}

impl OracleSnapshot {
	/// Active oracle addresses, empty when the list is absent.
	pub fn active_oracles(&self) -> &[String] {
		self.active_oracle_list.as_deref().unwrap_or_default()
	}

	/// Submitted answers, empty when the list is absent.
	pub fn answers(&self) -> &[SubmittedAnswer] {
		self.submitted_answers.as_deref().unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_snapshot_from_json() {
		let snapshot: OracleSnapshot = serde_json::from_value(json!({
			"oracleDirectory": { "0xA": { "name": "Acme", "aliasAddresses": ["0xB"] } },
			"activeOracleList": ["0xB"],
			"submittedAnswers": [{ "sender": "0xb", "answerId": 5, "answer": 100 }],
			"pendingAnswerId": 4
		}))
		.unwrap();

		assert_eq!(snapshot.active_oracles(), ["0xB".to_string()]);
		assert_eq!(snapshot.answers().len(), 1);
		assert_eq!(snapshot.pending_answer_id, 4);
		assert_eq!(snapshot.oracle_directory.len(), 1);
	}

	#[test]
	fn test_absent_lists_read_as_empty() {
		let snapshot: OracleSnapshot = serde_json::from_value(json!({})).unwrap();
		assert!(snapshot.active_oracle_list.is_none());
		assert!(snapshot.active_oracles().is_empty());
		assert!(snapshot.answers().is_empty());
		assert!(snapshot.oracle_directory.is_empty());
	}
}
