//! Submitted answer types.

use serde::{Deserialize, Serialize};

/// On-chain metadata of the transaction that carried an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerMeta {
	#[serde(alias = "blockNumer")]
	pub block_number: u64,
	pub transaction_hash: String,
	pub timestamp: u64,
	pub gas_price: String,
}

/// An answer submitted by an oracle in the current or a previous round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
	/// Address the answer was submitted from.
	pub sender: String,
	/// Round the answer belongs to.
	pub answer_id: u64,
	/// Raw answer value.
	pub answer: f64,
	/// Answer formatted for display.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub answer_formatted: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<AnswerMeta>,
}

impl SubmittedAnswer {
	/// Creates an answer without formatting or transaction metadata.
	pub fn new(sender: impl Into<String>, answer_id: u64, answer: f64) -> Self {
		Self {
			sender: sender.into(),
			answer_id,
			answer,
			answer_formatted: None,
			meta: None,
		}
	}

	/// Returns true if this answer was submitted for the pending round or later.
	pub fn fulfills(&self, pending_answer_id: u64) -> bool {
		self.answer_id >= pending_answer_id
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_fulfills_threshold() {
		let answer = SubmittedAnswer::new("0xb", 5, 100.0);
		assert!(answer.fulfills(4));
		assert!(answer.fulfills(5));
		assert!(!answer.fulfills(6));
	}

	#[test]
	fn test_deserialize_full_answer() {
		let answer: SubmittedAnswer = serde_json::from_value(json!({
			"sender": "0xAbC",
			"answerId": 12,
			"answer": 2345.5,
			"answerFormatted": "2,345.50",
			"meta": {
				"blockNumer": 9000001,
				"transactionHash": "0xdeadbeef",
				"timestamp": 1590000000,
				"gasPrice": "20.0"
			}
		}))
		.unwrap();

		assert_eq!(answer.answer_id, 12);
		assert_eq!(answer.answer_formatted.as_deref(), Some("2,345.50"));
		let meta = answer.meta.unwrap();
		assert_eq!(meta.block_number, 9000001);
		assert_eq!(meta.gas_price, "20.0");
	}

	#[test]
	fn test_partial_answer_omits_absent_fields() {
		let answer: SubmittedAnswer =
			serde_json::from_value(json!({ "sender": "0xb", "answerId": 5, "answer": 100 }))
				.unwrap();
		assert!(answer.meta.is_none());

		let value = serde_json::to_value(&answer).unwrap();
		assert_eq!(
			value,
			json!({ "sender": "0xb", "answerId": 5, "answer": 100.0 })
		);
	}
}
