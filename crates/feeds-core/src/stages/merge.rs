//! Joins the sorted roster with the answers submitted so far.

use feeds_types::{address_key, DerivedOracleView, RosterEntry, SubmittedAnswer};
use std::collections::HashMap;

/// Annotates each roster entry with its answer and fulfillment status.
///
/// An entry's answer is the first one in `answers` whose sender equals the
/// entry address ignoring case. The entry is fulfilled when that answer was
/// given for `pending_answer_id` or a later round. Each view's `id` is its
/// position in the roster.
pub fn merge_answers(
	roster: &[RosterEntry],
	answers: &[SubmittedAnswer],
	pending_answer_id: u64,
) -> Vec<DerivedOracleView> {
	if roster.is_empty() {
		return Vec::new();
	}

	let mut by_sender: HashMap<String, &SubmittedAnswer> = HashMap::with_capacity(answers.len());
	for answer in answers {
		by_sender
			.entry(address_key(&answer.sender))
			.or_insert(answer);
	}

	roster
		.iter()
		.enumerate()
		.map(|(id, entry)| {
			let answer = by_sender.get(&address_key(&entry.address)).copied().cloned();
			DerivedOracleView::new(id, entry.clone(), answer, pending_answer_id)
		})
		.collect()
}
