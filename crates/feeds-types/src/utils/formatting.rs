//! String formatting utilities.
//!
//! Provides functions for hex prefix management, case-insensitive address
//! comparison and truncation of long identifiers for log output.

/// Shortens an address or hash for log fields.
///
/// Keeps the first 8 characters and appends ".." when the input is longer.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(8) {
		Some((cut, _)) => format!("{}..", &id[..cut]),
		None => id.to_string(),
	}
}

/// Adds a "0x" prefix to an address unless it already has one (in either case).
pub fn with_0x_prefix(address: &str) -> String {
	if address.starts_with("0x") || address.starts_with("0X") {
		address.to_string()
	} else {
		format!("0x{}", address)
	}
}

/// Strips a leading "0x" or "0X" from an address.
pub fn without_0x_prefix(address: &str) -> &str {
	address
		.strip_prefix("0x")
		.or_else(|| address.strip_prefix("0X"))
		.unwrap_or(address)
}

/// Compares two addresses ignoring ASCII case.
///
/// Only the letter case of the hex digits is normalized; no checksum
/// validation or numeric parsing takes place.
pub fn addresses_match(a: &str, b: &str) -> bool {
	a.eq_ignore_ascii_case(b)
}

/// Returns the case-normalized lookup key for an address.
pub fn address_key(address: &str) -> String {
	address.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("12345678"), "12345678");
		assert_eq!(truncate_id("123456789"), "12345678..");
		assert_eq!(truncate_id("0x1234567890abcdef"), "0x123456..");
	}

	#[test]
	fn test_prefix_helpers() {
		assert_eq!(with_0x_prefix("b1e2"), "0xb1e2");
		assert_eq!(with_0x_prefix("0xb1e2"), "0xb1e2");
		assert_eq!(with_0x_prefix("0Xb1e2"), "0Xb1e2");

		assert_eq!(without_0x_prefix("0xb1e2"), "b1e2");
		assert_eq!(without_0x_prefix("0Xb1e2"), "b1e2");
		assert_eq!(without_0x_prefix("b1e2"), "b1e2");
		assert_eq!(without_0x_prefix("0x"), "");
	}

	#[test]
	fn test_addresses_match_ignores_case() {
		assert!(addresses_match(
			"0x5FbDB2315678afecb367f032d93F642f64180aa3",
			"0x5fbdb2315678afecb367f032d93f642f64180aa3"
		));
		assert!(addresses_match("0xb", "0xB"));
		assert!(!addresses_match("0xb", "0xc"));
		assert!(!addresses_match("0xb", "b"));
	}

	#[test]
	fn test_address_key() {
		assert_eq!(
			address_key("0xE7f1725E7734CE288F8367e1Bb143E90bb3F0512"),
			"0xe7f1725e7734ce288f8367e1bb143e90bb3f0512"
		);
	}
}
