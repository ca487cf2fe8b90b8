//! Address helpers shared by the derivation stages and the service.

pub mod formatting;

pub use formatting::{address_key, addresses_match, truncate_id, with_0x_prefix, without_0x_prefix};
