//! Common types for the price feed oracle roster.
//!
//! This crate defines the input fragments (oracle directory, active oracle
//! list, submitted answers) and the derived roster types shared by the
//! derivation core, the configuration loader and the service binary.

/// Submitted answer types.
pub mod answer;
/// Oracle identity and directory types.
pub mod oracle;
/// Aggregator state snapshot consumed by the derivation.
pub mod snapshot;
/// Address helpers.
pub mod utils;
/// Roster entries and final oracle views.
pub mod view;

pub use answer::{AnswerMeta, SubmittedAnswer};
pub use oracle::{OracleDirectory, OracleIdentity, OracleRecord};
pub use snapshot::OracleSnapshot;
pub use utils::{address_key, addresses_match, truncate_id, with_0x_prefix, without_0x_prefix};
pub use view::{DerivedOracleView, ParticipantKind, RosterEntry, RoundSummary, UNKNOWN_ORACLE_NAME};
