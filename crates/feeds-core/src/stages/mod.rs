//! Pure derivation stages.
//!
//! Each stage depends only on the output of the previous one:
//! directory -> [`AddressNameIndex`] -> roster -> oracle views.

pub mod index;
pub mod merge;
pub mod roster;

pub use index::AddressNameIndex;
pub use merge::merge_answers;
pub use roster::{build_roster, compare_names};
