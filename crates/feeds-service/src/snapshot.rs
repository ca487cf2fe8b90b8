//! Loading of aggregator state snapshots from JSON files.

use feeds_types::{OracleDirectory, OracleSnapshot};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while reading a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Invalid snapshot: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Reads a snapshot in the camelCase JSON shape produced by the frontend state.
pub async fn load_snapshot(path: &Path) -> Result<OracleSnapshot, SnapshotError> {
	let content = tokio::fs::read_to_string(path).await?;
	let snapshot: OracleSnapshot = serde_json::from_str(&content)?;
	tracing::debug!(
		path = %path.display(),
		active = snapshot.active_oracles().len(),
		answers = snapshot.answers().len(),
		"Loaded snapshot"
	);
	Ok(snapshot)
}

/// Fills in the configured oracle directory when the snapshot carries none.
pub fn with_configured_directory(
	mut snapshot: OracleSnapshot,
	configured: OracleDirectory,
) -> OracleSnapshot {
	if snapshot.oracle_directory.is_empty() {
		snapshot.oracle_directory = configured;
	}
	snapshot
}
