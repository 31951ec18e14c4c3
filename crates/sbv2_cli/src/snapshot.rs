//! Account snapshots exported to a JSON file.
//!
//! The file holds an array of accounts:
//!
//! ```json
//! [{ "address": "<base58>", "owner": "<base58>", "data": "<hex>" }]
//! ```

use std::fs;
use std::path::Path;

use sbv2_layout::AccountData;
use sbv2_layout::MemoryAccountSource;
use sbv2_layout::pubkey_from_base58;
use serde::Deserialize;

use crate::error::CliError;
use crate::hex::hex_decode;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotEntry {
	address: String,
	owner: String,
	data: String,
}

/// Parse snapshot JSON into an in-memory account source.
pub fn parse_snapshot(text: &str, origin: &str) -> Result<MemoryAccountSource, CliError> {
	let entries: Vec<SnapshotEntry> =
		serde_json::from_str(text).map_err(|source| CliError::json(origin, source))?;

	let mut source = MemoryAccountSource::new();
	for entry in entries {
		source.insert(
			pubkey_from_base58(&entry.address)?,
			AccountData {
				owner: pubkey_from_base58(&entry.owner)?,
				data: hex_decode(&entry.data)?,
			},
		);
	}

	log::debug!("loaded {} accounts from {origin}", source.len());
	Ok(source)
}

pub fn load_snapshot(path: &Path) -> Result<MemoryAccountSource, CliError> {
	let text = fs::read_to_string(path).map_err(|source| CliError::io(path, source))?;
	parse_snapshot(&text, &path.display().to_string())
}
