use std::convert::Infallible;
use std::path::PathBuf;

use sbv2_layout::FetchError;
use sbv2_layout::LayoutError;
use sbv2_layout::Pubkey;

/// Errors reported by the `sbv2` commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
	#[error("IO error at {path}: {source}")]
	Io {
		path: PathBuf,
		source: std::io::Error,
	},

	#[error("Invalid JSON in {origin}: {source}")]
	Json {
		origin: String,
		source: serde_json::Error,
	},

	#[error("Invalid hex: {0}")]
	Hex(String),

	#[error("Unknown schema `{name}`. Run `sbv2 schemas` to list them")]
	UnknownSchema { name: String },

	#[error("`{name}` is an {actual} schema, expected an {expected} schema")]
	WrongKind {
		name: String,
		expected: &'static str,
		actual: &'static str,
	},

	#[error("`{schema}` takes {expected} accounts, {found} were given")]
	AccountCount {
		schema: String,
		expected: usize,
		found: usize,
	},

	#[error("Account {address} not found in {path}")]
	AccountNotFound { address: Pubkey, path: PathBuf },

	#[error(transparent)]
	Layout(#[from] LayoutError),

	#[error(transparent)]
	Fetch(#[from] FetchError<Infallible>),
}

impl CliError {
	pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}

	pub fn json(origin: impl Into<String>, source: serde_json::Error) -> Self {
		Self::Json {
			origin: origin.into(),
			source,
		}
	}
}
