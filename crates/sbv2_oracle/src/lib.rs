//! Account and instruction layouts of the Switchboard v2 oracle program.
//!
//! Every account and instruction here is a typed [`Record`]: encode it with
//! [`Record::to_wire`], decode it with [`Record::from_wire`], or build a full
//! instruction with the builder function of the same name
//! ([`oracle_heartbeat`], [`lease_withdraw`], ...).
//!
//! [`registry`] holds the schema of every record, for callers that only have
//! raw bytes and need to find out what they are looking at.
//!
//! ```ignore
//! use sbv2_oracle::*;
//!
//! let (schema, fields) = registry()?.decode_any(&account_data)?;
//! println!("{} {:?}", schema.name(), fields);
//! ```

use std::sync::OnceLock;

use sbv2_layout::LayoutError;
use sbv2_layout::Record;
use sbv2_layout::Schema;
use sbv2_layout::SchemaRegistry;

mod accounts;
mod instructions;
mod pda;
mod program;
mod types;

pub use sbv2_layout;
pub use sbv2_layout::prelude;

pub use crate::accounts::*;
pub use crate::instructions::*;
pub use crate::pda::*;
pub use crate::program::*;
pub use crate::types::*;

/// Schemas of every account and instruction, in registration order.
pub fn schemas() -> Vec<Schema> {
	vec![
		SbState::schema(),
		TaskSpecRecord::schema(),
		OracleAccountData::schema(),
		PermissionAccountData::schema(),
		OracleHeartbeat::schema(),
		LeaseWithdraw::schema(),
		CrankPush::schema(),
		PermissionSet::schema(),
		VaultTransfer::schema(),
		AggregatorOpenRound::schema(),
		LeaseSetAuthority::schema(),
		AggregatorSetQueue::schema(),
	]
}

/// Build a fresh registry of [`schemas`].
pub fn build_registry() -> Result<SchemaRegistry, LayoutError> {
	SchemaRegistry::try_from_schemas(schemas())
}

/// The process-wide registry, built on first use.
///
/// A registration failure is kept and returned to every caller.
pub fn registry() -> Result<&'static SchemaRegistry, LayoutError> {
	static REGISTRY: OnceLock<Result<SchemaRegistry, LayoutError>> = OnceLock::new();

	REGISTRY.get_or_init(build_registry).as_ref().map_err(Clone::clone)
}
