//! Account layouts owned by the oracle program.

use sbv2_layout::Pubkey;
use sbv2_layout::impl_record;
use sbv2_layout::record;

use crate::types::Hash;
use crate::types::OracleMetrics;
use crate::types::SwitchboardPermission;

record! {
	/// Program-wide configuration, stored at [`program_state_address`](crate::program_state_address).
	#[derive(Clone, Debug, PartialEq, Eq)]
	pub struct SbState {
		pub authority: Pubkey,
		pub token_mint: Pubkey,
		pub token_vault: Pubkey,
		pub dao_mint: Pubkey,
		pub bump: u8,
		/// Measurements of the enclaves allowed to run oracles.
		pub mr_enclaves: [[u8; 32]; 6],
		pub ebuf: [u8; 799],
	}
}

impl_record!(SbState, Account, "SbState", [159, 42, 192, 191, 139, 62, 168, 28]);

record! {
	#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
	pub struct TaskSpecRecord {
		pub hash: Hash,
	}
}

impl_record!(TaskSpecRecord, Account, "TaskSpecRecord", [202, 10, 194, 236, 111, 47, 234, 48]);

record! {
	#[derive(Clone, Debug, PartialEq, Eq)]
	pub struct OracleAccountData {
		/// Utf-8, zero padded.
		pub name: [u8; 32],
		pub metadata: [u8; 128],
		pub oracle_authority: Pubkey,
		pub last_heartbeat: i64,
		pub num_in_use: u32,
		pub token_account: Pubkey,
		pub queue_pubkey: Pubkey,
		pub metrics: OracleMetrics,
		pub bump: u8,
		pub ebuf: [u8; 255],
	}
}

impl_record!(OracleAccountData, Account, "OracleAccountData", [128, 30, 16, 241, 170, 73, 55, 54]);

impl OracleAccountData {
	/// The name with its zero padding removed, if it is valid utf-8.
	pub fn name(&self) -> Option<&str> {
		trimmed_utf8(&self.name)
	}

	pub fn metadata(&self) -> Option<&str> {
		trimmed_utf8(&self.metadata)
	}
}

record! {
	#[derive(Clone, Debug, PartialEq, Eq)]
	pub struct PermissionAccountData {
		pub authority: Pubkey,
		/// Bitset of [`SwitchboardPermission::bit`] values.
		pub permissions: u32,
		pub granter: Pubkey,
		pub grantee: Pubkey,
		pub expiration: i64,
		pub bump: u8,
		pub ebuf: [u8; 256],
	}
}

impl_record!(PermissionAccountData, Account, "PermissionAccountData", [77, 37, 177, 164, 38, 39, 34, 109]);

impl PermissionAccountData {
	pub fn has(&self, permission: SwitchboardPermission) -> bool {
		permission.is_granted(self.permissions)
	}

	/// Permissions in tag order.
	pub fn granted(&self) -> Vec<SwitchboardPermission> {
		SwitchboardPermission::ALL
			.into_iter()
			.filter(|permission| self.has(*permission))
			.collect()
	}
}

fn trimmed_utf8(bytes: &[u8]) -> Option<&str> {
	let end = bytes
		.iter()
		.rposition(|byte| *byte != 0)
		.map_or(0, |index| index + 1);
	core::str::from_utf8(&bytes[..end]).ok()
}
