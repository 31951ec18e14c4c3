//! Tagged unions and nested structs shared by the oracle program's accounts
//! and instructions.

use sbv2_layout::marker_enum;
use sbv2_layout::record;

marker_enum! {
	/// A capability a queue authority grants through a permission account.
	///
	/// On the wire the tag is the variant's position. The bit it occupies in a
	/// permission account is [`bit`](Self::bit).
	pub enum SwitchboardPermission {
		PermitOracleHeartbeat = 0,
		PermitOracleQueueUsage = 1,
		PermitVrfRequests = 2,
	}
}

impl SwitchboardPermission {
	pub const ALL: [Self; 3] = [
		Self::PermitOracleHeartbeat,
		Self::PermitOracleQueueUsage,
		Self::PermitVrfRequests,
	];

	/// The bit this permission occupies in
	/// [`PermissionAccountData::permissions`](crate::PermissionAccountData).
	pub const fn bit(self) -> u32 {
		1 << self.tag()
	}

	/// Whether `permissions` carries this permission.
	pub const fn is_granted(self, permissions: u32) -> bool {
		permissions & self.bit() == self.bit()
	}
}

marker_enum! {
	/// Outcome of an enclave quote verification.
	///
	/// Transitions are enforced on chain. Any tag can be decoded here.
	pub enum VerificationStatus {
		VerificationPending = 0,
		VerificationFailure = 1,
		VerificationSuccess = 2,
		VerificationOverride = 3,
	}
}

record! {
	#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
	pub struct Hash {
		pub data: [u8; 32],
	}
}

record! {
	/// Running response counters of an oracle.
	#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
	pub struct OracleMetrics {
		pub consecutive_success: u64,
		pub consecutive_error: u64,
		pub consecutive_disagreement: u64,
		pub consecutive_late_response: u64,
		pub consecutive_failure: u64,
		pub total_success: u128,
		pub total_error: u128,
		pub total_disagreement: u128,
		pub total_late_response: u128,
	}
}

record! {
	#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
	pub struct OracleHeartbeatParams {
		pub permission_bump: u8,
	}
}

record! {
	#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
	pub struct LeaseWithdrawParams {
		pub state_bump: u8,
		pub lease_bump: u8,
		pub amount: u64,
	}
}

record! {
	#[derive(Clone, Copy, Debug, PartialEq, Eq)]
	pub struct CrankPushParams {
		pub state_bump: u8,
		pub permission_bump: u8,
		/// Optional notification reference forwarded to the crank.
		pub notifi_ref: Option<[u8; 64]>,
	}
}

record! {
	#[derive(Clone, Copy, Debug, PartialEq, Eq)]
	pub struct PermissionSetParams {
		pub permission: SwitchboardPermission,
		pub enable: bool,
	}
}

record! {
	#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
	pub struct VaultTransferParams {
		pub state_bump: u8,
		pub amount: u64,
	}
}

record! {
	#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
	pub struct AggregatorOpenRoundParams {
		pub state_bump: u8,
		pub lease_bump: u8,
		pub permission_bump: u8,
		pub jitter: u8,
	}
}

record! {
	#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
	pub struct LeaseSetAuthorityParams {}
}

record! {
	#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
	pub struct AggregatorSetQueueParams {}
}
