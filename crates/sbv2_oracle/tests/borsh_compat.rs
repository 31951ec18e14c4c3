//! The codec must produce the same bytes as borsh for every layout the
//! program declares. The mirrors below are plain borsh structs.

use borsh::BorshDeserialize;
use borsh::BorshSerialize;
use proptest::prelude::*;
use sbv2_layout::Pubkey;
use sbv2_oracle::prelude::*;
use sbv2_oracle::*;

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
enum PermissionMirror {
	PermitOracleHeartbeat,
	PermitOracleQueueUsage,
	PermitVrfRequests,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct PermissionSetMirror {
	permission: PermissionMirror,
	enable: bool,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct CrankPushMirror {
	state_bump: u8,
	permission_bump: u8,
	notifi_ref: Option<[u8; 64]>,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct MetricsMirror {
	consecutive: [u64; 5],
	total: [u128; 4],
}

#[derive(BorshSerialize, BorshDeserialize)]
struct OracleMirror {
	name: [u8; 32],
	metadata: [u8; 128],
	oracle_authority: [u8; 32],
	last_heartbeat: i64,
	num_in_use: u32,
	token_account: [u8; 32],
	queue_pubkey: [u8; 32],
	metrics: MetricsMirror,
	bump: u8,
	ebuf: [u8; 255],
}

#[derive(BorshSerialize, BorshDeserialize)]
struct SbStateMirror {
	authority: [u8; 32],
	token_mint: [u8; 32],
	token_vault: [u8; 32],
	dao_mint: [u8; 32],
	bump: u8,
	mr_enclaves: [[u8; 32]; 6],
	ebuf: [u8; 799],
}

fn borsh_bytes(value: &impl BorshSerialize) -> Vec<u8> {
	borsh::to_vec(value).unwrap_or_else(|error| panic!("borsh failed: {error}"))
}

fn without_discriminator(wire: &[u8]) -> &[u8] {
	&wire[8..]
}

fn permission() -> impl Strategy<Value = (SwitchboardPermission, PermissionMirror)> {
	prop_oneof![
		Just((
			SwitchboardPermission::PermitOracleHeartbeat,
			PermissionMirror::PermitOracleHeartbeat
		)),
		Just((
			SwitchboardPermission::PermitOracleQueueUsage,
			PermissionMirror::PermitOracleQueueUsage
		)),
		Just((
			SwitchboardPermission::PermitVrfRequests,
			PermissionMirror::PermitVrfRequests
		)),
	]
}

// ---------------------------------------------------------------------------
// Instruction parameters
// ---------------------------------------------------------------------------

proptest! {
	#[test]
	fn permission_set_matches_borsh((ours, mirror) in permission(), enable: bool) {
		let wire = PermissionSet {
			params: PermissionSetParams { permission: ours, enable },
		}
		.to_wire()
		.unwrap_or_else(|error| panic!("encode failed: {error}"));

		let expected = borsh_bytes(&PermissionSetMirror { permission: mirror, enable });
		prop_assert_eq!(without_discriminator(&wire), expected.as_slice());
	}

	#[test]
	fn crank_push_matches_borsh(
		state_bump: u8,
		permission_bump: u8,
		notifi_ref in proptest::option::of(any::<[u8; 32]>()),
	) {
		let notifi_ref = notifi_ref.map(|half| {
			let mut full = [0; 64];
			full[..32].copy_from_slice(&half);
			full[32..].copy_from_slice(&half);
			full
		});

		let ours = CrankPush {
			params: CrankPushParams { state_bump, permission_bump, notifi_ref },
		};
		let wire = ours.to_wire().unwrap_or_else(|error| panic!("encode failed: {error}"));
		let expected = borsh_bytes(&CrankPushMirror { state_bump, permission_bump, notifi_ref });

		prop_assert_eq!(without_discriminator(&wire), expected.as_slice());
		prop_assert_eq!(CrankPush::from_wire(&wire), Ok(ours));
	}

	#[test]
	fn lease_withdraw_matches_borsh(state_bump: u8, lease_bump: u8, amount: u64) {
		let wire = LeaseWithdraw {
			params: LeaseWithdrawParams { state_bump, lease_bump, amount },
		}
		.to_wire()
		.unwrap_or_else(|error| panic!("encode failed: {error}"));

		let expected = borsh_bytes(&(state_bump, lease_bump, amount));
		prop_assert_eq!(without_discriminator(&wire), expected.as_slice());
	}
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

proptest! {
	#[test]
	fn oracle_account_matches_borsh(
		last_heartbeat: i64,
		num_in_use: u32,
		consecutive: [u64; 5],
		total: [u128; 4],
		bump: u8,
		authority: [u8; 32],
	) {
		let ours = OracleAccountData {
			name: [1; 32],
			metadata: [2; 128],
			oracle_authority: Pubkey::new_from_array(authority),
			last_heartbeat,
			num_in_use,
			token_account: Pubkey::new_from_array([3; 32]),
			queue_pubkey: Pubkey::new_from_array([4; 32]),
			metrics: OracleMetrics {
				consecutive_success: consecutive[0],
				consecutive_error: consecutive[1],
				consecutive_disagreement: consecutive[2],
				consecutive_late_response: consecutive[3],
				consecutive_failure: consecutive[4],
				total_success: total[0],
				total_error: total[1],
				total_disagreement: total[2],
				total_late_response: total[3],
			},
			bump,
			ebuf: [0; 255],
		};

		let mirror = OracleMirror {
			name: [1; 32],
			metadata: [2; 128],
			oracle_authority: authority,
			last_heartbeat,
			num_in_use,
			token_account: [3; 32],
			queue_pubkey: [4; 32],
			metrics: MetricsMirror { consecutive, total },
			bump,
			ebuf: [0; 255],
		};

		let wire = ours.to_wire().unwrap_or_else(|error| panic!("encode failed: {error}"));
		let expected = borsh_bytes(&mirror);
		prop_assert_eq!(without_discriminator(&wire), expected.as_slice());
	}
}

#[test]
fn borsh_written_state_decodes() {
	let mirror = SbStateMirror {
		authority: [1; 32],
		token_mint: [2; 32],
		token_vault: [3; 32],
		dao_mint: [4; 32],
		bump: 250,
		mr_enclaves: [[5; 32]; 6],
		ebuf: [0; 799],
	};

	let mut wire = SbState::DISCRIMINATOR.to_bytes().to_vec();
	wire.extend(borsh_bytes(&mirror));
	assert_eq!(wire.len(), 1128);

	let state = SbState::from_wire(&wire).unwrap();
	assert_eq!(state.authority, Pubkey::new_from_array([1; 32]));
	assert_eq!(state.dao_mint, Pubkey::new_from_array([4; 32]));
	assert_eq!(state.bump, 250);
	assert_eq!(state.mr_enclaves, [[5; 32]; 6]);
}

#[test]
fn borsh_written_permissions_decode() {
	for (ours, mirror) in [
		(
			SwitchboardPermission::PermitOracleHeartbeat,
			PermissionMirror::PermitOracleHeartbeat,
		),
		(
			SwitchboardPermission::PermitOracleQueueUsage,
			PermissionMirror::PermitOracleQueueUsage,
		),
		(
			SwitchboardPermission::PermitVrfRequests,
			PermissionMirror::PermitVrfRequests,
		),
	] {
		let bytes = borsh_bytes(&mirror);
		let decoded = SwitchboardPermission::layout().decode(&bytes).unwrap();
		assert_eq!(SwitchboardPermission::from_value(&decoded), Ok(ours));
	}

	assert!(PermissionMirror::try_from_slice(&[3]).is_err());
	assert!(SwitchboardPermission::layout().decode(&[3]).is_err());
}
