//! Instruction payloads of the oracle program.
//!
//! Each instruction carries a single `params` struct after its discriminator
//! and takes a fixed, ordered list of accounts. The account lists below are
//! the program's interface; do not reorder them.

use sbv2_layout::Instruction;
use sbv2_layout::LayoutError;
use sbv2_layout::Pubkey;
use sbv2_layout::Record;
use sbv2_layout::StructCodec;
use sbv2_layout::build_instruction;
use sbv2_layout::instruction_accounts;

use crate::types::AggregatorOpenRoundParams;
use crate::types::AggregatorSetQueueParams;
use crate::types::CrankPushParams;
use crate::types::LeaseSetAuthorityParams;
use crate::types::LeaseWithdrawParams;
use crate::types::OracleHeartbeatParams;
use crate::types::PermissionSetParams;
use crate::types::VaultTransferParams;

/// Declares the instruction record, binds it to its discriminator and writes
/// a builder that pairs it with its account list.
macro_rules! oracle_instruction {
	(
		$(#[$meta:meta])*
		fn $builder:ident($record:ident { params: $params:ty }, $accounts:ty)
		=> [$($byte:literal),* $(,)?];
	) => {
		sbv2_layout::record! {
			#[derive(Clone, Copy, Debug, PartialEq, Eq)]
			pub struct $record {
				pub params: $params,
			}
		}

		sbv2_layout::impl_record!($record, Instruction, stringify!($builder), [$($byte),*]);

		$(#[$meta])*
		pub fn $builder(
			params: $params,
			accounts: &$accounts,
			program_id: &Pubkey,
		) -> Result<Instruction, LayoutError> {
			build_instruction(
				&<$record as Record>::schema(),
				&$record { params }.to_fields(),
				accounts.to_account_metas(),
				*program_id,
			)
		}
	};
}

instruction_accounts! {
	pub struct OracleHeartbeatAccounts {
		oracle: Writable,
		oracle_authority: Signer,
		token_account: Readonly,
		/// The oracle at the front of the queue's garbage collection cursor.
		gc_oracle: Writable,
		oracle_queue: Writable,
		permission: Readonly,
		data_buffer: Writable,
	}
}

oracle_instruction! {
	/// Report an oracle as alive to its queue.
	fn oracle_heartbeat(OracleHeartbeat { params: OracleHeartbeatParams }, OracleHeartbeatAccounts)
		=> [10, 175, 217, 130, 111, 35, 117, 54];
}

instruction_accounts! {
	pub struct LeaseWithdrawAccounts {
		lease: Writable,
		escrow: Writable,
		aggregator: Readonly,
		queue: Readonly,
		withdraw_authority: Signer,
		withdraw_account: Writable,
		token_program: Readonly,
		program_state: Readonly,
		mint: Readonly,
	}
}

oracle_instruction! {
	/// Move funds out of a lease escrow.
	fn lease_withdraw(LeaseWithdraw { params: LeaseWithdrawParams }, LeaseWithdrawAccounts)
		=> [186, 41, 100, 248, 234, 81, 61, 169];
}

instruction_accounts! {
	pub struct CrankPushAccounts {
		crank: Writable,
		aggregator: Writable,
		oracle_queue: Writable,
		queue_authority: Readonly,
		permission: Readonly,
		lease: Writable,
		escrow: Writable,
		program_state: Readonly,
		data_buffer: Writable,
	}
}

oracle_instruction! {
	/// Schedule an aggregator on a crank.
	fn crank_push(CrankPush { params: CrankPushParams }, CrankPushAccounts)
		=> [155, 175, 160, 18, 7, 147, 249, 16];
}

instruction_accounts! {
	pub struct PermissionSetAccounts {
		permission: Writable,
		authority: Signer,
	}
}

oracle_instruction! {
	fn permission_set(PermissionSet { params: PermissionSetParams }, PermissionSetAccounts)
		=> [211, 122, 185, 120, 129, 182, 55, 103];
}

instruction_accounts! {
	pub struct VaultTransferAccounts {
		state: Readonly,
		authority: Signer,
		to: Writable,
		vault: Writable,
		token_program: Readonly,
	}
}

oracle_instruction! {
	/// Move funds out of the program vault. Only the state authority may sign.
	fn vault_transfer(VaultTransfer { params: VaultTransferParams }, VaultTransferAccounts)
		=> [211, 125, 3, 105, 45, 33, 227, 214];
}

instruction_accounts! {
	pub struct AggregatorOpenRoundAccounts {
		aggregator: Writable,
		lease: Writable,
		oracle_queue: Writable,
		queue_authority: Readonly,
		permission: Writable,
		escrow: Writable,
		program_state: Readonly,
		payout_wallet: Writable,
		token_program: Readonly,
		data_buffer: Readonly,
		mint: Readonly,
	}
}

oracle_instruction! {
	/// Request a new update round from the queue's oracles.
	fn aggregator_open_round(AggregatorOpenRound { params: AggregatorOpenRoundParams }, AggregatorOpenRoundAccounts)
		=> [239, 69, 229, 179, 156, 246, 118, 191];
}

instruction_accounts! {
	pub struct LeaseSetAuthorityAccounts {
		lease: Writable,
		withdraw_authority: Signer,
		new_authority: Readonly,
	}
}

oracle_instruction! {
	fn lease_set_authority(LeaseSetAuthority { params: LeaseSetAuthorityParams }, LeaseSetAuthorityAccounts)
		=> [255, 4, 88, 2, 213, 175, 87, 22];
}

instruction_accounts! {
	pub struct AggregatorSetQueueAccounts {
		aggregator: Writable,
		authority: Signer,
		queue: Readonly,
	}
}

oracle_instruction! {
	fn aggregator_set_queue(AggregatorSetQueue { params: AggregatorSetQueueParams }, AggregatorSetQueueAccounts)
		=> [111, 152, 142, 153, 206, 39, 22, 148];
}

/// Account roles of every instruction, keyed by schema name.
pub fn account_roles(instruction: &str) -> Option<&'static [sbv2_layout::AccountRole]> {
	let roles = match instruction {
		"oracle_heartbeat" => OracleHeartbeatAccounts::ROLES,
		"lease_withdraw" => LeaseWithdrawAccounts::ROLES,
		"crank_push" => CrankPushAccounts::ROLES,
		"permission_set" => PermissionSetAccounts::ROLES,
		"vault_transfer" => VaultTransferAccounts::ROLES,
		"aggregator_open_round" => AggregatorOpenRoundAccounts::ROLES,
		"lease_set_authority" => LeaseSetAuthorityAccounts::ROLES,
		"aggregator_set_queue" => AggregatorSetQueueAccounts::ROLES,
		_ => return None,
	};
	Some(roles)
}
