//! Program derived addresses of the oracle program's singleton and keyed
//! accounts.
//!
//! Every helper returns `None` when no bump produces an off-curve address.

use sbv2_layout::Pubkey;

pub const STATE_SEED: &[u8] = b"STATE";
pub const ORACLE_SEED: &[u8] = b"OracleAccountData";
pub const PERMISSION_SEED: &[u8] = b"PermissionAccountData";

/// Find a program derived address and its bump seed.
#[inline]
pub fn try_find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Option<(Pubkey, u8)> {
	Pubkey::try_find_program_address(seeds, program_id)
}

/// The program's [`SbState`](crate::SbState) account.
pub fn program_state_address(program_id: &Pubkey) -> Option<(Pubkey, u8)> {
	try_find_program_address(&[STATE_SEED], program_id)
}

/// The [`OracleAccountData`](crate::OracleAccountData) a wallet runs on a
/// queue.
pub fn oracle_address(
	queue: &Pubkey,
	wallet: &Pubkey,
	program_id: &Pubkey,
) -> Option<(Pubkey, u8)> {
	try_find_program_address(
		&[ORACLE_SEED, queue.as_ref(), wallet.as_ref()],
		program_id,
	)
}

/// The [`PermissionAccountData`](crate::PermissionAccountData) through which
/// `granter` grants `grantee` a permission, managed by `authority`.
pub fn permission_address(
	authority: &Pubkey,
	granter: &Pubkey,
	grantee: &Pubkey,
	program_id: &Pubkey,
) -> Option<(Pubkey, u8)> {
	try_find_program_address(
		&[
			PERMISSION_SEED,
			authority.as_ref(),
			granter.as_ref(),
			grantee.as_ref(),
		],
		program_id,
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::MAINNET_PROGRAM_ID;

	#[test]
	fn derivation_is_deterministic_and_recreatable() {
		let (state, bump) = program_state_address(&MAINNET_PROGRAM_ID)
			.unwrap_or_else(|| panic!("expected to derive the state address"));
		assert_eq!(
			program_state_address(&MAINNET_PROGRAM_ID),
			Some((state, bump))
		);

		let recreated = Pubkey::create_program_address(&[STATE_SEED, &[bump]], &MAINNET_PROGRAM_ID)
			.unwrap_or_else(|err| panic!("failed to recreate pda: {err:?}"));
		assert_eq!(state, recreated);
	}

	#[test]
	fn seeds_distinguish_accounts() {
		let a = Pubkey::new_from_array([1; 32]);
		let b = Pubkey::new_from_array([2; 32]);
		let c = Pubkey::new_from_array([3; 32]);

		let forward = permission_address(&a, &b, &c, &MAINNET_PROGRAM_ID);
		let swapped = permission_address(&a, &c, &b, &MAINNET_PROGRAM_ID);
		assert!(forward.is_some());
		assert_ne!(forward, swapped);
		assert_ne!(
			oracle_address(&a, &b, &MAINNET_PROGRAM_ID),
			oracle_address(&b, &a, &MAINNET_PROGRAM_ID)
		);
	}
}
