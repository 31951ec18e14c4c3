use std::collections::HashMap;
use std::convert::Infallible;

use solana_pubkey::Pubkey;

use crate::codec::Record;
use crate::error::LayoutError;

/// Raw account contents as returned by an RPC node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountData {
	pub owner: Pubkey,
	pub data: Vec<u8>,
}

/// Where account bytes come from, typically an RPC client.
///
/// Implementations own networking, retries and timeouts. `Ok(None)` means
/// the account does not exist.
pub trait AccountSource {
	type Error: core::error::Error + 'static;

	fn fetch_account(&self, address: &Pubkey) -> Result<Option<AccountData>, Self::Error>;

	/// Fetch several accounts, one result slot per address, in order.
	fn fetch_multiple_accounts(
		&self,
		addresses: &[Pubkey],
	) -> Result<Vec<Option<AccountData>>, Self::Error> {
		addresses
			.iter()
			.map(|address| self.fetch_account(address))
			.collect()
	}
}

/// Why loading a record failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError<E: core::error::Error + 'static> {
	#[error("failed to fetch {address}: {source}")]
	Source { address: Pubkey, source: E },

	#[error("failed to fetch a batch of {count} accounts: {source}")]
	SourceBatch { count: usize, source: E },

	#[error("asked for {expected} accounts, the source returned {found} slots")]
	SlotCount { expected: usize, found: usize },

	#[error("account {address} is owned by {owner}, not by program {program_id}")]
	OwnerMismatch {
		address: Pubkey,
		owner: Pubkey,
		program_id: Pubkey,
	},

	#[error("account {address} does not decode as `{schema}`: {source}")]
	Decode {
		address: Pubkey,
		schema: &'static str,
		source: LayoutError,
	},
}

/// Fetch and decode one record. Returns `Ok(None)` when the account does not
/// exist.
///
/// The owning program is checked before any byte of the account is read.
pub fn load_record<T: Record, S: AccountSource>(
	source: &S,
	address: &Pubkey,
	program_id: &Pubkey,
) -> Result<Option<T>, FetchError<S::Error>> {
	let account = source
		.fetch_account(address)
		.map_err(|source| FetchError::Source {
			address: *address,
			source,
		})?;

	account
		.map(|account| decode_owned(address, &account, program_id))
		.transpose()
}

/// Fetch and decode several records of the same type. Missing accounts map to
/// `None` in the matching slot; any other failure aborts the whole batch.
pub fn load_records<T: Record, S: AccountSource>(
	source: &S,
	addresses: &[Pubkey],
	program_id: &Pubkey,
) -> Result<Vec<Option<T>>, FetchError<S::Error>> {
	let accounts = source.fetch_multiple_accounts(addresses).map_err(|source| {
		FetchError::SourceBatch {
			count: addresses.len(),
			source,
		}
	})?;

	if accounts.len() != addresses.len() {
		return Err(FetchError::SlotCount {
			expected: addresses.len(),
			found: accounts.len(),
		});
	}

	addresses
		.iter()
		.zip(accounts)
		.map(|(address, account)| {
			account
				.map(|account| decode_owned(address, &account, program_id))
				.transpose()
		})
		.collect()
}

fn decode_owned<T: Record, E: core::error::Error + 'static>(
	address: &Pubkey,
	account: &AccountData,
	program_id: &Pubkey,
) -> Result<T, FetchError<E>> {
	if account.owner != *program_id {
		return Err(FetchError::OwnerMismatch {
			address: *address,
			owner: account.owner,
			program_id: *program_id,
		});
	}

	T::from_wire(&account.data).map_err(|source| FetchError::Decode {
		address: *address,
		schema: T::NAME,
		source,
	})
}

/// An in-process account store, for tests and offline snapshots.
#[derive(Clone, Debug, Default)]
pub struct MemoryAccountSource {
	accounts: HashMap<Pubkey, AccountData>,
}

impl MemoryAccountSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, address: Pubkey, account: AccountData) -> &mut Self {
		self.accounts.insert(address, account);
		self
	}

	pub fn len(&self) -> usize {
		self.accounts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.accounts.is_empty()
	}
}

impl AccountSource for MemoryAccountSource {
	type Error = Infallible;

	fn fetch_account(&self, address: &Pubkey) -> Result<Option<AccountData>, Self::Error> {
		Ok(self.accounts.get(address).cloned())
	}
}
