use solana_instruction::AccountMeta;
use solana_instruction::Instruction;
use solana_pubkey::Pubkey;

use crate::error::LayoutError;
use crate::schema::Schema;
use crate::schema::SchemaKind;
use crate::value::Fields;

/// How an instruction uses one of its accounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccountRole {
	Readonly,
	Writable,
	Signer,
	WritableSigner,
}

impl AccountRole {
	pub const fn is_signer(self) -> bool {
		matches!(self, Self::Signer | Self::WritableSigner)
	}

	pub const fn is_writable(self) -> bool {
		matches!(self, Self::Writable | Self::WritableSigner)
	}

	pub fn meta(self, pubkey: Pubkey) -> AccountMeta {
		if self.is_writable() {
			AccountMeta::new(pubkey, self.is_signer())
		} else {
			AccountMeta::new_readonly(pubkey, self.is_signer())
		}
	}
}

/// Attach `accounts` and `program_id` to the wire encoding of `fields`.
///
/// Account order is part of the program's interface and is used as given.
/// The only checks are that the schema describes an instruction and that at
/// least one account is supplied.
pub fn build_instruction(
	schema: &Schema,
	fields: &Fields,
	accounts: Vec<AccountMeta>,
	program_id: Pubkey,
) -> Result<Instruction, LayoutError> {
	if schema.kind() != SchemaKind::Instruction {
		return Err(invalid(schema, format!("`{}` is an account schema", schema.name())));
	}

	if accounts.is_empty() {
		return Err(invalid(schema, "no accounts were supplied"));
	}

	Ok(Instruction {
		program_id,
		accounts,
		data: schema.to_wire(fields)?,
	})
}

fn invalid(schema: &Schema, reason: impl Into<String>) -> LayoutError {
	LayoutError::InvalidInstruction {
		schema: schema.name().to_owned(),
		reason: reason.into(),
	}
}
