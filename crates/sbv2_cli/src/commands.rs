use comfy_table::Table;
use sbv2_layout::AccountSource;
use sbv2_layout::Fields;
use sbv2_layout::MemoryAccountSource;
use sbv2_layout::Pubkey;
use sbv2_layout::Record;
use sbv2_layout::Schema;
use sbv2_layout::SchemaKind;
use sbv2_layout::SchemaRegistry;
use sbv2_layout::build_instruction;
use sbv2_layout::load_record;
use sbv2_layout::pubkey_from_base58;
use sbv2_oracle::OracleAccountData;
use sbv2_oracle::PermissionAccountData;
use sbv2_oracle::SbState;
use sbv2_oracle::TaskSpecRecord;
use serde_json::Value as Json;
use serde_json::json;

use crate::error::CliError;
use crate::hex::hex_encode;

/// Table of every registered schema.
pub fn schemas_table(registry: &SchemaRegistry) -> String {
	let mut table = Table::new();
	table.set_header(vec!["name", "kind", "discriminator", "size"]);

	for schema in registry.iter() {
		let size = if schema.layout().is_fixed() {
			schema.wire_size().to_string()
		} else {
			format!("<= {}", schema.wire_size())
		};

		table.add_row(vec![
			schema.name().to_owned(),
			schema.kind().to_string(),
			schema.discriminator().to_string(),
			size,
		]);
	}

	table.to_string()
}

pub fn schemas_json(registry: &SchemaRegistry) -> Json {
	registry
		.iter()
		.map(|schema| {
			json!({
				"name": schema.name(),
				"kind": schema.kind().as_str(),
				"discriminator": schema.discriminator().to_string(),
				"size": schema.wire_size(),
				"fixed": schema.layout().is_fixed(),
			})
		})
		.collect()
}

pub fn lookup<'r>(registry: &'r SchemaRegistry, name: &str) -> Result<&'r Schema, CliError> {
	registry.get(name).ok_or_else(|| {
		CliError::UnknownSchema {
			name: name.to_owned(),
		}
	})
}

fn expect_kind(schema: &Schema, expected: SchemaKind) -> Result<(), CliError> {
	if schema.kind() == expected {
		Ok(())
	} else {
		Err(CliError::WrongKind {
			name: schema.name().to_owned(),
			expected: expected.as_str(),
			actual: schema.kind().as_str(),
		})
	}
}

fn describe(schema: &Schema, fields: &Fields) -> Result<Json, CliError> {
	Ok(json!({
		"schema": schema.name(),
		"kind": schema.kind().as_str(),
		"discriminator": schema.discriminator().to_string(),
		"fields": schema.layout().project(fields)?,
	}))
}

/// Decode a wire record, by name or by sniffing its discriminator.
///
/// Trailing bytes past the record are reported, not rejected.
pub fn decode(
	registry: &SchemaRegistry,
	schema: Option<&str>,
	bytes: &[u8],
) -> Result<Json, CliError> {
	let schema = match schema {
		Some(name) => lookup(registry, name)?,
		None => registry.resolve(bytes)?,
	};

	let inspection = schema.inspect_wire(bytes)?;
	if inspection.trailing_nonzero {
		log::warn!(
			"{} trailing bytes after `{}` are not all zero",
			inspection.trailing,
			schema.name()
		);
	}

	let mut output = describe(schema, &inspection.fields)?;
	output["trailing"] = json!({
		"len": inspection.trailing,
		"nonzero": inspection.trailing_nonzero,
	});
	Ok(output)
}

/// Encode JSON fields as a wire record.
pub fn encode(registry: &SchemaRegistry, schema: &str, fields: &Json) -> Result<Vec<u8>, CliError> {
	let schema = lookup(registry, schema)?;
	let fields = schema.layout().fields_from_json(fields)?;
	Ok(schema.to_wire(&fields)?)
}

/// Build an instruction payload. `accounts` are base58 keys in the
/// instruction's account order.
pub fn instruction(
	registry: &SchemaRegistry,
	schema: &str,
	fields: &Json,
	accounts: &[String],
	program_id: Pubkey,
) -> Result<Json, CliError> {
	let schema = lookup(registry, schema)?;
	expect_kind(schema, SchemaKind::Instruction)?;

	let roles = sbv2_oracle::account_roles(schema.name()).ok_or_else(|| {
		CliError::UnknownSchema {
			name: schema.name().to_owned(),
		}
	})?;

	if roles.len() != accounts.len() {
		return Err(CliError::AccountCount {
			schema: schema.name().to_owned(),
			expected: roles.len(),
			found: accounts.len(),
		});
	}

	let metas = roles
		.iter()
		.zip(accounts)
		.map(|(role, account)| pubkey_from_base58(account).map(|pubkey| role.meta(pubkey)))
		.collect::<Result<Vec<_>, _>>()?;

	let fields = schema.layout().fields_from_json(fields)?;
	let instruction = build_instruction(schema, &fields, metas, program_id)?;

	Ok(json!({
		"program_id": instruction.program_id.to_string(),
		"accounts": instruction
			.accounts
			.iter()
			.map(|meta| {
				json!({
					"pubkey": meta.pubkey.to_string(),
					"is_signer": meta.is_signer,
					"is_writable": meta.is_writable,
				})
			})
			.collect::<Vec<_>>(),
		"data": hex_encode(&instruction.data),
	}))
}

/// Load one account from `source`, check its owner and decode it.
///
/// With a schema name the account is loaded as that record; otherwise its
/// discriminator picks the schema.
pub fn fetch(
	registry: &SchemaRegistry,
	source: &MemoryAccountSource,
	address: &Pubkey,
	program_id: &Pubkey,
	schema: Option<&str>,
) -> Result<Option<Json>, CliError> {
	let fields = match schema {
		Some(name) => {
			let schema = lookup(registry, name)?;
			expect_kind(schema, SchemaKind::Account)?;
			load_as(schema.name(), source, address, program_id)?
		}
		None => load_sniffed(registry, source, address, program_id)?,
	};

	fields
		.map(|(name, fields)| describe(lookup(registry, name)?, &fields))
		.transpose()
}

type Loaded<'a> = Option<(&'a str, Fields)>;

fn load_as<'a>(
	name: &'a str,
	source: &MemoryAccountSource,
	address: &Pubkey,
	program_id: &Pubkey,
) -> Result<Loaded<'a>, CliError> {
	fn typed<T: Record>(
		source: &MemoryAccountSource,
		address: &Pubkey,
		program_id: &Pubkey,
	) -> Result<Option<Fields>, CliError> {
		Ok(load_record::<T, _>(source, address, program_id)?.map(|record| record.to_fields()))
	}

	let fields = match name {
		SbState::NAME => typed::<SbState>(source, address, program_id)?,
		TaskSpecRecord::NAME => typed::<TaskSpecRecord>(source, address, program_id)?,
		OracleAccountData::NAME => typed::<OracleAccountData>(source, address, program_id)?,
		PermissionAccountData::NAME => typed::<PermissionAccountData>(source, address, program_id)?,
		other => {
			return Err(CliError::UnknownSchema {
				name: other.to_owned(),
			});
		}
	};

	Ok(fields.map(|fields| (name, fields)))
}

fn load_sniffed<'r>(
	registry: &'r SchemaRegistry,
	source: &MemoryAccountSource,
	address: &Pubkey,
	program_id: &Pubkey,
) -> Result<Loaded<'r>, CliError> {
	let Ok(account) = source.fetch_account(address);
	let Some(account) = account else {
		return Ok(None);
	};

	if account.owner != *program_id {
		return Err(sbv2_layout::FetchError::OwnerMismatch {
			address: *address,
			owner: account.owner,
			program_id: *program_id,
		}
		.into());
	}

	let (schema, fields) = registry.decode_any(&account.data)?;
	Ok(Some((schema.name(), fields)))
}
