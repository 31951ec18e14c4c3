use core::fmt;

use sha2::Digest;
use sha2::Sha256;

use crate::error::LayoutError;
use crate::layout::StructLayout;
use crate::value::Fields;

/// The 8-byte prefix identifying a record type on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Discriminator(pub [u8; 8]);

impl Discriminator {
	pub const LEN: usize = 8;

	pub const fn new(bytes: [u8; 8]) -> Self {
		Self(bytes)
	}

	/// Anchor's account discriminator: `sha256("account:<Name>")[..8]`.
	pub fn for_account(name: &str) -> Self {
		Self::hashed("account", name)
	}

	/// Anchor's instruction discriminator: `sha256("global:<snake_name>")[..8]`.
	pub fn for_instruction(name: &str) -> Self {
		Self::hashed("global", name)
	}

	fn hashed(namespace: &str, name: &str) -> Self {
		let digest = Sha256::new()
			.chain_update(namespace)
			.chain_update(":")
			.chain_update(name)
			.finalize();

		let mut bytes = [0u8; 8];
		bytes.copy_from_slice(&digest[..8]);
		Self(bytes)
	}

	/// Read the leading discriminator of `data`.
	pub fn from_wire(data: &[u8]) -> Option<Self> {
		data.first_chunk::<8>().copied().map(Self)
	}

	/// Whether `data` starts with this discriminator.
	pub fn matches(&self, data: &[u8]) -> bool {
		data.starts_with(&self.0)
	}

	pub const fn to_bytes(self) -> [u8; 8] {
		self.0
	}
}

impl fmt::Display for Discriminator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for byte in self.0 {
			write!(f, "{byte:02x}")?;
		}
		Ok(())
	}
}

impl fmt::Debug for Discriminator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Discriminator({:?})", self.0)
	}
}

impl From<[u8; 8]> for Discriminator {
	fn from(bytes: [u8; 8]) -> Self {
		Self(bytes)
	}
}

/// Whether a schema describes account state or instruction data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaKind {
	Account,
	Instruction,
}

impl SchemaKind {
	/// The discriminator anchor derives for `name` in this namespace.
	pub fn discriminator_for(self, name: &str) -> Discriminator {
		match self {
			Self::Account => Discriminator::for_account(name),
			Self::Instruction => Discriminator::for_instruction(name),
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Account => "account",
			Self::Instruction => "instruction",
		}
	}
}

impl fmt::Display for SchemaKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A named record type: its discriminator and its top-level struct layout.
///
/// Wire records are `discriminator || struct bytes`. Schemas are immutable once
/// built; share them by reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
	name: String,
	kind: SchemaKind,
	discriminator: Discriminator,
	layout: StructLayout,
}

impl Schema {
	pub fn new(
		name: impl Into<String>,
		kind: SchemaKind,
		discriminator: Discriminator,
		layout: StructLayout,
	) -> Self {
		Self {
			name: name.into(),
			kind,
			discriminator,
			layout,
		}
	}

	/// A schema whose discriminator is derived from its name.
	pub fn anchor(name: impl Into<String>, kind: SchemaKind, layout: StructLayout) -> Self {
		let name = name.into();
		let discriminator = kind.discriminator_for(&name);
		Self::new(name, kind, discriminator, layout)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub const fn kind(&self) -> SchemaKind {
		self.kind
	}

	pub const fn discriminator(&self) -> Discriminator {
		self.discriminator
	}

	pub const fn layout(&self) -> &StructLayout {
		&self.layout
	}

	/// Maximum width of the struct bytes, without the discriminator.
	pub const fn size(&self) -> usize {
		self.layout.size()
	}

	/// Maximum width of a wire record.
	pub const fn wire_size(&self) -> usize {
		Discriminator::LEN + self.layout.size()
	}

	/// Encode the struct bytes without the discriminator.
	pub fn encode(&self, fields: &Fields) -> Result<Vec<u8>, LayoutError> {
		let mut buf = vec![0; self.size()];
		let written = self.layout.encode_into(fields, &mut buf, 0)?;
		buf.truncate(written);
		Ok(buf)
	}

	/// Decode struct bytes that carry no discriminator.
	pub fn decode(&self, bytes: &[u8]) -> Result<Fields, LayoutError> {
		self.layout.decode_from(bytes, 0).map(|(fields, _)| fields)
	}

	/// `discriminator || encode(fields)`.
	pub fn to_wire(&self, fields: &Fields) -> Result<Vec<u8>, LayoutError> {
		let mut buf = vec![0; self.wire_size()];
		buf[..Discriminator::LEN].copy_from_slice(&self.discriminator.0);
		let written = self
			.layout
			.encode_into(fields, &mut buf, Discriminator::LEN)?;
		buf.truncate(Discriminator::LEN + written);
		Ok(buf)
	}

	/// Check the discriminator, then decode the fields that follow it.
	///
	/// Nothing past the discriminator is read when it does not match. Bytes
	/// past the end of the struct are ignored; see [`Schema::inspect_wire`] to
	/// look at them.
	pub fn from_wire(&self, bytes: &[u8]) -> Result<Fields, LayoutError> {
		self.decode_wire(bytes).map(|(fields, _)| fields)
	}

	/// Like [`Schema::from_wire`] but also reports what was left over after the
	/// struct. Non-zero leftovers usually mean the account was written by a
	/// newer program version with fields this schema does not know about.
	pub fn inspect_wire(&self, bytes: &[u8]) -> Result<WireInspection, LayoutError> {
		let (fields, read) = self.decode_wire(bytes)?;
		let consumed = Discriminator::LEN + read;
		let trailing = &bytes[consumed..];
		let trailing_nonzero = trailing.iter().any(|byte| *byte != 0);

		if trailing_nonzero {
			crate::log!(
				"`{}` has non-zero bytes in its {} trailing bytes past offset {consumed}",
				self.name,
				trailing.len()
			);
		}

		Ok(WireInspection {
			fields,
			consumed,
			trailing: trailing.len(),
			trailing_nonzero,
		})
	}

	fn decode_wire(&self, bytes: &[u8]) -> Result<(Fields, usize), LayoutError> {
		if !self.discriminator.matches(bytes) {
			crate::log!("discriminator mismatch for `{}`", self.name);
			return Err(LayoutError::DiscriminatorMismatch {
				schema: self.name.clone(),
				expected: self.discriminator,
				found: bytes.iter().take(Discriminator::LEN).copied().collect(),
			});
		}

		self.layout.decode_from(bytes, Discriminator::LEN)
	}
}

/// What [`Schema::inspect_wire`] found in a wire record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireInspection {
	pub fields: Fields,
	/// Discriminator plus struct bytes.
	pub consumed: usize,
	/// Number of bytes after the struct.
	pub trailing: usize,
	/// Whether any of the trailing bytes is non-zero.
	pub trailing_nonzero: bool,
}
