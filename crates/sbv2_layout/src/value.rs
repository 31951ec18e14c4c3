use core::fmt;

use solana_pubkey::Pubkey;

use crate::error::LayoutError;

/// A runtime value shaped by a [`Layout`](crate::Layout).
///
/// Decoding always produces the canonical shape for each slot: `Unsigned` for
/// unsigned integers, `Signed` for signed integers, `Bytes` for blobs and
/// buffers. Encoding also accepts an integer of the other signedness as long as
/// it is in range for the slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
	Unsigned(u128),
	Signed(i128),
	Bool(bool),
	Pubkey(Pubkey),
	Bytes(Vec<u8>),
	Array(Vec<Value>),
	Option(Option<Box<Value>>),
	Struct(Fields),
	Enum(EnumValue),
}

impl Value {
	/// Short name of the value's shape, used in error messages.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Unsigned(_) => "unsigned integer",
			Self::Signed(_) => "signed integer",
			Self::Bool(_) => "bool",
			Self::Pubkey(_) => "pubkey",
			Self::Bytes(_) => "bytes",
			Self::Array(_) => "array",
			Self::Option(_) => "option",
			Self::Struct(_) => "struct",
			Self::Enum(_) => "enum",
		}
	}

	pub fn none() -> Self {
		Self::Option(None)
	}

	pub fn some(value: Value) -> Self {
		Self::Option(Some(Box::new(value)))
	}

	pub fn as_struct(&self) -> Result<&Fields, LayoutError> {
		match self {
			Self::Struct(fields) => Ok(fields),
			other => Err(unexpected("struct", other)),
		}
	}

	pub fn as_enum(&self) -> Result<&EnumValue, LayoutError> {
		match self {
			Self::Enum(value) => Ok(value),
			other => Err(unexpected("enum", other)),
		}
	}

	pub fn as_array(&self) -> Result<&[Value], LayoutError> {
		match self {
			Self::Array(items) => Ok(items),
			other => Err(unexpected("array", other)),
		}
	}
}

pub(crate) fn unexpected(expected: &str, found: &Value) -> LayoutError {
	LayoutError::shape(format!("expected {expected}, found {}", found.kind()))
}

impl From<Fields> for Value {
	fn from(fields: Fields) -> Self {
		Self::Struct(fields)
	}
}

impl From<EnumValue> for Value {
	fn from(value: EnumValue) -> Self {
		Self::Enum(value)
	}
}

impl From<Pubkey> for Value {
	fn from(pubkey: Pubkey) -> Self {
		Self::Pubkey(pubkey)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}

/// Named field values of a struct, kept in insertion order.
///
/// Equality ignores order: two maps are equal when they hold the same names
/// with equal values.
#[derive(Clone, Default)]
pub struct Fields(Vec<(String, Value)>);

impl Fields {
	pub const fn new() -> Self {
		Self(Vec::new())
	}

	/// Builder-style insert.
	#[must_use]
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(name, value);
		self
	}

	/// Insert or replace the value stored under `name`.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		let name = name.into();
		let value = value.into();

		match self.0.iter_mut().find(|(key, _)| *key == name) {
			Some((_, slot)) => *slot = value,
			None => self.0.push((name, value)),
		}
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.0
			.iter()
			.find_map(|(key, value)| (key == name).then_some(value))
	}

	/// Like [`Fields::get`] but a missing field is a
	/// [`LayoutError::MissingField`].
	pub fn require(&self, name: &str) -> Result<&Value, LayoutError> {
		self.get(name).ok_or_else(|| LayoutError::missing(name))
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value))
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|(key, _)| key.as_str())
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl PartialEq for Fields {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len()
			&& self
				.iter()
				.all(|(name, value)| other.get(name) == Some(value))
	}
}

impl Eq for Fields {}

impl fmt::Debug for Fields {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut fields = Self::new();
		for (name, value) in iter {
			fields.insert(name, value);
		}
		fields
	}
}

impl IntoIterator for Fields {
	type IntoIter = std::vec::IntoIter<(String, Value)>;
	type Item = (String, Value);

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

/// One instance of a tagged union: the active variant and its fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
	pub tag: u8,
	pub name: String,
	pub fields: Fields,
}

impl EnumValue {
	/// A variant without fields.
	pub fn marker(tag: u8, name: impl Into<String>) -> Self {
		Self {
			tag,
			name: name.into(),
			fields: Fields::new(),
		}
	}
}
