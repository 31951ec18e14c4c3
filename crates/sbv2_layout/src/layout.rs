use std::collections::BTreeSet;

use typed_builder::TypedBuilder;

use crate::error::LayoutError;
use crate::primitive::Primitive;
use crate::value::EnumValue;
use crate::value::Fields;
use crate::value::Value;

/// How one value is laid out in bytes.
///
/// Every layout has a statically known maximum width ([`Layout::size`]).
/// Most layouts always encode to exactly that width; [`Layout::is_fixed`]
/// tells the ones that can be shorter (`Option`, length-prefixed buffers and
/// unions whose variants differ in width) apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Layout {
	Primitive(Primitive),
	/// `len` elements of the same layout, in index order.
	Array { element: Box<Layout>, len: usize },
	/// A one-byte presence tag (0 = none, 1 = some) followed by the inner value.
	Option(Box<Layout>),
	Struct(StructLayout),
	Enum(EnumLayout),
}

impl Layout {
	pub const U8: Self = Self::Primitive(Primitive::U8);
	pub const U16: Self = Self::Primitive(Primitive::U16);
	pub const U32: Self = Self::Primitive(Primitive::U32);
	pub const U64: Self = Self::Primitive(Primitive::U64);
	pub const U128: Self = Self::Primitive(Primitive::U128);
	pub const I8: Self = Self::Primitive(Primitive::I8);
	pub const I16: Self = Self::Primitive(Primitive::I16);
	pub const I32: Self = Self::Primitive(Primitive::I32);
	pub const I64: Self = Self::Primitive(Primitive::I64);
	pub const I128: Self = Self::Primitive(Primitive::I128);
	pub const BOOL: Self = Self::Primitive(Primitive::Bool);
	pub const PUBKEY: Self = Self::Primitive(Primitive::Pubkey);

	pub const fn blob(len: usize) -> Self {
		Self::Primitive(Primitive::Blob(len))
	}

	pub const fn buffer(capacity: usize) -> Self {
		Self::Primitive(Primitive::Buffer(capacity))
	}

	pub fn array(element: Layout, len: usize) -> Self {
		Self::Array {
			element: Box::new(element),
			len,
		}
	}

	pub fn option(inner: Layout) -> Self {
		Self::Option(Box::new(inner))
	}

	/// Maximum encoded width in bytes.
	pub fn size(&self) -> usize {
		match self {
			Self::Primitive(primitive) => primitive.size(),
			Self::Array { element, len } => element.size() * len,
			Self::Option(inner) => 1 + inner.size(),
			Self::Struct(layout) => layout.size(),
			Self::Enum(layout) => layout.size(),
		}
	}

	/// Whether every value encodes to exactly [`Layout::size`] bytes.
	pub fn is_fixed(&self) -> bool {
		match self {
			Self::Primitive(primitive) => primitive.is_fixed(),
			Self::Array { element, .. } => element.is_fixed(),
			Self::Option(_) => false,
			Self::Struct(layout) => layout.is_fixed(),
			Self::Enum(layout) => layout.is_fixed(),
		}
	}

	/// Encode `value` at `offset`, returning the number of bytes written.
	pub fn encode_into(
		&self,
		value: &Value,
		buf: &mut [u8],
		offset: usize,
	) -> Result<usize, LayoutError> {
		match self {
			Self::Primitive(primitive) => primitive.encode_into(value, buf, offset),
			Self::Array { element, len } => {
				let items = match value {
					Value::Array(items) => items,
					Value::Bytes(_) => {
						return Err(LayoutError::encoding(
							"expected array, found bytes; declare the field as a blob instead",
						));
					}
					other => return Err(LayoutError::encoding(format!(
						"expected array, found {}",
						other.kind()
					))),
				};
				if items.len() != *len {
					return Err(LayoutError::encoding(format!(
						"expected {len} elements, found {}",
						items.len()
					)));
				}

				let mut cursor = offset;
				for (index, item) in items.iter().enumerate() {
					cursor += element
						.encode_into(item, buf, cursor)
						.map_err(|error| error.within(index.to_string()))?;
				}
				Ok(cursor - offset)
			}
			Self::Option(inner) => {
				match value {
					Value::Option(None) => write_tag(0, buf, offset),
					Value::Option(Some(item)) => {
						write_tag(1, buf, offset)?;
						Ok(1 + inner.encode_into(item, buf, offset + 1)?)
					}
					other => Err(LayoutError::encoding(format!(
						"expected option, found {}",
						other.kind()
					))),
				}
			}
			Self::Struct(layout) => {
				match value {
					Value::Struct(fields) => layout.encode_into(fields, buf, offset),
					other => Err(LayoutError::encoding(format!(
						"expected struct, found {}",
						other.kind()
					))),
				}
			}
			Self::Enum(layout) => {
				match value {
					Value::Enum(variant) => layout.encode_into(variant, buf, offset),
					other => Err(LayoutError::encoding(format!(
						"expected enum, found {}",
						other.kind()
					))),
				}
			}
		}
	}

	/// Decode one value at `offset`, returning it with the number of bytes
	/// read.
	pub fn decode_from(&self, buf: &[u8], offset: usize) -> Result<(Value, usize), LayoutError> {
		match self {
			Self::Primitive(primitive) => primitive.decode_from(buf, offset),
			Self::Array { element, len } => {
				let mut items = Vec::with_capacity(*len);
				let mut cursor = offset;
				for index in 0..*len {
					let (item, read) = element
						.decode_from(buf, cursor)
						.map_err(|error| error.within(index.to_string()))?;
					items.push(item);
					cursor += read;
				}
				Ok((Value::Array(items), cursor - offset))
			}
			Self::Option(inner) => {
				match buf.get(offset) {
					Some(0) => Ok((Value::Option(None), 1)),
					Some(1) => {
						let (item, read) = inner.decode_from(buf, offset + 1)?;
						Ok((Value::some(item), 1 + read))
					}
					Some(tag) => Err(LayoutError::decoding(
						offset,
						format!("option tag must be 0 or 1, found {tag}"),
					)),
					None => Err(LayoutError::decoding(offset, "missing option tag")),
				}
			}
			Self::Struct(layout) => {
				let (fields, read) = layout.decode_from(buf, offset)?;
				Ok((Value::Struct(fields), read))
			}
			Self::Enum(layout) => {
				let (variant, read) = layout.decode_from(buf, offset)?;
				Ok((Value::Enum(variant), read))
			}
		}
	}

	/// Encode into a freshly allocated buffer trimmed to the written length.
	pub fn encode(&self, value: &Value) -> Result<Vec<u8>, LayoutError> {
		let mut buf = vec![0; self.size()];
		let written = self.encode_into(value, &mut buf, 0)?;
		buf.truncate(written);
		Ok(buf)
	}

	/// Decode from the start of `buf`. Trailing bytes are ignored.
	pub fn decode(&self, buf: &[u8]) -> Result<Value, LayoutError> {
		self.decode_from(buf, 0).map(|(value, _)| value)
	}
}

impl From<Primitive> for Layout {
	fn from(primitive: Primitive) -> Self {
		Self::Primitive(primitive)
	}
}

impl From<StructLayout> for Layout {
	fn from(layout: StructLayout) -> Self {
		Self::Struct(layout)
	}
}

impl From<EnumLayout> for Layout {
	fn from(layout: EnumLayout) -> Self {
		Self::Enum(layout)
	}
}

fn write_tag(tag: u8, buf: &mut [u8], offset: usize) -> Result<usize, LayoutError> {
	let len = buf.len();
	let slot = buf.get_mut(offset).ok_or_else(|| {
		LayoutError::encoding(format!(
			"output buffer of {len} bytes has no room at offset {offset}"
		))
	})?;
	*slot = tag;
	Ok(1)
}

/// Named fields laid out back to back in declaration order.
///
/// The declaration order is the wire contract: it must match the on-chain
/// program's layout exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructLayout {
	fields: Vec<(String, Layout)>,
	size: usize,
}

impl StructLayout {
	pub const fn empty() -> Self {
		Self {
			fields: Vec::new(),
			size: 0,
		}
	}

	/// Build a struct layout, rejecting duplicate field names.
	pub fn try_new<N: Into<String>>(
		fields: impl IntoIterator<Item = (N, Layout)>,
	) -> Result<Self, LayoutError> {
		let fields: Vec<(String, Layout)> = fields
			.into_iter()
			.map(|(name, layout)| (name.into(), layout))
			.collect();

		let mut seen = BTreeSet::new();
		for (name, _) in &fields {
			if !seen.insert(name.as_str()) {
				return Err(LayoutError::DuplicateField { name: name.clone() });
			}
		}

		Ok(Self::new_unchecked(fields))
	}

	/// Build a struct layout whose field names are already known to be unique,
	/// such as one generated from a Rust struct definition.
	#[doc(hidden)]
	pub fn new_unchecked(fields: Vec<(String, Layout)>) -> Self {
		let size = fields.iter().map(|(_, layout)| layout.size()).sum();
		Self { fields, size }
	}

	pub fn fields(&self) -> impl ExactSizeIterator<Item = (&str, &Layout)> {
		self.fields
			.iter()
			.map(|(name, layout)| (name.as_str(), layout))
	}

	pub fn field(&self, name: &str) -> Option<&Layout> {
		self.fields
			.iter()
			.find_map(|(key, layout)| (key == name).then_some(layout))
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Maximum encoded width, computed once at construction.
	pub const fn size(&self) -> usize {
		self.size
	}

	pub fn is_fixed(&self) -> bool {
		self.fields.iter().all(|(_, layout)| layout.is_fixed())
	}

	/// Encode every declared field in order. The value map must hold exactly
	/// the declared fields.
	pub fn encode_into(
		&self,
		fields: &Fields,
		buf: &mut [u8],
		offset: usize,
	) -> Result<usize, LayoutError> {
		if let Some(unknown) = fields.names().find(|name| self.field(name).is_none()) {
			return Err(LayoutError::Encoding {
				path: unknown.to_owned(),
				reason: "field is not declared by the layout".into(),
			});
		}

		let mut cursor = offset;
		for (name, layout) in &self.fields {
			let value = fields.require(name)?;
			cursor += layout
				.encode_into(value, buf, cursor)
				.map_err(|error| error.within(name))?;
		}

		Ok(cursor - offset)
	}

	pub fn decode_from(&self, buf: &[u8], offset: usize) -> Result<(Fields, usize), LayoutError> {
		let mut fields = Fields::new();
		let mut cursor = offset;
		for (name, layout) in &self.fields {
			let (value, read) = layout
				.decode_from(buf, cursor)
				.map_err(|error| error.within(name))?;
			fields.insert(name.as_str(), value);
			cursor += read;
		}

		Ok((fields, cursor - offset))
	}
}

/// One arm of a tagged union.
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct Variant {
	/// Tag assigned by the on-chain program, not the position in the list.
	pub tag: u8,
	#[builder(setter(into))]
	pub name: String,
	#[builder(default = StructLayout::empty())]
	pub fields: StructLayout,
	/// Reserved variants still decode but are refused on encode.
	#[builder(default)]
	pub reserved: bool,
}

impl Variant {
	/// An encodable variant without fields.
	pub fn marker(tag: u8, name: impl Into<String>) -> Self {
		Self::builder().tag(tag).name(name).build()
	}

	/// A decode-only variant without fields.
	pub fn reserved(tag: u8, name: impl Into<String>) -> Self {
		Self::builder().tag(tag).name(name).reserved(true).build()
	}
}

/// A closed set of variants selected by a one-byte tag.
///
/// Encoding writes the tag followed by the active variant's fields. Decoding
/// dispatches on the tag; a tag that matches no variant is an
/// [`LayoutError::UnknownVariant`] and never falls back to a default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumLayout {
	variants: Vec<Variant>,
	size: usize,
}

impl EnumLayout {
	/// Build a union, rejecting repeated tags or names.
	pub fn try_new(variants: impl IntoIterator<Item = Variant>) -> Result<Self, LayoutError> {
		let variants: Vec<Variant> = variants.into_iter().collect();

		let mut tags = BTreeSet::new();
		let mut names = BTreeSet::new();
		for variant in &variants {
			if !tags.insert(variant.tag) || !names.insert(variant.name.as_str()) {
				return Err(LayoutError::DuplicateVariant {
					name: variant.name.clone(),
					tag: variant.tag,
				});
			}
		}

		Ok(Self::new_unchecked(variants))
	}

	/// Build a union whose tags and names are already known to be unique.
	#[doc(hidden)]
	pub fn new_unchecked(variants: Vec<Variant>) -> Self {
		let widest = variants
			.iter()
			.map(|variant| variant.fields.size())
			.max()
			.unwrap_or(0);

		Self {
			variants,
			size: 1 + widest,
		}
	}

	pub fn variants(&self) -> &[Variant] {
		&self.variants
	}

	pub fn by_tag(&self, tag: u8) -> Option<&Variant> {
		self.variants.iter().find(|variant| variant.tag == tag)
	}

	pub fn by_name(&self, name: &str) -> Option<&Variant> {
		self.variants.iter().find(|variant| variant.name == name)
	}

	pub const fn size(&self) -> usize {
		self.size
	}

	pub fn is_fixed(&self) -> bool {
		self.variants
			.iter()
			.all(|variant| variant.fields.is_fixed() && 1 + variant.fields.size() == self.size)
	}

	pub fn encode_into(
		&self,
		value: &EnumValue,
		buf: &mut [u8],
		offset: usize,
	) -> Result<usize, LayoutError> {
		let variant = self.by_tag(value.tag).ok_or_else(|| {
			LayoutError::encoding(format!("no variant has tag {}", value.tag))
		})?;

		if variant.name != value.name {
			return Err(LayoutError::encoding(format!(
				"tag {} belongs to `{}`, not `{}`",
				value.tag, variant.name, value.name
			)));
		}

		if variant.reserved {
			return Err(LayoutError::encoding(format!(
				"variant `{}` (tag {}) is reserved and cannot be encoded",
				variant.name, variant.tag
			)));
		}

		write_tag(variant.tag, buf, offset)?;
		let written = variant
			.fields
			.encode_into(&value.fields, buf, offset + 1)
			.map_err(|error| error.within(&variant.name))?;

		Ok(1 + written)
	}

	pub fn decode_from(
		&self,
		buf: &[u8],
		offset: usize,
	) -> Result<(EnumValue, usize), LayoutError> {
		let tag = *buf
			.get(offset)
			.ok_or_else(|| LayoutError::decoding(offset, "missing variant tag"))?;

		let Some(variant) = self.by_tag(tag) else {
			crate::log!("unknown variant tag {tag} at byte offset {offset}");
			return Err(LayoutError::UnknownVariant {
				path: String::new(),
				tag,
				offset,
			});
		};

		let (fields, read) = variant
			.fields
			.decode_from(buf, offset + 1)
			.map_err(|error| error.within(&variant.name))?;

		Ok((
			EnumValue {
				tag,
				name: variant.name.clone(),
				fields,
			},
			1 + read,
		))
	}
}

#[cfg(test)]
mod tests {
	use solana_pubkey::Pubkey;

	use super::*;

	fn round_stats() -> StructLayout {
		StructLayout::try_new([
			("num_success", Layout::U32),
			("num_error", Layout::U32),
			("round_open_slot", Layout::U64),
			("round_open_timestamp", Layout::I64),
			("oracle_pubkey", Layout::PUBKEY),
		])
		.unwrap()
	}

	fn verification_status() -> EnumLayout {
		EnumLayout::try_new([
			Variant::marker(0, "VerificationPending"),
			Variant::marker(1, "VerificationFailure"),
			Variant::marker(2, "VerificationSuccess"),
			Variant::marker(3, "VerificationOverride"),
		])
		.unwrap()
	}

	#[test]
	fn scalar_struct_round_trips() {
		let layout = Layout::Struct(round_stats());
		let value = Value::Struct(
			Fields::new()
				.with("num_success", Value::Unsigned(3))
				.with("num_error", Value::Unsigned(1))
				.with("round_open_slot", Value::Unsigned(1000))
				.with("round_open_timestamp", Value::Signed(-5))
				.with("oracle_pubkey", Pubkey::new_from_array([0; 32])),
		);

		let bytes = layout.encode(&value).unwrap();
		assert_eq!(bytes.len(), 4 + 4 + 8 + 8 + 32);
		assert_eq!(layout.size(), bytes.len());
		assert_eq!(layout.decode(&bytes), Ok(value));
	}

	#[test]
	fn struct_encode_requires_every_field() {
		let fields = Fields::new()
			.with("num_success", Value::Unsigned(3))
			.with("num_error", Value::Unsigned(1));

		let mut buf = vec![0; round_stats().size()];
		assert_eq!(
			round_stats().encode_into(&fields, &mut buf, 0),
			Err(LayoutError::MissingField {
				path: "round_open_slot".into()
			})
		);
	}

	#[test]
	fn struct_encode_rejects_undeclared_fields() {
		let layout = StructLayout::try_new([("bump", Layout::U8)]).unwrap();
		let fields = Fields::new()
			.with("bump", Value::Unsigned(1))
			.with("extra", Value::Unsigned(2));

		let error = Layout::Struct(layout)
			.encode(&Value::Struct(fields))
			.unwrap_err();
		assert_eq!(error.path(), Some("extra"));
	}

	#[test]
	fn duplicate_field_names_are_rejected() {
		assert_eq!(
			StructLayout::try_new([("a", Layout::U8), ("a", Layout::U16)]),
			Err(LayoutError::DuplicateField { name: "a".into() })
		);
	}

	#[test]
	fn marker_variant_encodes_to_its_tag() {
		let layout = Layout::Enum(verification_status());
		let success = Value::Enum(EnumValue::marker(2, "VerificationSuccess"));

		assert_eq!(layout.encode(&success), Ok(vec![0x02]));
		assert_eq!(layout.decode(&[0x02]), Ok(success));
		assert!(layout.is_fixed());
		assert_eq!(layout.size(), 1);
	}

	#[test]
	fn tags_are_explicit_not_positional() {
		let layout = EnumLayout::try_new([
			Variant::marker(4, "PermitVrfRequests"),
			Variant::marker(1, "PermitOracleHeartbeat"),
		])
		.unwrap();

		let (value, read) = layout.decode_from(&[4], 0).unwrap();
		assert_eq!(value.name, "PermitVrfRequests");
		assert_eq!(read, 1);
	}

	#[test]
	fn unknown_tag_is_never_defaulted() {
		let layout = Layout::Enum(verification_status());
		assert_eq!(
			layout.decode_from(&[7, 9], 1),
			Err(LayoutError::UnknownVariant {
				path: String::new(),
				tag: 9,
				offset: 1,
			})
		);
	}

	#[test]
	fn reserved_variant_decodes_but_refuses_encode() {
		let layout = Layout::Enum(
			EnumLayout::try_new([
				Variant::reserved(0, "PermitNone"),
				Variant::marker(1, "PermitOracleHeartbeat"),
			])
			.unwrap(),
		);

		let none = Value::Enum(EnumValue::marker(0, "PermitNone"));
		assert_eq!(layout.decode(&[0]), Ok(none.clone()));
		assert!(matches!(
			layout.encode(&none),
			Err(LayoutError::Encoding { .. })
		));
	}

	#[test]
	fn variant_name_must_match_tag() {
		let layout = Layout::Enum(verification_status());
		let mismatched = Value::Enum(EnumValue::marker(1, "VerificationSuccess"));
		assert!(layout.encode(&mismatched).is_err());
	}

	#[test]
	fn duplicate_variant_tags_are_rejected() {
		assert!(matches!(
			EnumLayout::try_new([Variant::marker(1, "A"), Variant::marker(1, "B")]),
			Err(LayoutError::DuplicateVariant { tag: 1, .. })
		));
	}

	#[test]
	fn variants_with_fields_encode_tag_then_fields() {
		let layout = Layout::Enum(
			EnumLayout::try_new([
				Variant::marker(0, "Empty"),
				Variant::builder()
					.tag(1)
					.name("Pair")
					.fields(StructLayout::try_new([("a", Layout::U8), ("b", Layout::U16)]).unwrap())
					.build(),
			])
			.unwrap(),
		);

		let pair = Value::Enum(EnumValue {
			tag: 1,
			name: "Pair".into(),
			fields: Fields::new()
				.with("a", Value::Unsigned(7))
				.with("b", Value::Unsigned(0x0102)),
		});

		assert_eq!(layout.size(), 4);
		assert!(!layout.is_fixed());
		assert_eq!(layout.encode(&pair), Ok(vec![1, 7, 2, 1]));
		assert_eq!(layout.decode(&[1, 7, 2, 1]), Ok(pair));

		let error = layout.decode(&[1, 7]).unwrap_err();
		assert_eq!(error.path(), Some("Pair.b"));
		assert_eq!(error.offset(), Some(2));
	}

	#[test]
	fn nested_fixed_array_is_192_bytes() {
		let enclaves = Layout::array(Layout::array(Layout::U8, 32), 6);
		assert_eq!(enclaves.size(), 192);

		let blobs = Layout::array(Layout::blob(32), 6);
		assert_eq!(blobs.size(), 192);

		let value = Value::Array(vec![Value::Bytes(vec![0xab; 32]); 6]);
		let bytes = blobs.encode(&value).unwrap();
		assert_eq!(bytes.len(), 192);
		assert_eq!(blobs.decode(&bytes), Ok(value));
	}

	#[test]
	fn array_errors_carry_the_index() {
		let layout = Layout::array(Layout::U16, 3);
		let error = layout.decode(&[0, 0, 0, 0, 0]).unwrap_err();
		assert_eq!(error.path(), Some("2"));
		assert_eq!(error.offset(), Some(4));

		let short = Value::Array(vec![Value::Unsigned(1)]);
		assert!(layout.encode(&short).is_err());
	}

	#[test]
	fn option_is_tag_then_inner() {
		let layout = Layout::option(Layout::U32);
		assert_eq!(layout.size(), 5);
		assert!(!layout.is_fixed());

		assert_eq!(layout.encode(&Value::none()), Ok(vec![0]));
		assert_eq!(
			layout.encode(&Value::some(Value::Unsigned(1))),
			Ok(vec![1, 1, 0, 0, 0])
		);
		assert_eq!(
			layout.decode(&[1, 1, 0, 0, 0]),
			Ok(Value::some(Value::Unsigned(1)))
		);
		assert!(matches!(
			layout.decode(&[2]),
			Err(LayoutError::Decoding { offset: 0, .. })
		));
	}
}
