use solana_pubkey::Pubkey;

use crate::error::LayoutError;
use crate::layout::Layout;
use crate::layout::StructLayout;
use crate::schema::Discriminator;
use crate::schema::Schema;
use crate::schema::SchemaKind;
use crate::value::Fields;
use crate::value::Value;
use crate::value::unexpected;

/// A Rust type with a fixed layout, convertible to and from [`Value`].
pub trait FieldCodec: Sized {
	fn layout() -> Layout;
	fn to_value(&self) -> Value;
	fn from_value(value: &Value) -> Result<Self, LayoutError>;
}

/// A Rust struct laid out as a [`StructLayout`].
///
/// Usually generated with [`record!`](crate::record).
pub trait StructCodec: Sized {
	fn struct_layout() -> StructLayout;
	fn to_fields(&self) -> Fields;
	fn from_fields(fields: &Fields) -> Result<Self, LayoutError>;
}

/// A struct that is a whole wire record: account state or instruction data.
pub trait Record: StructCodec {
	const NAME: &'static str;
	const KIND: SchemaKind;
	const DISCRIMINATOR: Discriminator;

	fn schema() -> Schema {
		Schema::new(
			Self::NAME,
			Self::KIND,
			Self::DISCRIMINATOR,
			Self::struct_layout(),
		)
	}

	/// Whether `data` starts with this record's discriminator.
	fn matches_discriminator(data: &[u8]) -> bool {
		Self::DISCRIMINATOR.matches(data)
	}

	fn to_wire(&self) -> Result<Vec<u8>, LayoutError> {
		Self::schema().to_wire(&self.to_fields())
	}

	fn from_wire(data: &[u8]) -> Result<Self, LayoutError> {
		Self::from_fields(&Self::schema().from_wire(data)?)
	}
}

/// Read field `name` of a decoded struct as `T`.
#[doc(hidden)]
pub fn field<T: FieldCodec>(fields: &Fields, name: &str) -> Result<T, LayoutError> {
	T::from_value(fields.require(name)?).map_err(|error| error.within(name))
}

macro_rules! unsigned_codec {
	($($int:ty => $layout:ident),* $(,)?) => {
		$(
			impl FieldCodec for $int {
				fn layout() -> Layout {
					Layout::$layout
				}

				fn to_value(&self) -> Value {
					Value::Unsigned((*self).into())
				}

				fn from_value(value: &Value) -> Result<Self, LayoutError> {
					match value {
						Value::Unsigned(n) => Self::try_from(*n).map_err(|_| {
							LayoutError::shape(format!("{n} does not fit in a {}", stringify!($int)))
						}),
						other => Err(unexpected("unsigned integer", other)),
					}
				}
			}
		)*
	};
}

macro_rules! signed_codec {
	($($int:ty => $layout:ident),* $(,)?) => {
		$(
			impl FieldCodec for $int {
				fn layout() -> Layout {
					Layout::$layout
				}

				fn to_value(&self) -> Value {
					Value::Signed((*self).into())
				}

				fn from_value(value: &Value) -> Result<Self, LayoutError> {
					match value {
						Value::Signed(n) => Self::try_from(*n).map_err(|_| {
							LayoutError::shape(format!("{n} does not fit in an {}", stringify!($int)))
						}),
						other => Err(unexpected("signed integer", other)),
					}
				}
			}
		)*
	};
}

unsigned_codec!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, u128 => U128);
signed_codec!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, i128 => I128);

impl FieldCodec for bool {
	fn layout() -> Layout {
		Layout::BOOL
	}

	fn to_value(&self) -> Value {
		Value::Bool(*self)
	}

	fn from_value(value: &Value) -> Result<Self, LayoutError> {
		match value {
			Value::Bool(b) => Ok(*b),
			other => Err(unexpected("bool", other)),
		}
	}
}

impl FieldCodec for Pubkey {
	fn layout() -> Layout {
		Layout::PUBKEY
	}

	fn to_value(&self) -> Value {
		Value::Pubkey(*self)
	}

	fn from_value(value: &Value) -> Result<Self, LayoutError> {
		match value {
			Value::Pubkey(pubkey) => Ok(*pubkey),
			other => Err(unexpected("pubkey", other)),
		}
	}
}

impl<T: FieldCodec, const N: usize> FieldCodec for [T; N] {
	fn layout() -> Layout {
		Layout::array(T::layout(), N)
	}

	fn to_value(&self) -> Value {
		Value::Array(self.iter().map(T::to_value).collect())
	}

	fn from_value(value: &Value) -> Result<Self, LayoutError> {
		let items = value
			.as_array()?
			.iter()
			.enumerate()
			.map(|(index, item)| T::from_value(item).map_err(|error| error.within(index.to_string())))
			.collect::<Result<Vec<T>, _>>()?;

		let found = items.len();
		items
			.try_into()
			.map_err(|_| LayoutError::shape(format!("expected {N} elements, found {found}")))
	}
}

impl<T: FieldCodec> FieldCodec for Option<T> {
	fn layout() -> Layout {
		Layout::option(T::layout())
	}

	fn to_value(&self) -> Value {
		match self {
			Some(inner) => Value::some(inner.to_value()),
			None => Value::none(),
		}
	}

	fn from_value(value: &Value) -> Result<Self, LayoutError> {
		match value {
			Value::Option(None) => Ok(None),
			Value::Option(Some(inner)) => T::from_value(inner).map(Some),
			other => Err(unexpected("option", other)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn integers_keep_their_signedness() {
		assert_eq!(7u64.to_value(), Value::Unsigned(7));
		assert_eq!((-7i64).to_value(), Value::Signed(-7));
		assert_eq!(u8::from_value(&Value::Unsigned(255)), Ok(255));
		assert!(u8::from_value(&Value::Unsigned(256)).is_err());
		assert!(u8::from_value(&Value::Signed(1)).is_err());
	}

	#[test]
	fn arrays_nest() {
		let enclaves = [[7u8; 32]; 6];
		assert_eq!(<[[u8; 32]; 6]>::layout().size(), 192);
		assert_eq!(
			<[[u8; 32]; 6]>::from_value(&enclaves.to_value()),
			Ok(enclaves)
		);

		let error = <[u8; 2]>::from_value(&Value::Array(vec![
			Value::Unsigned(1),
			Value::Bool(true),
		]))
		.unwrap_err();
		assert_eq!(error.path(), Some("1"));
	}

	#[test]
	fn array_length_is_checked() {
		let short = Value::Array(vec![Value::Unsigned(1)]);
		assert!(<[u8; 2]>::from_value(&short).is_err());
	}

	#[test]
	fn options_wrap_their_inner_layout() {
		assert_eq!(<Option<u32>>::layout(), Layout::option(Layout::U32));
		assert_eq!(Some(3u32).to_value(), Value::some(Value::Unsigned(3)));
		assert_eq!(<Option<u32>>::from_value(&Value::none()), Ok(None));
	}

	#[test]
	fn missing_field_is_reported_by_name() {
		let fields = Fields::new().with("bump", Value::Unsigned(1));
		assert_eq!(field::<u8>(&fields, "bump"), Ok(1));
		assert_eq!(
			field::<u8>(&fields, "amount"),
			Err(LayoutError::MissingField {
				path: "amount".into()
			})
		);
	}
}
