//! JSON projection of decoded values, for display and for hand-written input.
//!
//! Integers up to 32 bits are JSON numbers; wider integers are decimal strings
//! so they survive JavaScript number precision. Public keys are base58
//! strings, byte blobs are arrays of numbers and union values are
//! `{"kind": "<Variant>"}` with a `"value"` object when the variant has
//! fields.

use serde_json::Map;
use serde_json::Value as Json;
use solana_pubkey::Pubkey;

use crate::error::LayoutError;
use crate::layout::EnumLayout;
use crate::layout::Layout;
use crate::layout::StructLayout;
use crate::primitive::Primitive;
use crate::value::EnumValue;
use crate::value::Fields;
use crate::value::Value;
use crate::value::unexpected;

impl Layout {
	/// Render `value` as JSON, following this layout.
	pub fn project(&self, value: &Value) -> Result<Json, LayoutError> {
		match self {
			Self::Primitive(primitive) => project_primitive(*primitive, value),
			Self::Array { element, .. } => {
				value
					.as_array()?
					.iter()
					.enumerate()
					.map(|(index, item)| {
						element
							.project(item)
							.map_err(|error| error.within(index.to_string()))
					})
					.collect::<Result<Vec<_>, _>>()
					.map(Json::Array)
			}
			Self::Option(inner) => {
				match value {
					Value::Option(None) => Ok(Json::Null),
					Value::Option(Some(item)) => inner.project(item),
					other => Err(unexpected("option", other)),
				}
			}
			Self::Struct(layout) => layout.project(value.as_struct()?),
			Self::Enum(layout) => project_enum(layout, value.as_enum()?),
		}
	}

	/// Parse JSON in the shape produced by [`Layout::project`].
	pub fn value_from_json(&self, json: &Json) -> Result<Value, LayoutError> {
		match self {
			Self::Primitive(primitive) => primitive_from_json(*primitive, json),
			Self::Array { element, len } => {
				let items = json
					.as_array()
					.ok_or_else(|| json_shape("array", json))?;
				if items.len() != *len {
					return Err(LayoutError::shape(format!(
						"expected {len} elements, found {}",
						items.len()
					)));
				}
				items
					.iter()
					.enumerate()
					.map(|(index, item)| {
						element
							.value_from_json(item)
							.map_err(|error| error.within(index.to_string()))
					})
					.collect::<Result<Vec<_>, _>>()
					.map(Value::Array)
			}
			Self::Option(inner) => {
				match json {
					Json::Null => Ok(Value::none()),
					item => inner.value_from_json(item).map(Value::some),
				}
			}
			Self::Struct(layout) => layout.fields_from_json(json).map(Value::Struct),
			Self::Enum(layout) => enum_from_json(layout, json).map(Value::Enum),
		}
	}
}

impl StructLayout {
	/// Render `fields` as a JSON object in declaration order.
	pub fn project(&self, fields: &Fields) -> Result<Json, LayoutError> {
		let mut object = Map::new();
		for (name, layout) in self.fields() {
			let value = fields.require(name)?;
			let json = layout.project(value).map_err(|error| error.within(name))?;
			object.insert(name.to_owned(), json);
		}
		Ok(Json::Object(object))
	}

	/// Parse a JSON object holding exactly the declared fields.
	pub fn fields_from_json(&self, json: &Json) -> Result<Fields, LayoutError> {
		let object = json
			.as_object()
			.ok_or_else(|| json_shape("object", json))?;

		if let Some(unknown) = object.keys().find(|key| self.field(key).is_none()) {
			return Err(LayoutError::Shape {
				path: unknown.clone(),
				reason: "field is not declared by the layout".into(),
			});
		}

		let mut fields = Fields::new();
		for (name, layout) in self.fields() {
			let item = object.get(name).ok_or_else(|| LayoutError::missing(name))?;
			let value = layout
				.value_from_json(item)
				.map_err(|error| error.within(name))?;
			fields.insert(name, value);
		}
		Ok(fields)
	}
}

fn project_primitive(primitive: Primitive, value: &Value) -> Result<Json, LayoutError> {
	let narrow = primitive.size() <= 4;

	match (primitive, value) {
		(Primitive::Bool, Value::Bool(b)) => Ok(Json::Bool(*b)),
		(Primitive::Pubkey, Value::Pubkey(pubkey)) => {
			Ok(Json::String(bs58::encode(pubkey.as_ref()).into_string()))
		}
		(Primitive::Blob(_) | Primitive::Buffer(_), Value::Bytes(bytes)) => {
			Ok(Json::Array(bytes.iter().map(|byte| Json::from(*byte)).collect()))
		}
		(_, Value::Unsigned(n)) if primitive.bits().is_some() && !primitive.is_signed() => {
			Ok(if narrow {
				Json::from(*n as u64)
			} else {
				Json::String(n.to_string())
			})
		}
		(_, Value::Signed(n)) if primitive.is_signed() => {
			Ok(if narrow {
				Json::from(*n as i64)
			} else {
				Json::String(n.to_string())
			})
		}
		(_, other) => {
			Err(LayoutError::shape(format!(
				"{primitive:?} cannot hold a {}",
				other.kind()
			)))
		}
	}
}

fn primitive_from_json(primitive: Primitive, json: &Json) -> Result<Value, LayoutError> {
	match primitive {
		Primitive::Bool => {
			json.as_bool()
				.map(Value::Bool)
				.ok_or_else(|| json_shape("bool", json))
		}
		Primitive::Pubkey => {
			let text = json.as_str().ok_or_else(|| json_shape("base58 string", json))?;
			pubkey_from_base58(text).map(Value::Pubkey)
		}
		Primitive::Blob(_) | Primitive::Buffer(_) => {
			let items = json
				.as_array()
				.ok_or_else(|| json_shape("array of bytes", json))?;
			items
				.iter()
				.map(|item| {
					item.as_u64()
						.and_then(|byte| u8::try_from(byte).ok())
						.ok_or_else(|| json_shape("byte", item))
				})
				.collect::<Result<Vec<_>, _>>()
				.map(Value::Bytes)
		}
		_ if primitive.is_signed() => {
			let n = match json {
				Json::Number(n) => n.as_i64().map(i128::from),
				Json::String(text) => text.parse::<i128>().ok(),
				_ => None,
			};
			n.map(Value::Signed)
				.ok_or_else(|| json_shape("signed integer", json))
		}
		_ => {
			match json {
				Json::Number(n) => {
					n.as_u64()
						.map(|n| Value::Unsigned(n.into()))
						.or_else(|| n.as_i64().map(|n| Value::Signed(n.into())))
						.ok_or_else(|| json_shape("unsigned integer", json))
				}
				Json::String(text) => {
					text.parse::<u128>()
						.map(Value::Unsigned)
						.map_err(|_| json_shape("unsigned integer", json))
				}
				_ => Err(json_shape("unsigned integer", json)),
			}
		}
	}
}

fn project_enum(layout: &EnumLayout, value: &EnumValue) -> Result<Json, LayoutError> {
	let variant = layout
		.by_tag(value.tag)
		.ok_or_else(|| LayoutError::shape(format!("no variant has tag {}", value.tag)))?;

	let mut object = Map::new();
	object.insert("kind".into(), Json::String(variant.name.clone()));
	if !variant.fields.is_empty() {
		let fields = variant
			.fields
			.project(&value.fields)
			.map_err(|error| error.within(&variant.name))?;
		object.insert("value".into(), fields);
	}

	Ok(Json::Object(object))
}

fn enum_from_json(layout: &EnumLayout, json: &Json) -> Result<EnumValue, LayoutError> {
	let kind = json
		.get("kind")
		.and_then(Json::as_str)
		.ok_or_else(|| json_shape("object with a `kind` string", json))?;

	if let Some(unknown) = json
		.as_object()
		.and_then(|object| object.keys().find(|key| *key != "kind" && *key != "value"))
	{
		return Err(LayoutError::Shape {
			path: unknown.clone(),
			reason: "only `kind` and `value` are allowed in a variant".into(),
		});
	}

	let variant = layout
		.by_name(kind)
		.ok_or_else(|| LayoutError::shape(format!("unknown variant `{kind}`")))?;

	let empty = Json::Object(Map::new());
	let fields = variant
		.fields
		.fields_from_json(json.get("value").unwrap_or(&empty))
		.map_err(|error| error.within(&variant.name))?;

	Ok(EnumValue {
		tag: variant.tag,
		name: variant.name.clone(),
		fields,
	})
}

/// Parse a base58 public key, insisting on exactly 32 bytes.
pub fn pubkey_from_base58(text: &str) -> Result<Pubkey, LayoutError> {
	let bytes = bs58::decode(text)
		.into_vec()
		.map_err(|error| LayoutError::shape(format!("`{text}` is not base58: {error}")))?;

	<[u8; 32]>::try_from(bytes.as_slice())
		.map(Pubkey::new_from_array)
		.map_err(|_| {
			LayoutError::shape(format!(
				"`{text}` decodes to {} bytes, a pubkey has 32",
				bytes.len()
			))
		})
}

fn json_shape(expected: &str, found: &Json) -> LayoutError {
	let found = match found {
		Json::Null => "null",
		Json::Bool(_) => "bool",
		Json::Number(_) => "number",
		Json::String(_) => "string",
		Json::Array(_) => "array",
		Json::Object(_) => "object",
	};
	LayoutError::shape(format!("expected {expected}, found {found}"))
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::layout::Variant;

	fn permission_params() -> StructLayout {
		StructLayout::try_new([
			(
				"permission",
				Layout::Enum(
					EnumLayout::try_new([
						Variant::reserved(0, "PermitNone"),
						Variant::marker(1, "PermitOracleHeartbeat"),
						Variant::marker(2, "PermitOracleQueueUsage"),
					])
					.unwrap(),
				),
			),
			("enable", Layout::BOOL),
			("amount", Layout::U64),
			("delta", Layout::I32),
			("authority", Layout::PUBKEY),
			("memo", Layout::option(Layout::blob(2))),
		])
		.unwrap()
	}

	fn sample() -> Fields {
		Fields::new()
			.with("permission", EnumValue::marker(2, "PermitOracleQueueUsage"))
			.with("enable", true)
			.with("amount", Value::Unsigned(u128::from(u64::MAX)))
			.with("delta", Value::Signed(-7))
			.with("authority", Pubkey::new_from_array([1; 32]))
			.with("memo", Value::some(Value::Bytes(vec![4, 5])))
	}

	#[test]
	fn projection_stringifies_wide_integers_and_keys() {
		let json = permission_params().project(&sample()).unwrap();

		insta::assert_json_snapshot!(json, @r#"
		{
		  "permission": {
		    "kind": "PermitOracleQueueUsage"
		  },
		  "enable": true,
		  "amount": "18446744073709551615",
		  "delta": -7,
		  "authority": "4vJ9JU1bJJE96FWSJKvHsmmFADCg4gpZQff4P3bkLKi",
		  "memo": [
		    4,
		    5
		  ]
		}
		"#);
	}

	#[test]
	fn parsing_inverts_projection() {
		let layout = permission_params();
		let json = layout.project(&sample()).unwrap();
		assert_eq!(layout.fields_from_json(&json), Ok(sample()));
	}

	#[test]
	fn parsing_checks_field_presence() {
		let mut json = permission_params().project(&sample()).unwrap();
		json.as_object_mut().unwrap().remove("enable");

		assert_eq!(
			permission_params().fields_from_json(&json),
			Err(LayoutError::MissingField {
				path: "enable".into()
			})
		);
	}

	#[test]
	fn parsing_rejects_unknown_fields() {
		let mut json = permission_params().project(&sample()).unwrap();
		json.as_object_mut()
			.unwrap()
			.insert("surplus".into(), json!(1));

		let error = permission_params().fields_from_json(&json).unwrap_err();
		assert_eq!(error.path(), Some("surplus"));
	}

	#[test]
	fn parsing_rejects_unknown_variants_and_bad_keys() {
		let mut json = permission_params().project(&sample()).unwrap();
		json["permission"] = json!({ "kind": "PermitEverything" });
		assert!(permission_params().fields_from_json(&json).is_err());

		let mut json = permission_params().project(&sample()).unwrap();
		json["permission"] = json!({ "kind": "PermitOracleQueueUsage", "valu": {} });
		let error = permission_params().fields_from_json(&json).unwrap_err();
		assert_eq!(error.path(), Some("permission.valu"));

		let mut json = permission_params().project(&sample()).unwrap();
		json["authority"] = json!("not-a-key");
		let error = permission_params().fields_from_json(&json).unwrap_err();
		assert_eq!(error.path(), Some("authority"));
	}

	#[test]
	fn null_parses_as_none() {
		let layout = Layout::option(Layout::U8);
		assert_eq!(layout.value_from_json(&Json::Null), Ok(Value::none()));
		assert_eq!(
			layout.value_from_json(&json!(3)),
			Ok(Value::some(Value::Unsigned(3)))
		);
	}
}
