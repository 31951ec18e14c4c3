use std::collections::BTreeMap;

use crate::error::LayoutError;
use crate::schema::Discriminator;
use crate::schema::Schema;
use crate::value::Fields;

/// Schemas of one program, indexed by name and by discriminator.
///
/// Registration needs `&mut self`; build the registry once at start-up and
/// share it behind a shared reference (see `std::sync::OnceLock`) afterwards.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
	schemas: Vec<Schema>,
	by_name: BTreeMap<String, usize>,
	by_discriminator: BTreeMap<Discriminator, usize>,
}

impl SchemaRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register every schema in order, stopping at the first clash.
	pub fn try_from_schemas(schemas: impl IntoIterator<Item = Schema>) -> Result<Self, LayoutError> {
		let mut registry = Self::new();
		for schema in schemas {
			registry.register(schema)?;
		}
		Ok(registry)
	}

	/// Add a schema. Fails when its name or discriminator is already taken.
	pub fn register(&mut self, schema: Schema) -> Result<&Schema, LayoutError> {
		if self.by_name.contains_key(schema.name()) {
			return Err(LayoutError::DuplicateSchema {
				name: schema.name().to_owned(),
				reason: "name is already registered".into(),
			});
		}

		if let Some(existing) = self.by_discriminator(&schema.discriminator()) {
			return Err(LayoutError::DuplicateSchema {
				name: schema.name().to_owned(),
				reason: format!(
					"discriminator {} is already used by `{}`",
					schema.discriminator(),
					existing.name()
				),
			});
		}

		crate::log!(
			"registered {} schema `{}` ({})",
			schema.kind(),
			schema.name(),
			schema.discriminator()
		);

		let index = self.schemas.len();
		self.by_name.insert(schema.name().to_owned(), index);
		self.by_discriminator.insert(schema.discriminator(), index);
		self.schemas.push(schema);

		Ok(&self.schemas[index])
	}

	pub fn get(&self, name: &str) -> Option<&Schema> {
		self.by_name.get(name).map(|index| &self.schemas[*index])
	}

	pub fn by_discriminator(&self, discriminator: &Discriminator) -> Option<&Schema> {
		self.by_discriminator
			.get(discriminator)
			.map(|index| &self.schemas[*index])
	}

	/// The schema whose discriminator prefixes `data`.
	pub fn identify(&self, data: &[u8]) -> Option<&Schema> {
		Discriminator::from_wire(data).and_then(|discriminator| self.by_discriminator(&discriminator))
	}

	/// Like [`identify`](Self::identify), failing when no schema matches.
	pub fn resolve(&self, data: &[u8]) -> Result<&Schema, LayoutError> {
		self.identify(data).ok_or_else(|| {
			crate::log!("no schema for discriminator {:?}", data.get(..Discriminator::LEN));
			LayoutError::UnrecognizedDiscriminator {
				found: data.iter().take(Discriminator::LEN).copied().collect(),
			}
		})
	}

	/// Identify `data` by its discriminator and decode it.
	pub fn decode_any(&self, data: &[u8]) -> Result<(&Schema, Fields), LayoutError> {
		let schema = self.resolve(data)?;
		Ok((schema, schema.from_wire(data)?))
	}

	/// Schemas in registration order.
	pub fn iter(&self) -> impl ExactSizeIterator<Item = &Schema> {
		self.schemas.iter()
	}

	pub fn len(&self) -> usize {
		self.schemas.len()
	}

	pub fn is_empty(&self) -> bool {
		self.schemas.is_empty()
	}
}
