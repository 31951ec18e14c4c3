use crate::schema::Discriminator;

/// Every way a layout, schema or registry operation can fail.
///
/// Field-level variants carry a dotted `path` from the top-level struct to the
/// failing field (`params.permission`, `mr_enclaves.3`). The path is empty when
/// the failure happened at the root. Decode failures also carry the absolute
/// byte offset in the buffer that was being read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LayoutError {
	#[error("cannot encode `{path}`: {reason}")]
	Encoding { path: String, reason: String },

	#[error("missing field `{path}`")]
	MissingField { path: String },

	#[error("cannot decode `{path}` at byte offset {offset}: {reason}")]
	Decoding {
		path: String,
		offset: usize,
		reason: String,
	},

	#[error("value at `{path}` does not fit its layout: {reason}")]
	Shape { path: String, reason: String },

	#[error("discriminator mismatch for `{schema}`: expected {expected}, found {found:?}")]
	DiscriminatorMismatch {
		schema: String,
		expected: Discriminator,
		found: Vec<u8>,
	},

	#[error("no registered schema has discriminator {found:?}")]
	UnrecognizedDiscriminator { found: Vec<u8> },

	#[error("unknown variant tag {tag} for `{path}` at byte offset {offset}")]
	UnknownVariant { path: String, tag: u8, offset: usize },

	#[error("cannot register schema `{name}`: {reason}")]
	DuplicateSchema { name: String, reason: String },

	#[error("field `{name}` is declared more than once")]
	DuplicateField { name: String },

	#[error("variant `{name}` (tag {tag}) clashes with an earlier variant")]
	DuplicateVariant { name: String, tag: u8 },

	#[error("invalid instruction for `{schema}`: {reason}")]
	InvalidInstruction { schema: String, reason: String },
}

impl LayoutError {
	pub fn encoding(reason: impl Into<String>) -> Self {
		Self::Encoding {
			path: String::new(),
			reason: reason.into(),
		}
	}

	pub fn decoding(offset: usize, reason: impl Into<String>) -> Self {
		Self::Decoding {
			path: String::new(),
			offset,
			reason: reason.into(),
		}
	}

	pub fn shape(reason: impl Into<String>) -> Self {
		Self::Shape {
			path: String::new(),
			reason: reason.into(),
		}
	}

	pub fn missing(field: impl Into<String>) -> Self {
		Self::MissingField { path: field.into() }
	}

	/// Prefix the field path with `segment` as the error leaves a nested
	/// layout. Errors without a path are returned unchanged.
	#[must_use]
	pub fn within(mut self, segment: impl AsRef<str>) -> Self {
		match &mut self {
			Self::Encoding { path, .. }
			| Self::MissingField { path }
			| Self::Decoding { path, .. }
			| Self::Shape { path, .. }
			| Self::UnknownVariant { path, .. } => prepend(path, segment.as_ref()),
			_ => {}
		}

		self
	}

	/// The dotted field path, when the error has one.
	pub fn path(&self) -> Option<&str> {
		match self {
			Self::Encoding { path, .. }
			| Self::MissingField { path }
			| Self::Decoding { path, .. }
			| Self::Shape { path, .. }
			| Self::UnknownVariant { path, .. } => Some(path),
			_ => None,
		}
	}

	/// The absolute byte offset of a decode failure.
	pub fn offset(&self) -> Option<usize> {
		match self {
			Self::Decoding { offset, .. } | Self::UnknownVariant { offset, .. } => Some(*offset),
			_ => None,
		}
	}
}

fn prepend(path: &mut String, segment: &str) {
	if path.is_empty() {
		segment.clone_into(path);
	} else {
		*path = format!("{segment}.{path}");
	}
}
