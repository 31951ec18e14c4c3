//! Fixed-layout binary codec for anchor-style account and instruction records.
//!
//! A [`Layout`] describes how one value is laid out in little-endian bytes.
//! Layouts compose: primitives, fixed arrays, options, named structs and
//! tagged unions. A [`Schema`] pairs a top-level [`StructLayout`] with the
//! 8-byte [`Discriminator`] that prefixes every wire record, and a
//! [`SchemaRegistry`] resolves schemas by name or by discriminator.
//!
//! Typed Rust records plug into the same machinery through [`FieldCodec`],
//! [`StructCodec`] and [`Record`], usually generated with the [`record!`],
//! [`marker_enum!`] and [`impl_record!`] macros.

mod codec;
mod error;
mod fetch;
mod instruction;
mod json;
mod layout;
mod macros;
pub mod pod;
mod primitive;
mod registry;
mod schema;
mod value;

pub use solana_instruction::AccountMeta;
pub use solana_instruction::Instruction;
pub use solana_pubkey::Pubkey;

pub use crate::codec::*;
pub use crate::error::*;
pub use crate::fetch::*;
pub use crate::instruction::*;
pub use crate::json::pubkey_from_base58;
pub use crate::layout::*;
pub use crate::primitive::*;
pub use crate::registry::*;
pub use crate::schema::*;
pub use crate::value::*;

#[cfg(feature = "logs")]
#[doc(hidden)]
pub use log as __log;

/// Debug-level diagnostics. Compiles to nothing without the `logs` feature.
#[cfg(feature = "logs")]
#[macro_export]
macro_rules! log {
	($($arg:tt)*) => {
		$crate::__log::debug!(target: "sbv2_layout", $($arg)*);
	};
}

#[cfg(not(feature = "logs"))]
#[macro_export]
macro_rules! log {
	($($arg:tt)*) => {};
}

/// Make sure all traits are available.
pub mod prelude {
	pub use crate::codec::FieldCodec;
	pub use crate::codec::Record;
	pub use crate::codec::StructCodec;
	pub use crate::fetch::AccountSource;
}
