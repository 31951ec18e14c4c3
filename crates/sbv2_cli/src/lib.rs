//! Commands behind the `sbv2` binary.
//!
//! Every command is a plain function over a [`SchemaRegistry`] that returns
//! its output; `main.rs` only parses arguments and prints.
//!
//! [`SchemaRegistry`]: sbv2_layout::SchemaRegistry

pub mod commands;
pub mod error;
pub mod hex;
pub mod snapshot;

pub use crate::commands::*;
pub use crate::error::CliError;
pub use crate::snapshot::load_snapshot;
pub use crate::snapshot::parse_snapshot;
