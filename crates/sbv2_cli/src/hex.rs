//! Hex encoding for wire bytes on the command line.

use std::fmt::Write;

use crate::error::CliError;

pub fn hex_encode(bytes: &[u8]) -> String {
	bytes
		.iter()
		.fold(String::with_capacity(bytes.len() * 2), |mut out, byte| {
			let _ = write!(out, "{byte:02x}");
			out
		})
}

/// Decode hex, ignoring an optional `0x` prefix and any whitespace.
pub fn hex_decode(input: &str) -> Result<Vec<u8>, CliError> {
	let trimmed = input.trim();
	let digits: String = trimmed
		.strip_prefix("0x")
		.or_else(|| trimmed.strip_prefix("0X"))
		.unwrap_or(trimmed)
		.chars()
		.filter(|c| !c.is_whitespace())
		.collect();

	if let Some((index, c)) = digits.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
		return Err(CliError::Hex(format!("`{c}` at position {index} is not a hex digit")));
	}

	if digits.len() % 2 != 0 {
		return Err(CliError::Hex(format!(
			"odd number of digits ({})",
			digits.len()
		)));
	}

	(0..digits.len())
		.step_by(2)
		.map(|index| {
			let pair = &digits[index..index + 2];
			u8::from_str_radix(pair, 16)
				.map_err(|error| CliError::Hex(format!("`{pair}` at position {index}: {error}")))
		})
		.collect()
}
