use solana_pubkey::Pubkey;

use crate::error::LayoutError;
use crate::pod::*;
use crate::value::Value;
use crate::value::unexpected;

/// Scalar layouts. Integers are little-endian and fixed-width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
	U8,
	U16,
	U32,
	U64,
	U128,
	I8,
	I16,
	I32,
	I64,
	I128,
	/// One byte, any non-zero value decodes as `true`.
	Bool,
	/// 32 raw bytes.
	Pubkey,
	/// Opaque bytes of exactly the declared length.
	Blob(usize),
	/// A `u32` length prefix followed by at most `capacity` bytes.
	Buffer(usize),
}

impl Primitive {
	/// Maximum encoded width in bytes.
	pub const fn size(self) -> usize {
		match self {
			Self::U8 | Self::I8 | Self::Bool => 1,
			Self::U16 | Self::I16 => 2,
			Self::U32 | Self::I32 => 4,
			Self::U64 | Self::I64 => 8,
			Self::U128 | Self::I128 => 16,
			Self::Pubkey => 32,
			Self::Blob(len) => len,
			Self::Buffer(capacity) => 4 + capacity,
		}
	}

	/// Whether every value encodes to exactly [`Primitive::size`] bytes.
	pub const fn is_fixed(self) -> bool {
		!matches!(self, Self::Buffer(_))
	}

	/// Bit width of integer kinds.
	pub const fn bits(self) -> Option<u32> {
		match self {
			Self::U8 | Self::I8 => Some(8),
			Self::U16 | Self::I16 => Some(16),
			Self::U32 | Self::I32 => Some(32),
			Self::U64 | Self::I64 => Some(64),
			Self::U128 | Self::I128 => Some(128),
			_ => None,
		}
	}

	pub const fn is_signed(self) -> bool {
		matches!(
			self,
			Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::I128
		)
	}

	pub fn encode_into(
		self,
		value: &Value,
		buf: &mut [u8],
		offset: usize,
	) -> Result<usize, LayoutError> {
		let written = match self {
			Self::U8 => write_at(&[unsigned(value, 8)? as u8], buf, offset),
			Self::U16 => write_at(&PodU16::from(unsigned(value, 16)? as u16), buf, offset),
			Self::U32 => write_at(&PodU32::from(unsigned(value, 32)? as u32), buf, offset),
			Self::U64 => write_at(&PodU64::from(unsigned(value, 64)? as u64), buf, offset),
			Self::U128 => write_at(&PodU128::from(unsigned(value, 128)?), buf, offset),
			Self::I8 => write_at(&[signed(value, 8)? as u8], buf, offset),
			Self::I16 => write_at(&PodI16::from(signed(value, 16)? as i16), buf, offset),
			Self::I32 => write_at(&PodI32::from(signed(value, 32)? as i32), buf, offset),
			Self::I64 => write_at(&PodI64::from(signed(value, 64)? as i64), buf, offset),
			Self::I128 => write_at(&PodI128::from(signed(value, 128)?), buf, offset),
			Self::Bool => {
				match value {
					Value::Bool(b) => write_at(&[u8::from(*b)], buf, offset),
					other => return Err(encode_shape("bool", other)),
				}
			}
			Self::Pubkey => {
				match value {
					Value::Pubkey(pubkey) => write_bytes(pubkey.as_ref(), buf, offset),
					other => return Err(encode_shape("pubkey", other)),
				}
			}
			Self::Blob(len) => {
				let bytes = bytes(value)?;
				if bytes.len() != len {
					return Err(LayoutError::encoding(format!(
						"expected exactly {len} bytes, found {}",
						bytes.len()
					)));
				}
				write_bytes(bytes, buf, offset)
			}
			Self::Buffer(capacity) => {
				let bytes = bytes(value)?;
				if bytes.len() > capacity {
					return Err(LayoutError::encoding(format!(
						"{} bytes exceed the buffer capacity of {capacity}",
						bytes.len()
					)));
				}
				let prefix = PodU32::from(bytes.len() as u32);
				write_at(&prefix, buf, offset).and_then(|prefix_len| {
					write_bytes(bytes, buf, offset + prefix_len).map(|len| prefix_len + len)
				})
			}
		};

		written.ok_or_else(|| {
			LayoutError::encoding(format!(
				"output buffer of {} bytes has no room at offset {offset}",
				buf.len()
			))
		})
	}

	pub fn decode_from(self, buf: &[u8], offset: usize) -> Result<(Value, usize), LayoutError> {
		let value = match self {
			Self::U8 => Value::Unsigned(take::<u8>(buf, offset)?.into()),
			Self::U16 => Value::Unsigned(take::<PodU16>(buf, offset)?.get().into()),
			Self::U32 => Value::Unsigned(take::<PodU32>(buf, offset)?.get().into()),
			Self::U64 => Value::Unsigned(take::<PodU64>(buf, offset)?.get().into()),
			Self::U128 => Value::Unsigned(take::<PodU128>(buf, offset)?.get()),
			Self::I8 => Value::Signed((take::<u8>(buf, offset)? as i8).into()),
			Self::I16 => Value::Signed(take::<PodI16>(buf, offset)?.get().into()),
			Self::I32 => Value::Signed(take::<PodI32>(buf, offset)?.get().into()),
			Self::I64 => Value::Signed(take::<PodI64>(buf, offset)?.get().into()),
			Self::I128 => Value::Signed(take::<PodI128>(buf, offset)?.get()),
			Self::Bool => Value::Bool(take::<u8>(buf, offset)? != 0),
			Self::Pubkey => Value::Pubkey(Pubkey::new_from_array(take::<[u8; 32]>(buf, offset)?)),
			Self::Blob(len) => Value::Bytes(slice(buf, offset, len)?.to_vec()),
			Self::Buffer(capacity) => {
				let len = take::<PodU32>(buf, offset)?.get() as usize;
				if len > capacity {
					return Err(LayoutError::decoding(
						offset,
						format!("length prefix {len} exceeds the buffer capacity of {capacity}"),
					));
				}
				let bytes = slice(buf, offset + 4, len)?;
				return Ok((Value::Bytes(bytes.to_vec()), 4 + len));
			}
		};

		Ok((value, self.size()))
	}
}

fn unsigned(value: &Value, bits: u32) -> Result<u128, LayoutError> {
	let n = match value {
		Value::Unsigned(n) => *n,
		Value::Signed(n) => {
			u128::try_from(*n).map_err(|_| {
				LayoutError::encoding(format!("{n} is negative and cannot fill a u{bits}"))
			})?
		}
		other => return Err(encode_shape("unsigned integer", other)),
	};

	if bits < 128 && n >> bits != 0 {
		return Err(LayoutError::encoding(format!("{n} does not fit in a u{bits}")));
	}

	Ok(n)
}

fn signed(value: &Value, bits: u32) -> Result<i128, LayoutError> {
	let n = match value {
		Value::Signed(n) => *n,
		Value::Unsigned(n) => {
			i128::try_from(*n).map_err(|_| {
				LayoutError::encoding(format!("{n} does not fit in an i{bits}"))
			})?
		}
		other => return Err(encode_shape("signed integer", other)),
	};

	if bits < 128 {
		let max = (1i128 << (bits - 1)) - 1;
		let min = -max - 1;
		if n < min || n > max {
			return Err(LayoutError::encoding(format!("{n} does not fit in an i{bits}")));
		}
	}

	Ok(n)
}

fn bytes(value: &Value) -> Result<&[u8], LayoutError> {
	match value {
		Value::Bytes(bytes) => Ok(bytes),
		other => Err(encode_shape("bytes", other)),
	}
}

fn encode_shape(expected: &str, found: &Value) -> LayoutError {
	match unexpected(expected, found) {
		LayoutError::Shape { reason, .. } => LayoutError::encoding(reason),
		other => other,
	}
}

fn write_bytes(bytes: &[u8], buf: &mut [u8], offset: usize) -> Option<usize> {
	let end = offset.checked_add(bytes.len())?;
	buf.get_mut(offset..end)?.copy_from_slice(bytes);
	Some(bytes.len())
}

fn take<T: bytemuck::Pod>(buf: &[u8], offset: usize) -> Result<T, LayoutError> {
	read_at(buf, offset).ok_or_else(|| truncated(buf, offset, size_of::<T>()))
}

fn slice(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], LayoutError> {
	offset
		.checked_add(len)
		.and_then(|end| buf.get(offset..end))
		.ok_or_else(|| truncated(buf, offset, len))
}

fn truncated(buf: &[u8], offset: usize, needed: usize) -> LayoutError {
	LayoutError::decoding(
		offset,
		format!(
			"needs {needed} bytes but only {} remain",
			buf.len().saturating_sub(offset)
		),
	)
}
