//! Alignment-free little-endian integer wrappers.
//!
//! Each wrapper is a `Pod` byte array, so it can be read from or written to
//! any offset of a byte buffer regardless of alignment. The primitive codec
//! goes through these instead of slicing and converting by hand.

use bytemuck::Pod;
use bytemuck::Zeroable;

macro_rules! pod_int {
	($(#[$meta:meta])* $pod:ident, $int:ty) => {
		$(#[$meta])*
		#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
		#[repr(transparent)]
		pub struct $pod(pub [u8; size_of::<$int>()]);

		impl $pod {
			pub const fn from_primitive(n: $int) -> Self {
				Self(n.to_le_bytes())
			}

			pub const fn get(self) -> $int {
				<$int>::from_le_bytes(self.0)
			}
		}

		impl From<$int> for $pod {
			fn from(n: $int) -> Self {
				Self::from_primitive(n)
			}
		}

		impl From<$pod> for $int {
			fn from(pod: $pod) -> Self {
				pod.get()
			}
		}
	};
}

pod_int!(
	/// Little-endian `u16`.
	PodU16, u16
);
pod_int!(
	/// Little-endian `u32`.
	PodU32, u32
);
pod_int!(
	/// Little-endian `u64`.
	PodU64, u64
);
pod_int!(
	/// Little-endian `u128`.
	PodU128, u128
);
pod_int!(
	/// Little-endian `i16`.
	PodI16, i16
);
pod_int!(
	/// Little-endian `i32`.
	PodI32, i32
);
pod_int!(
	/// Little-endian `i64`.
	PodI64, i64
);
pod_int!(
	/// Little-endian `i128`.
	PodI128, i128
);

/// Read a `T` from exactly `size_of::<T>()` bytes at `offset`. Returns `None`
/// when the buffer is too short.
pub fn read_at<T: Pod>(buf: &[u8], offset: usize) -> Option<T> {
	let end = offset.checked_add(size_of::<T>())?;
	let bytes = buf.get(offset..end)?;

	bytemuck::try_pod_read_unaligned(bytes).ok()
}

/// Copy the bytes of `value` into `buf` at `offset`. Returns the number of
/// bytes written, or `None` when the buffer is too short.
pub fn write_at<T: Pod>(value: &T, buf: &mut [u8], offset: usize) -> Option<usize> {
	let bytes = bytemuck::bytes_of(value);
	let end = offset.checked_add(bytes.len())?;
	buf.get_mut(offset..end)?.copy_from_slice(bytes);

	Some(bytes.len())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn read_is_alignment_free() {
		let buf = [0xff, 1, 0, 0, 0, 0, 0, 0, 0];
		assert_eq!(read_at::<PodU64>(&buf, 1).map(u64::from), Some(1));
		assert_eq!(read_at::<PodI16>(&[0, 0xff, 0xff], 1).map(i16::from), Some(-1));
	}

	#[test]
	fn short_buffers_read_nothing() {
		assert!(read_at::<PodU32>(&[1, 2, 3], 0).is_none());
		assert!(read_at::<PodU16>(&[1, 2, 3], 2).is_none());
		assert!(read_at::<PodU16>(&[], usize::MAX).is_none());
	}

	#[test]
	fn write_reports_width() {
		let mut buf = [0u8; 20];
		assert_eq!(write_at(&PodI128::from(-2), &mut buf, 4), Some(16));
		assert_eq!(read_at::<PodI128>(&buf, 4).map(i128::from), Some(-2));
		assert_eq!(write_at(&PodU64::from(7), &mut buf, 13), None);
	}
}
