//! Element wire format for halo transfers.
//!
//! A transfer carries `extent`-many elements in the row-major order of the
//! sub-block it was packed from. Elements are shipped as their raw bytes, so
//! any `bytemuck::Pod` type can travel; the receiver must agree on `T`.

use crate::halo_error::HaloGridError;
use bytemuck::Pod;
use bytes::Bytes;

/// Marker trait for "bytes can be shipped as-is".
pub trait Wire: Pod + Send + Sync + 'static {}
impl<T: Pod + Send + Sync + 'static> Wire for T {}

/// Copy a block into an owned byte buffer.
pub fn encode<T: Wire>(block: &[T]) -> Bytes {
    Bytes::copy_from_slice(bytemuck::cast_slice(block))
}

/// Rebuild `count` elements from their bytes.
///
/// The destination is allocated as `T` so the result is correctly aligned
/// regardless of the alignment of `raw`.
pub fn decode<T: Wire>(raw: &[u8], count: usize) -> Result<Vec<T>, HaloGridError> {
    expect_exact_len(raw.len() / size_of::<T>().max(1), count)?;
    let mut out = vec![T::zeroed(); count];
    let dst: &mut [u8] = bytemuck::cast_slice_mut(&mut out);
    if dst.len() != raw.len() {
        return Err(HaloGridError::BlockLengthMismatch {
            expected: dst.len(),
            found: raw.len(),
        });
    }
    dst.copy_from_slice(raw);
    Ok(out)
}

pub fn expect_exact_len(actual: usize, expected: usize) -> Result<(), HaloGridError> {
    if actual == expected {
        Ok(())
    } else {
        Err(HaloGridError::BlockLengthMismatch {
            expected,
            found: actual,
        })
    }
}
