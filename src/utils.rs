//! Shared, low-level conversions between raw byte slices and typed slices.
//!
//! All casting goes through `bytemuck`, so there is no `unsafe` in this crate.

use std::borrow::Cow;

use crate::error::PaxError;

/// Reinterprets `bytes` as a slice of `T` without copying when the alignment
/// allows it, and falls back to a copy when it doesn't.
///
/// # Errors
/// Returns `PaxError::BufferMismatch` if the byte length is not a multiple of
/// `size_of::<T>()`.
pub fn bytes_to_typed_cow<T: bytemuck::Pod>(bytes: &[u8]) -> Result<Cow<'_, [T]>, PaxError> {
    let size = std::mem::size_of::<T>();
    if bytes.len() % size != 0 {
        return Err(PaxError::BufferMismatch(size, bytes.len()));
    }
    match bytemuck::try_cast_slice::<u8, T>(bytes) {
        Ok(slice) => Ok(Cow::Borrowed(slice)),
        Err(bytemuck::PodCastError::TargetAlignmentGreaterAndInputNotAligned) => {
            let mut owned = vec![T::zeroed(); bytes.len() / size];
            bytemuck::cast_slice_mut::<T, u8>(&mut owned).copy_from_slice(bytes);
            Ok(Cow::Owned(owned))
        }
        Err(e) => Err(e.into()),
    }
}

/// Copies a typed slice into a new byte vector.
pub fn typed_slice_to_bytes<T: bytemuck::Pod>(data: &[T]) -> Vec<u8> {
    bytemuck::cast_slice(data).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_cast_borrows() {
        let values = vec![1u32, 2, 3];
        let bytes: &[u8] = bytemuck::cast_slice(&values);
        let typed = bytes_to_typed_cow::<u32>(bytes).unwrap();
        assert!(matches!(typed, Cow::Borrowed(_)));
        assert_eq!(typed.as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_unaligned_cast_copies() {
        let values = vec![0u32, 7, 8];
        let bytes = typed_slice_to_bytes(&values);
        let mut shifted = vec![0xFFu8];
        shifted.extend_from_slice(&bytes[4..]);
        // Offset by one so the view of the last 8 bytes is misaligned for u32.
        let typed = bytes_to_typed_cow::<u32>(&shifted[1..]).unwrap();
        assert_eq!(typed.as_ref(), &[7, 8]);
    }

    #[test]
    fn test_length_mismatch() {
        let result = bytes_to_typed_cow::<u32>(&[1, 2, 3]);
        assert!(matches!(result, Err(PaxError::BufferMismatch(4, 3))));
    }
}
