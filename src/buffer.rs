//! A growable byte buffer with separate "written" and "committed" steps.
//!
//! Storage is a zero-initialised `Vec<u8>` whose length is the capacity; `used`
//! marks the end of the committed bytes. Callers either copy bytes in with
//! [`DataBuffer::write`] and then [`DataBuffer::brush`] them, or fill
//! [`DataBuffer::available_buffer_mut`] directly (as the bit packer does) and
//! brush afterwards. Growth never drops committed bytes.

use crate::error::PaxError;
use crate::kernels::vlq;

const MIN_GROWTH: usize = 64;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DataBuffer {
    buf: Vec<u8>,
    used: usize,
}

impl DataBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity],
            used: 0,
        }
    }

    /// Committed bytes.
    pub fn used(&self) -> usize {
        self.used
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Free bytes past the committed region.
    pub fn available(&self) -> usize {
        self.buf.len() - self.used
    }

    /// Grows the buffer to hold at least `min_capacity` bytes. Never shrinks.
    pub fn resize(&mut self, min_capacity: usize) {
        if min_capacity > self.buf.len() {
            self.buf.resize(min_capacity, 0);
        }
    }

    /// Ensures at least `n` free bytes, growing geometrically.
    pub fn reserve_available(&mut self, n: usize) {
        if self.available() >= n {
            return;
        }
        let needed = self.used + n;
        let doubled = self.buf.len().saturating_mul(2).max(MIN_GROWTH);
        self.resize(needed.max(doubled));
    }

    /// The writable region past the committed bytes.
    pub fn available_buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.used..]
    }

    /// Copies `bytes` into the start of the available region without committing them.
    pub fn write(&mut self, bytes: &[u8]) {
        self.reserve_available(bytes.len());
        self.buf[self.used..self.used + bytes.len()].copy_from_slice(bytes);
    }

    /// Commits `n` bytes of the available region.
    pub fn brush(&mut self, n: usize) -> Result<(), PaxError> {
        if n > self.available() {
            return Err(PaxError::Abort(format!(
                "cannot commit {} bytes, only {} available",
                n,
                self.available()
            )));
        }
        self.used += n;
        Ok(())
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), PaxError> {
        self.write(bytes);
        self.brush(bytes.len())
    }

    pub fn write_var_int(&mut self, value: u32) -> Result<(), PaxError> {
        let mut scratch = [0u8; vlq::MAX_VLQ_LEN];
        let len = vlq::encode_one(value, &mut scratch);
        self.write_all(&scratch[..len])
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.used]
    }

    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.truncate(self.used);
        self.buf
    }

    /// Copies the committed bytes out as typed values.
    pub fn to_typed_vec<T: bytemuck::Pod>(&self) -> Result<Vec<T>, PaxError> {
        let size = std::mem::size_of::<T>();
        if self.used % size != 0 {
            return Err(PaxError::BufferMismatch(size, self.used));
        }
        let mut out = vec![T::zeroed(); self.used / size];
        bytemuck::cast_slice_mut::<T, u8>(&mut out).copy_from_slice(self.as_slice());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_requires_brush_to_commit() {
        let mut buf = DataBuffer::new();
        buf.write(&[1, 2, 3]);
        assert_eq!(buf.used(), 0);
        buf.brush(3).unwrap();
        assert_eq!(buf.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_brush_past_capacity_is_abort() {
        let mut buf = DataBuffer::with_capacity(2);
        let result = buf.brush(3);
        assert!(matches!(result, Err(PaxError::Abort(_))));
        assert_eq!(buf.used(), 0);
    }

    #[test]
    fn test_growth_preserves_committed_bytes() {
        let mut buf = DataBuffer::with_capacity(1);
        buf.write_all(&[9]).unwrap();
        for i in 0..1_000u32 {
            buf.write_all(&i.to_le_bytes()).unwrap();
        }
        assert_eq!(buf.used(), 1 + 4_000);
        assert_eq!(buf.as_slice()[0], 9);
        assert_eq!(&buf.as_slice()[1..5], &0u32.to_le_bytes());
        assert_eq!(&buf.as_slice()[3_997..4_001], &999u32.to_le_bytes());
    }

    #[test]
    fn test_resize_never_shrinks() {
        let mut buf = DataBuffer::with_capacity(16);
        buf.write_all(&[1; 10]).unwrap();
        buf.resize(4);
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.used(), 10);
        buf.resize(32);
        assert_eq!(buf.capacity(), 32);
        assert_eq!(buf.available(), 22);
    }

    #[test]
    fn test_available_buffer_fill_then_brush() {
        let mut buf = DataBuffer::new();
        buf.write_all(&[0xAA]).unwrap();
        buf.reserve_available(4);
        buf.available_buffer_mut()[..4].copy_from_slice(&[1, 2, 3, 4]);
        buf.brush(4).unwrap();
        assert_eq!(buf.into_vec(), vec![0xAA, 1, 2, 3, 4]);
    }

    #[test]
    fn test_typed_view() {
        let mut buf = DataBuffer::new();
        buf.write_all(&7u32.to_ne_bytes()).unwrap();
        buf.write_all(&8u32.to_ne_bytes()).unwrap();
        assert_eq!(buf.to_typed_vec::<u32>().unwrap(), vec![7, 8]);
        assert_eq!(buf.to_typed_vec::<u64>().unwrap().len(), 1);
        buf.write_all(&[1]).unwrap();
        assert!(matches!(
            buf.to_typed_vec::<u32>(),
            Err(PaxError::BufferMismatch(4, 9))
        ));
    }
}
