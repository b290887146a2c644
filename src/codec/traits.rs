// In: src/codec/traits.rs

//! The column encoder/decoder interface shared by PAX column codecs.
//!
//! Column writers talk to every codec through raw bytes and a caller-owned
//! destination buffer, and probe capabilities (`support_append_null`) before
//! picking one. A codec that cannot honour part of the interface returns
//! `PaxError::Unimplemented` for it instead of producing wrong data.

use crate::buffer::DataBuffer;
use crate::error::PaxError;

pub trait PaxEncoder {
    /// Feeds raw column bytes (a dense array of the encoder's element type).
    fn append(&mut self, data: &[u8]) -> Result<(), PaxError>;

    fn append_null(&mut self) -> Result<(), PaxError>;

    /// Whether null markers can be carried inline. If not, the column needs
    /// an external null bitmap.
    fn support_append_null(&self) -> bool;

    fn flush(&mut self) -> Result<(), PaxError>;

    fn get_buffer(&self) -> &[u8];

    fn get_buffer_size(&self) -> usize;
}

/// A decoder bound for lifetime `'a` to a source region and a destination
/// buffer, both owned by the caller.
pub trait PaxDecoder<'a> {
    /// Binds the encoded input. `None` makes decoding a no-op.
    fn set_src_buffer(&mut self, data: Option<&'a [u8]>) -> &mut Self;

    fn set_data_buffer(&mut self, buffer: &'a mut DataBuffer) -> &mut Self;

    /// Decodes a single value, guided by a null bitmap.
    fn next(&mut self, not_null: &[u8]) -> Result<usize, PaxError>;

    /// Decodes the whole source. Returns the destination's committed byte count.
    fn decoding(&mut self) -> Result<usize, PaxError>;

    /// Decodes the whole source, expanding nulls from a bitmap of `not_null_len` rows.
    fn decoding_with_nulls(&mut self, not_null: &[u8], not_null_len: usize)
        -> Result<usize, PaxError>;

    fn get_buffer(&self) -> Option<&[u8]>;

    fn get_buffer_size(&self) -> usize;
}
