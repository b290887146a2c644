// In: src/codec/decoder.rs

//! The block/mini-block delta decoder.
//!
//! `decode_into` inverts `encode_into` exactly. After each block the outer
//! cursor moves by the block's declared `payload_bytes`, not by the bits the
//! reader consumed, so writer padding never desynchronizes the stream.
//!
//! Unlike a trusting decoder, every length in the stream is checked against
//! the bytes actually present; truncated or inconsistent input is reported as
//! `PaxError::MalformedStream` instead of decoding zero-padded garbage.

use std::marker::PhantomData;

use crate::buffer::DataBuffer;
use crate::codec::format::{BlockHeader, StreamHeader};
use crate::codec::traits::PaxDecoder;
use crate::config::{ColumnEncodingKind, DecodingOption};
use crate::error::PaxError;
use crate::kernels::bitstream::BitReader;
use crate::traits::DeltaValue;

//==================================================================================
// 1. Mini-Block Unpacking
//==================================================================================

/// Unpacks `count` residuals of `width` bits, accumulating onto `current`.
///
/// Widths 0, 8, 16 and 32 get dedicated loops, everything else a 4-way
/// unrolled loop. All paths produce the same values as a one-at-a-time decode.
#[inline]
fn unpack_mini_block<T: DeltaValue>(
    reader: &mut BitReader<'_>,
    out: &mut Vec<T>,
    current: &mut T,
    count: usize,
    min_delta: u32,
    width: u8,
) -> Result<(), PaxError> {
    let min_delta = min_delta as u64;
    match width {
        0 => {
            for _ in 0..count {
                *current = current.wrapping_add_u64(min_delta);
                out.push(*current);
            }
            Ok(())
        }
        8 => unpack_fixed::<T, 8>(reader, out, current, count, min_delta),
        16 => unpack_fixed::<T, 16>(reader, out, current, count, min_delta),
        32 => unpack_fixed::<T, 32>(reader, out, current, count, min_delta),
        _ => {
            for _ in 0..count / 4 {
                let a0 = reader.read(width)? as u64;
                let a1 = reader.read(width)? as u64;
                let a2 = reader.read(width)? as u64;
                let a3 = reader.read(width)? as u64;
                for adjusted in [a0, a1, a2, a3] {
                    *current = current.wrapping_add_u64(adjusted + min_delta);
                    out.push(*current);
                }
            }
            for _ in 0..count % 4 {
                let adjusted = reader.read(width)? as u64;
                *current = current.wrapping_add_u64(adjusted + min_delta);
                out.push(*current);
            }
            Ok(())
        }
    }
}

#[inline(always)]
fn unpack_fixed<T: DeltaValue, const W: u8>(
    reader: &mut BitReader<'_>,
    out: &mut Vec<T>,
    current: &mut T,
    count: usize,
    min_delta: u64,
) -> Result<(), PaxError> {
    for _ in 0..count {
        let adjusted = reader.read(W)? as u64;
        *current = current.wrapping_add_u64(adjusted + min_delta);
        out.push(*current);
    }
    Ok(())
}

//==================================================================================
// 2. Core Transform
//==================================================================================

/// Decodes a complete delta stream from `src`, appending the values to `dst`.
/// Returns `dst.used()` afterwards.
pub fn decode_into<T: DeltaValue>(src: &[u8], dst: &mut DataBuffer) -> Result<usize, PaxError> {
    let mut input = src;
    let header = StreamHeader::read_from(&mut input)?;
    let total_count = header.total_count as usize;
    if total_count == 0 {
        log::debug!("delta decode: empty stream");
        return Ok(dst.used());
    }

    let values_per_block = header.values_per_block as usize;
    let values_per_mini_block = header.values_per_mini_block as usize;
    let mini_blocks = header.mini_blocks_per_block();

    // Every block costs at least its header bytes, which bounds how many values
    // the remaining input can possibly describe.
    let max_blocks = input.len() / BlockHeader::min_encoded_len(mini_blocks);
    let reachable = max_blocks.saturating_mul(values_per_block).saturating_add(1);
    if total_count > reachable {
        return Err(PaxError::malformed(format!(
            "header declares {} values but {} remaining bytes can hold at most {}",
            total_count,
            input.len(),
            reachable
        )));
    }

    let mut current = T::from_header(header.first_value);
    dst.write_all(bytemuck::bytes_of(&current))?;
    let mut decoded = 1usize;
    let mut scratch: Vec<T> = Vec::with_capacity(values_per_mini_block.min(total_count));
    let mut block_count = 0usize;

    while decoded < total_count {
        if input.is_empty() {
            return Err(PaxError::malformed(format!(
                "stream ended after {} of {} values",
                decoded, total_count
            )));
        }
        let block = BlockHeader::read_from(&mut input, mini_blocks)?;
        let (payload, rest) = input.split_at(block.payload_bytes as usize);
        let values_in_block = values_per_block.min(total_count - decoded);
        // Grow only by what this block can produce, never by the declared total.
        dst.reserve_available(values_in_block * std::mem::size_of::<T>());

        let mut reader = BitReader::new(payload);
        for (i, &width) in block.bit_widths().iter().enumerate() {
            let start = i * values_per_mini_block;
            if start >= values_in_block {
                break;
            }
            let count = values_per_mini_block.min(values_in_block - start);
            scratch.clear();
            unpack_mini_block(
                &mut reader,
                &mut scratch,
                &mut current,
                count,
                block.min_delta,
                width,
            )?;
            dst.write_all(bytemuck::cast_slice(&scratch))?;
            decoded += count;
        }
        reader.align_to_byte();

        log::trace!(
            "delta block {}: {} values, min_delta={}, widths={:?}, payload={}B",
            block_count,
            values_in_block,
            block.min_delta,
            block.bit_widths(),
            block.payload_bytes
        );
        input = rest;
        block_count += 1;
    }

    log::debug!(
        "delta decode: {} values from {} blocks ({} of {} input bytes used)",
        decoded,
        block_count,
        src.len() - input.len(),
        src.len()
    );
    Ok(dst.used())
}

//==================================================================================
// 3. Stateful Decoder
//==================================================================================

/// Delta decoder producing elements of type `T` into a caller-owned buffer.
///
/// Besides `u32`, the signed storage types `i64`/`i32`/`i16`/`i8` are
/// accepted for legacy offset columns. Their values are still decoded with
/// unsigned wraparound arithmetic; columns flagged `is_sign` are rejected.
#[derive(Debug)]
pub struct PaxDeltaDecoder<'a, T: DeltaValue> {
    option: DecodingOption,
    data_buffer: Option<&'a [u8]>,
    result_buffer: Option<&'a mut DataBuffer>,
    decoded: Option<usize>,
    _marker: PhantomData<T>,
}

impl<'a, T: DeltaValue> PaxDeltaDecoder<'a, T> {
    pub fn new(option: DecodingOption) -> Result<Self, PaxError> {
        if option.column_encode_type != ColumnEncodingKind::DirectDelta {
            return Err(PaxError::Abort(format!(
                "PaxDeltaDecoder only supports direct_delta, got {:?}",
                option.column_encode_type
            )));
        }
        // TODO: decode signed columns once a zigzag stage exists in front of
        // the encoder; until then they must not reach this codec.
        if option.is_sign {
            return Err(PaxError::Unimplemented(
                "PaxDeltaDecoder does not support signed data, zigzag is required".to_string(),
            ));
        }
        Ok(Self {
            option,
            data_buffer: None,
            result_buffer: None,
            decoded: None,
            _marker: PhantomData,
        })
    }

    pub fn option(&self) -> &DecodingOption {
        &self.option
    }
}

impl<'a, T: DeltaValue> PaxDecoder<'a> for PaxDeltaDecoder<'a, T> {
    fn set_src_buffer(&mut self, data: Option<&'a [u8]>) -> &mut Self {
        self.data_buffer = data;
        self.decoded = None;
        self
    }

    fn set_data_buffer(&mut self, buffer: &'a mut DataBuffer) -> &mut Self {
        self.result_buffer = Some(buffer);
        self.decoded = None;
        self
    }

    fn next(&mut self, _not_null: &[u8]) -> Result<usize, PaxError> {
        Err(PaxError::Unimplemented(
            "PaxDeltaDecoder::next is not supported, use decoding()".to_string(),
        ))
    }

    fn decoding(&mut self) -> Result<usize, PaxError> {
        if let Some(used) = self.decoded {
            return Ok(used);
        }
        let Some(src) = self.data_buffer else {
            return Ok(0);
        };
        let dst = self.result_buffer.as_deref_mut().ok_or_else(|| {
            PaxError::Abort("PaxDeltaDecoder::decoding called without a data buffer".to_string())
        })?;

        let used = decode_into::<T>(src, dst)?;
        self.decoded = Some(used);
        Ok(used)
    }

    fn decoding_with_nulls(
        &mut self,
        _not_null: &[u8],
        _not_null_len: usize,
    ) -> Result<usize, PaxError> {
        Err(PaxError::Unimplemented(
            "PaxDeltaDecoder cannot expand nulls, the column must have no nulls".to_string(),
        ))
    }

    fn get_buffer(&self) -> Option<&[u8]> {
        self.result_buffer.as_deref().map(DataBuffer::as_slice)
    }

    fn get_buffer_size(&self) -> usize {
        self.result_buffer.as_deref().map_or(0, DataBuffer::used)
    }
}
