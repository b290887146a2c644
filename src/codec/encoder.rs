// In: src/codec/encoder.rs

//! The block/mini-block delta encoder.
//!
//! `encode_into` is the actual transform: one call turns a dense slice into a
//! complete stream. `PaxDeltaEncoder` wraps it behind the byte-oriented
//! `PaxEncoder` interface shared with the rest of the column encoders, which
//! is why it carries an append-once guard.

use std::marker::PhantomData;

use crate::buffer::DataBuffer;
use crate::codec::format::{BlockHeader, StreamHeader};
use crate::codec::traits::PaxEncoder;
use crate::config::{BlockLayout, ColumnEncodingKind, EncodingOption, MAX_MINI_BLOCKS_PER_BLOCK};
use crate::error::PaxError;
use crate::kernels::bit_width::fast_num_bits;
use crate::kernels::bitstream::BitWriter;
use crate::traits::EncodableValue;
use crate::utils::bytes_to_typed_cow;

const MAX_MINI_BLOCKS: usize = MAX_MINI_BLOCKS_PER_BLOCK as usize;

//==================================================================================
// 1. Core Transform
//==================================================================================

/// Encodes `values` as a complete delta stream appended to `out`.
pub fn encode_into<T: EncodableValue>(
    values: &[T],
    layout: &BlockLayout,
    out: &mut DataBuffer,
) -> Result<(), PaxError> {
    layout.validate()?;
    let total_count = u32::try_from(values.len()).map_err(|_| {
        PaxError::Abort(format!(
            "{} values do not fit the 32-bit count field",
            values.len()
        ))
    })?;

    // Raw size is a generous upper bound for monotonic data; payloads reserve
    // exactly what they need below.
    out.reserve_available(std::mem::size_of_val(values));
    let start_used = out.used();

    let Some(&first) = values.first() else {
        StreamHeader::new(layout, 0, 0).write_to(out)?;
        log::debug!("delta encode: empty input, header only");
        return Ok(());
    };
    StreamHeader::new(layout, total_count, first.to_header()).write_to(out)?;

    let values_per_block = layout.values_per_block as usize;
    let values_per_mini_block = layout.values_per_mini_block as usize;
    let mini_blocks = layout.mini_blocks_per_block() as usize;

    let mut deltas: Vec<u32> = Vec::with_capacity(values_per_block.min(values.len()));
    let mut mini_max = [0u32; MAX_MINI_BLOCKS];
    let mut bit_widths = [0u8; MAX_MINI_BLOCKS];
    let mut previous = first;
    let mut block_count = 0usize;

    for block in values[1..].chunks(values_per_block) {
        // --- Pass 1: deltas, block minimum, per-mini-block maximum ---
        deltas.clear();
        mini_max[..mini_blocks].fill(0);
        let mut min_delta = u32::MAX;
        for (i, &current) in block.iter().enumerate() {
            let delta = current.delta_from(previous);
            previous = current;
            deltas.push(delta);
            min_delta = min_delta.min(delta);
            let max = &mut mini_max[i / values_per_mini_block];
            *max = (*max).max(delta);
        }

        // --- Pass 2: widths and exact payload size ---
        let mut total_bits = 0u64;
        for i in 0..mini_blocks {
            let start = i * values_per_mini_block;
            if start >= block.len() {
                bit_widths[i] = 0;
                continue;
            }
            let end = (start + values_per_mini_block).min(block.len());
            let width = fast_num_bits(mini_max[i].saturating_sub(min_delta));
            bit_widths[i] = width;
            total_bits += width as u64 * (end - start) as u64;
        }
        let payload_bytes = u32::try_from(total_bits.div_ceil(8)).map_err(|_| {
            PaxError::Abort(format!(
                "block payload of {} bits does not fit the 32-bit size field",
                total_bits
            ))
        })?;
        let payload_len = payload_bytes as usize;

        let block_header = BlockHeader::new(min_delta, &bit_widths[..mini_blocks], payload_bytes)?;
        out.reserve_available(block_header.encoded_len() + payload_len);
        block_header.write_to(out)?;

        // --- Pass 3: bit-pack residuals straight into the output ---
        let written = {
            let mut writer = BitWriter::new(&mut out.available_buffer_mut()[..payload_len]);
            for (chunk, &width) in deltas.chunks(values_per_mini_block).zip(&bit_widths) {
                if width == 0 {
                    continue;
                }
                for &delta in chunk {
                    writer.write(delta - min_delta, width)?;
                }
            }
            writer.flush_to_byte()?;
            writer.bytes_written()
        };
        if written != payload_len {
            return Err(PaxError::InternalError(format!(
                "packed {} payload bytes, header declared {}",
                written, payload_bytes
            )));
        }
        out.brush(payload_len)?;

        log::trace!(
            "delta block {}: {} values, min_delta={}, widths={:?}, payload={}B",
            block_count,
            block.len(),
            min_delta,
            &bit_widths[..mini_blocks],
            payload_bytes
        );
        block_count += 1;
    }

    log::debug!(
        "delta encode: {} values -> {} bytes in {} blocks",
        values.len(),
        out.used() - start_used,
        block_count
    );
    Ok(())
}

//==================================================================================
// 2. Stateful Encoder
//==================================================================================

/// Append-once delta encoder for unsigned element type `T`.
#[derive(Debug)]
pub struct PaxDeltaEncoder<T: EncodableValue> {
    option: EncodingOption,
    result_buffer: DataBuffer,
    has_append: bool,
    _marker: PhantomData<T>,
}

impl<T: EncodableValue> PaxDeltaEncoder<T> {
    pub fn new(option: EncodingOption) -> Result<Self, PaxError> {
        Self::with_buffer(option, DataBuffer::new())
    }

    /// Encodes into a caller-provided buffer; existing committed bytes are kept.
    pub fn with_buffer(option: EncodingOption, buffer: DataBuffer) -> Result<Self, PaxError> {
        if option.column_encode_type != ColumnEncodingKind::DirectDelta {
            return Err(PaxError::Unimplemented(format!(
                "PaxDeltaEncoder only supports direct_delta, got {:?}",
                option.column_encode_type
            )));
        }
        if option.is_sign {
            return Err(PaxError::Unimplemented(
                "PaxDeltaEncoder does not support signed data, zigzag is required".to_string(),
            ));
        }
        option.layout.validate()?;
        Ok(Self {
            option,
            result_buffer: buffer,
            has_append: false,
            _marker: PhantomData,
        })
    }

    /// Typed counterpart of [`PaxEncoder::append`], with the same append-once rule.
    pub fn append_values(&mut self, values: &[T]) -> Result<(), PaxError> {
        self.check_first_append()?;
        self.has_append = true;
        encode_into(values, &self.option.layout, &mut self.result_buffer)
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.result_buffer.into_vec()
    }

    fn check_first_append(&self) -> Result<(), PaxError> {
        if self.has_append {
            return Err(PaxError::Abort(
                "PaxDeltaEncoder::append only supports a single append".to_string(),
            ));
        }
        Ok(())
    }
}

impl<T: EncodableValue> PaxEncoder for PaxDeltaEncoder<T> {
    fn append(&mut self, data: &[u8]) -> Result<(), PaxError> {
        self.check_first_append()?;
        let values = bytes_to_typed_cow::<T>(data)?;
        self.has_append = true;
        encode_into(&values, &self.option.layout, &mut self.result_buffer)
    }

    fn append_null(&mut self) -> Result<(), PaxError> {
        Err(PaxError::Unimplemented(
            "PaxDeltaEncoder cannot encode null markers".to_string(),
        ))
    }

    fn support_append_null(&self) -> bool {
        false
    }

    fn flush(&mut self) -> Result<(), PaxError> {
        // All work happens in `append`.
        Ok(())
    }

    fn get_buffer(&self) -> &[u8] {
        self.result_buffer.as_slice()
    }

    fn get_buffer_size(&self) -> usize {
        self.result_buffer.used()
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnEncodingKind;
    use crate::utils::typed_slice_to_bytes;

    #[test]
    fn test_single_value_is_header_only() {
        let mut out = DataBuffer::new();
        encode_into(&[42u32], &BlockLayout::default(), &mut out).unwrap();
        // 128, 16, count=1, first=42.
        assert_eq!(out.as_slice(), &[0x80, 0x01, 16, 1, 42]);
    }

    #[test]
    fn test_empty_input_writes_zero_count_header() {
        let mut out = DataBuffer::new();
        encode_into::<u32>(&[], &BlockLayout::default(), &mut out).unwrap();
        assert_eq!(out.as_slice(), &[0x80, 0x01, 16, 0, 0]);
    }

    #[test]
    fn test_constant_step_block_has_zero_widths() {
        let values: Vec<u32> = (0..17).map(|i| 10 + 3 * i).collect();
        let mut out = DataBuffer::new();
        encode_into(&values, &BlockLayout::default(), &mut out).unwrap();
        // header(5) + min_delta=3 + 8 zero widths + payload_bytes=0.
        let mut expected = vec![0x80, 0x01, 16, 17, 10, 3];
        expected.extend_from_slice(&[0; 8]);
        expected.push(0);
        assert_eq!(out.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_exact_block_bytes() {
        // Deltas [1, 3, 2] -> min 1, residuals [0, 2, 1] at 2 bits each.
        let values = [5u32, 6, 9, 11];
        let layout = BlockLayout::new(4, 2).unwrap();
        let mut out = DataBuffer::new();
        encode_into(&values, &layout, &mut out).unwrap();
        // Header 4,2,4,5 | min 1 | widths [2,1] | 1 payload byte.
        // Mini-block 0: residuals 0,2 at 2 bits; mini-block 1: residual 1 at 1 bit.
        let payload = 0b1_10_00u8;
        assert_eq!(out.as_slice(), &[4, 2, 4, 5, 1, 2, 1, 1, payload]);
    }

    #[test]
    fn test_append_once() {
        let mut encoder = PaxDeltaEncoder::<u32>::new(EncodingOption::delta()).unwrap();
        let first = typed_slice_to_bytes(&[1u32, 2, 3]);
        encoder.append(&first).unwrap();
        let size_after_first = encoder.get_buffer_size();

        let second = typed_slice_to_bytes(&[7u32, 8, 9]);
        let result = encoder.append(&second);
        assert!(matches!(result, Err(PaxError::Abort(_))));
        assert_eq!(encoder.get_buffer_size(), size_after_first);

        let result = encoder.append_values(&[4, 5]);
        assert!(matches!(result, Err(PaxError::Abort(_))));
    }

    #[test]
    fn test_append_rejects_partial_element() {
        let mut encoder = PaxDeltaEncoder::<u32>::new(EncodingOption::delta()).unwrap();
        let result = encoder.append(&[1, 2, 3, 4, 5]);
        assert!(matches!(result, Err(PaxError::BufferMismatch(4, 5))));
        // A rejected append does not consume the single allowed append.
        encoder.append(&typed_slice_to_bytes(&[1u32])).unwrap();
    }

    #[test]
    fn test_constructor_guards() {
        let mut option = EncodingOption::delta();
        option.column_encode_type = ColumnEncodingKind::RleV2;
        let result = PaxDeltaEncoder::<u32>::new(option);
        assert!(matches!(result, Err(PaxError::Unimplemented(_))));

        let mut option = EncodingOption::delta();
        option.is_sign = true;
        let result = PaxDeltaEncoder::<u32>::new(option);
        assert!(matches!(result, Err(PaxError::Unimplemented(_))));

        let option = EncodingOption {
            layout: BlockLayout {
                values_per_block: 100,
                values_per_mini_block: 16,
            },
            ..EncodingOption::delta()
        };
        let result = PaxDeltaEncoder::<u32>::new(option);
        assert!(matches!(result, Err(PaxError::Abort(_))));
    }

    #[test]
    fn test_null_support_and_flush() {
        let mut encoder = PaxDeltaEncoder::<u16>::new(EncodingOption::delta()).unwrap();
        assert!(!encoder.support_append_null());
        assert!(matches!(encoder.append_null(), Err(PaxError::Unimplemented(_))));
        encoder.append_values(&[1, 2, 3]).unwrap();
        encoder.flush().unwrap();
        assert!(encoder.get_buffer_size() > 0);
    }

    #[test]
    fn test_with_buffer_keeps_existing_bytes() {
        let mut buffer = DataBuffer::new();
        buffer.write_all(&[0xEE, 0xFF]).unwrap();
        let mut encoder =
            PaxDeltaEncoder::<u32>::with_buffer(EncodingOption::delta(), buffer).unwrap();
        encoder.append_values(&[42]).unwrap();
        assert_eq!(encoder.into_inner(), vec![0xEE, 0xFF, 0x80, 0x01, 16, 1, 42]);
    }
}
