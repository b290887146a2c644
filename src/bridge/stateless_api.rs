// In: src/bridge/stateless_api.rs

use std::collections::BTreeMap;

use crate::bridge::format::StreamStats;
use crate::buffer::DataBuffer;
use crate::codec::decoder::decode_into;
use crate::codec::encoder::encode_into;
use crate::codec::format::{BlockHeader, StreamHeader};
use crate::config::BlockLayout;
use crate::error::PaxError;
use crate::traits::{DeltaValue, EncodableValue};

/// Encodes a slice into a standalone delta stream using the default 128/16 layout.
pub fn encode_delta<T: EncodableValue>(values: &[T]) -> Result<Vec<u8>, PaxError> {
    encode_delta_with_layout(values, &BlockLayout::default())
}

/// Encodes a slice into a standalone delta stream using a custom block layout.
pub fn encode_delta_with_layout<T: EncodableValue>(
    values: &[T],
    layout: &BlockLayout,
) -> Result<Vec<u8>, PaxError> {
    let mut out = DataBuffer::new();
    encode_into(values, layout, &mut out)?;
    Ok(out.into_vec())
}

/// Decodes a complete delta stream into a freshly allocated vector.
pub fn decode_delta<T: DeltaValue>(bytes: &[u8]) -> Result<Vec<T>, PaxError> {
    let mut out = DataBuffer::new();
    decode_into::<T>(bytes, &mut out)?;
    out.to_typed_vec::<T>()
}

/// Analyzes an encoded stream without unpacking any payload.
///
/// Only the header and the block headers are parsed, so this is cheap even for
/// large streams. Unlike the decoder, trailing bytes after the last block are
/// reported as an error: the stream is expected to be exactly one encoding.
pub fn analyze_stream(bytes: &[u8]) -> Result<StreamStats, PaxError> {
    let mut input = bytes;
    let header = StreamHeader::read_from(&mut input)?;
    let header_size = bytes.len() - input.len();

    let values_per_block = header.values_per_block as usize;
    let values_per_mini_block = header.values_per_mini_block as usize;
    let mini_blocks = header.mini_blocks_per_block();
    let mut remaining = header.block_value_count() as usize;

    let mut block_count = 0usize;
    let mut payload_size = 0usize;
    let mut metadata_size = 0usize;
    let mut bit_width_histogram = BTreeMap::new();

    while remaining > 0 {
        if input.is_empty() {
            return Err(PaxError::malformed(format!(
                "stream ends after {} blocks, {} values still undescribed",
                block_count, remaining
            )));
        }
        let before = input.len();
        let block = BlockHeader::read_from(&mut input, mini_blocks)?;
        metadata_size += before - input.len();

        let values_in_block = values_per_block.min(remaining);
        let used_mini_blocks = values_in_block.div_ceil(values_per_mini_block);
        for &width in &block.bit_widths()[..used_mini_blocks] {
            *bit_width_histogram.entry(width).or_insert(0) += 1;
        }

        payload_size += block.payload_bytes as usize;
        input = &input[block.payload_bytes as usize..];
        remaining -= values_in_block;
        block_count += 1;
    }

    if !input.is_empty() {
        return Err(PaxError::malformed(format!(
            "{} trailing bytes after the last block",
            input.len()
        )));
    }

    let stats = StreamStats {
        header_size,
        block_count,
        total_count: header.total_count,
        values_per_block: header.values_per_block,
        values_per_mini_block: header.values_per_mini_block,
        payload_size,
        metadata_size,
        total_size: bytes.len(),
        bit_width_histogram,
    };
    log::info!(
        "delta stream: {} values in {} blocks, {}B total ({}B header, {}B block headers, {}B payload, {:.2} bits/value)",
        stats.total_count,
        stats.block_count,
        stats.total_size,
        stats.header_size,
        stats.metadata_size,
        stats.payload_size,
        stats.bits_per_value()
    );
    Ok(stats)
}
