// In: src/bridge/format.rs

//! Public-facing result structs of the bridge layer.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::PaxError;

/// The structure of an encoded delta stream, returned by `analyze_stream`.
///
/// Sizes are in bytes. `header_size + metadata_size + payload_size == total_size`
/// for every stream that `analyze_stream` accepts.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StreamStats {
    /// Size of the stream header (four VLQ fields).
    pub header_size: usize,
    pub block_count: usize,
    pub total_count: u32,
    pub values_per_block: u32,
    pub values_per_mini_block: u32,
    /// Sum of all bit-packed payloads.
    pub payload_size: usize,
    /// Sum of all block headers (min delta, bit widths, payload size).
    pub metadata_size: usize,
    pub total_size: usize,
    /// Number of mini-blocks packed at each bit width. Mini-blocks past the
    /// end of a short final block are not counted.
    pub bit_width_histogram: BTreeMap<u8, usize>,
}

impl StreamStats {
    /// Average packed bits per value across all blocks, `0.0` for streams
    /// without blocks.
    pub fn bits_per_value(&self) -> f64 {
        let packed = self.total_count.saturating_sub(1);
        if packed == 0 {
            return 0.0;
        }
        (self.payload_size * 8) as f64 / packed as f64
    }

    pub fn to_json(&self) -> Result<String, PaxError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
