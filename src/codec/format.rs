// In: src/codec/format.rs

//! On-wire structures of a delta stream.
//!
//! ```text
//! Stream  := Header Block*
//! Header  := VLQ(values_per_block) VLQ(values_per_mini_block) VLQ(total_count) VLQ(first_value)
//! Block   := VLQ(min_delta) u8[mini_blocks_per_block] VLQ(payload_bytes) Payload
//! Payload := LSB-first bit-packed residuals, byte-padded at the end only
//! ```
//!
//! The encoder, the decoder and the stream analyzer all go through these two
//! types, so there is exactly one definition of the framing.

use crate::buffer::DataBuffer;
use crate::config::{BlockLayout, MAX_MINI_BLOCKS_PER_BLOCK};
use crate::error::PaxError;
use crate::kernels::bitstream::MAX_BIT_WIDTH;
use crate::kernels::vlq;

//==================================================================================
// I. Stream Header
//==================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub values_per_block: u32,
    pub values_per_mini_block: u32,
    pub total_count: u32,
    /// Low 32 bits of the first element.
    pub first_value: u32,
}

impl StreamHeader {
    pub fn new(layout: &BlockLayout, total_count: u32, first_value: u32) -> Self {
        Self {
            values_per_block: layout.values_per_block,
            values_per_mini_block: layout.values_per_mini_block,
            total_count,
            first_value,
        }
    }

    pub fn layout(&self) -> BlockLayout {
        BlockLayout {
            values_per_block: self.values_per_block,
            values_per_mini_block: self.values_per_mini_block,
        }
    }

    pub fn mini_blocks_per_block(&self) -> u32 {
        self.layout().mini_blocks_per_block()
    }

    pub fn write_to(&self, out: &mut DataBuffer) -> Result<(), PaxError> {
        out.write_var_int(self.values_per_block)?;
        out.write_var_int(self.values_per_mini_block)?;
        out.write_var_int(self.total_count)?;
        out.write_var_int(self.first_value)
    }

    /// Parses and validates a header, advancing `input` past it.
    pub fn read_from(input: &mut &[u8]) -> Result<Self, PaxError> {
        let header = Self {
            values_per_block: vlq::decode_one(input)?,
            values_per_mini_block: vlq::decode_one(input)?,
            total_count: vlq::decode_one(input)?,
            first_value: vlq::decode_one(input)?,
        };
        header.layout().validate().map_err(|e| match e {
            PaxError::Abort(msg) => PaxError::MalformedStream(msg),
            other => other,
        })?;
        Ok(header)
    }

    /// Number of values carried by blocks (everything after the first value).
    pub fn block_value_count(&self) -> u32 {
        self.total_count.saturating_sub(1)
    }

    /// Number of blocks a well-formed stream with this header contains.
    pub fn expected_block_count(&self) -> u32 {
        self.block_value_count().div_ceil(self.values_per_block)
    }
}

//==================================================================================
// II. Block Header
//==================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub min_delta: u32,
    widths: [u8; MAX_MINI_BLOCKS_PER_BLOCK as usize],
    mini_blocks: usize,
    pub payload_bytes: u32,
}

impl BlockHeader {
    /// `bit_widths.len()` must be the layout's mini-block count.
    pub fn new(min_delta: u32, bit_widths: &[u8], payload_bytes: u32) -> Result<Self, PaxError> {
        if bit_widths.len() > MAX_MINI_BLOCKS_PER_BLOCK as usize {
            return Err(PaxError::InternalError(format!(
                "{} bit widths exceed the per-block limit",
                bit_widths.len()
            )));
        }
        let mut widths = [0u8; MAX_MINI_BLOCKS_PER_BLOCK as usize];
        widths[..bit_widths.len()].copy_from_slice(bit_widths);
        Ok(Self {
            min_delta,
            widths,
            mini_blocks: bit_widths.len(),
            payload_bytes,
        })
    }

    pub fn bit_widths(&self) -> &[u8] {
        &self.widths[..self.mini_blocks]
    }

    /// Smallest possible encoded size of a block header.
    pub fn min_encoded_len(mini_blocks: u32) -> usize {
        2 + mini_blocks as usize
    }

    /// Exact number of bytes `write_to` appends.
    pub fn encoded_len(&self) -> usize {
        vlq::encoded_len(self.min_delta) + self.mini_blocks + vlq::encoded_len(self.payload_bytes)
    }

    pub fn write_to(&self, out: &mut DataBuffer) -> Result<(), PaxError> {
        out.write_var_int(self.min_delta)?;
        out.write_all(self.bit_widths())?;
        out.write_var_int(self.payload_bytes)
    }

    /// Parses a block header, advancing `input` to the start of its payload.
    ///
    /// Fails if a width is wider than 32 bits or the declared payload runs past
    /// the end of `input`.
    pub fn read_from(input: &mut &[u8], mini_blocks: u32) -> Result<Self, PaxError> {
        let min_delta = vlq::decode_one(input)?;

        let mini_blocks = mini_blocks as usize;
        if input.len() < mini_blocks {
            return Err(PaxError::malformed(format!(
                "block header needs {} bit-width bytes, {} left",
                mini_blocks,
                input.len()
            )));
        }
        let current: &[u8] = input;
        let (bit_widths, rest) = current.split_at(mini_blocks);
        if let Some(&w) = bit_widths.iter().find(|&&w| w > MAX_BIT_WIDTH) {
            return Err(PaxError::malformed(format!(
                "mini-block bit width {} exceeds {}",
                w, MAX_BIT_WIDTH
            )));
        }
        *input = rest;

        let payload_bytes = vlq::decode_one(input)?;
        if payload_bytes as usize > input.len() {
            return Err(PaxError::malformed(format!(
                "block declares {} payload bytes, {} left",
                payload_bytes,
                input.len()
            )));
        }

        Self::new(min_delta, bit_widths, payload_bytes)
    }
}
