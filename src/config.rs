// In: src/config.rs

//! Encoding and decoding option descriptors for the delta codec.
//!
//! These mirror what the column writer/reader hands to an encoder or decoder:
//! which column encoding was selected, whether the column is signed, and (on
//! the write side) the block layout. All of them are plain serde structs so the
//! calling layer can load them from JSON alongside the rest of its settings.

use serde::{Deserialize, Serialize};

use crate::error::PaxError;

/// The decoder keeps per-block bit widths on the stack; streams declaring more
/// mini-blocks per block than this are rejected.
pub const MAX_MINI_BLOCKS_PER_BLOCK: u32 = 16;

/// Upper bound on `values_per_block`. Caps how many values a single
/// minimal block header can expand into when decoding untrusted input.
pub const MAX_VALUES_PER_BLOCK: u32 = 4096;

//==================================================================================
// I. Column Encoding Kinds
//==================================================================================

/// Column encodings known to the PAX storage format. Only `DirectDelta` is
/// handled by this crate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ColumnEncodingKind {
    /// Let the writer pick.
    #[default]
    DefEncoded,
    NoEncoded,
    RleV2,
    DirectDelta,
    CompressZstd,
    CompressZlib,
    Dictionary,
}

//==================================================================================
// II. Block Layout
//==================================================================================

/// How the encoder slices values into blocks and mini-blocks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct BlockLayout {
    #[serde(default = "default_values_per_block")]
    pub values_per_block: u32,
    #[serde(default = "default_values_per_mini_block")]
    pub values_per_mini_block: u32,
}

impl Default for BlockLayout {
    fn default() -> Self {
        Self {
            values_per_block: default_values_per_block(),
            values_per_mini_block: default_values_per_mini_block(),
        }
    }
}

impl BlockLayout {
    pub fn new(values_per_block: u32, values_per_mini_block: u32) -> Result<Self, PaxError> {
        let layout = Self {
            values_per_block,
            values_per_mini_block,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Only meaningful on a validated layout.
    pub fn mini_blocks_per_block(&self) -> u32 {
        self.values_per_block / self.values_per_mini_block
    }

    pub fn validate(&self) -> Result<(), PaxError> {
        if self.values_per_block == 0 || self.values_per_mini_block == 0 {
            return Err(PaxError::Abort(format!(
                "block layout sizes must be non-zero, got {}/{}",
                self.values_per_block, self.values_per_mini_block
            )));
        }
        if self.values_per_block > MAX_VALUES_PER_BLOCK {
            return Err(PaxError::Abort(format!(
                "values_per_block {} exceeds the limit of {}",
                self.values_per_block, MAX_VALUES_PER_BLOCK
            )));
        }
        if self.values_per_block % self.values_per_mini_block != 0 {
            return Err(PaxError::Abort(format!(
                "values_per_block {} is not a multiple of values_per_mini_block {}",
                self.values_per_block, self.values_per_mini_block
            )));
        }
        if self.mini_blocks_per_block() > MAX_MINI_BLOCKS_PER_BLOCK {
            return Err(PaxError::Abort(format!(
                "{} mini-blocks per block exceeds the limit of {}",
                self.mini_blocks_per_block(),
                MAX_MINI_BLOCKS_PER_BLOCK
            )));
        }
        Ok(())
    }
}

/// 128 values per block gives 8 mini-blocks of 16.
fn default_values_per_block() -> u32 {
    128
}

fn default_values_per_mini_block() -> u32 {
    16
}

//==================================================================================
// III. Encoder / Decoder Options
//==================================================================================

/// Options handed to an encoder.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct EncodingOption {
    #[serde(default)]
    pub column_encode_type: ColumnEncodingKind,
    #[serde(default)]
    pub is_sign: bool,
    #[serde(default)]
    pub layout: BlockLayout,
}

impl EncodingOption {
    /// Unsigned delta encoding with the default layout.
    pub fn delta() -> Self {
        Self {
            column_encode_type: ColumnEncodingKind::DirectDelta,
            is_sign: false,
            layout: BlockLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: BlockLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, PaxError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Options handed to a decoder.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DecodingOption {
    #[serde(default)]
    pub column_encode_type: ColumnEncodingKind,
    #[serde(default)]
    pub is_sign: bool,
}

impl DecodingOption {
    pub fn delta() -> Self {
        Self {
            column_encode_type: ColumnEncodingKind::DirectDelta,
            is_sign: false,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PaxError> {
        Ok(serde_json::from_str(json)?)
    }
}
