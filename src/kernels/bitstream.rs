//! This module contains the 64-bit-accumulator bit writer and reader used for
//! mini-block payloads.
//!
//! Values are packed LSB-first: the first value written occupies the lowest bits
//! of the first byte. Both sides hold at most 39 bits in the accumulator
//! (< 8 leftover + a 32-bit value), so a `u64` never overflows.

use crate::error::PaxError;

/// The widest value either side will move in one call.
pub const MAX_BIT_WIDTH: u8 = 32;

//==================================================================================
// 1. Writer
//==================================================================================

/// Packs fixed-width values into a pre-sized byte slice.
pub struct BitWriter<'a> {
    out: &'a mut [u8],
    index: usize,
    bit_buffer: u64,
    bit_count: u32,
}

impl<'a> BitWriter<'a> {
    pub fn new(out: &'a mut [u8]) -> Self {
        Self {
            out,
            index: 0,
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Appends the low `width` bits of `value`. `value` must be `< 2^width`.
    #[inline]
    pub fn write(&mut self, value: u32, width: u8) -> Result<(), PaxError> {
        if width == 0 {
            return Ok(());
        }
        debug_assert!(width <= MAX_BIT_WIDTH);
        debug_assert!(width == 32 || value < (1u32 << width));

        self.bit_buffer |= (value as u64) << self.bit_count;
        self.bit_count += width as u32;
        while self.bit_count >= 8 {
            self.emit_byte()?;
            self.bit_buffer >>= 8;
            self.bit_count -= 8;
        }
        Ok(())
    }

    /// Emits any held bits as one final, zero-padded byte.
    pub fn flush_to_byte(&mut self) -> Result<(), PaxError> {
        if self.bit_count > 0 {
            self.emit_byte()?;
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
        Ok(())
    }

    pub fn bytes_written(&self) -> usize {
        self.index
    }

    #[inline(always)]
    fn emit_byte(&mut self) -> Result<(), PaxError> {
        let slot = self.out.get_mut(self.index).ok_or_else(|| {
            PaxError::InternalError(format!(
                "bit writer overflowed its {}-byte payload region",
                self.index
            ))
        })?;
        *slot = (self.bit_buffer & 0xFF) as u8;
        self.index += 1;
        Ok(())
    }
}

//==================================================================================
// 2. Reader
//==================================================================================

/// Unpacks fixed-width values from exactly one block payload.
pub struct BitReader<'a> {
    input: &'a [u8],
    index: usize,
    bit_buffer: u64,
    bit_count: u32,
}

impl<'a> BitReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            index: 0,
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Pulls whole bytes into the accumulator until `need_bits` are held or the
    /// input runs out.
    #[inline(always)]
    pub fn ensure(&mut self, need_bits: u32) {
        while self.bit_count < need_bits && self.index < self.input.len() {
            self.bit_buffer |= (self.input[self.index] as u64) << self.bit_count;
            self.index += 1;
            self.bit_count += 8;
        }
    }

    /// Reads the next `width`-bit value. Width 0 consumes nothing.
    #[inline(always)]
    pub fn read(&mut self, width: u8) -> Result<u32, PaxError> {
        if width == 0 {
            return Ok(0);
        }
        if width > MAX_BIT_WIDTH {
            return Err(PaxError::malformed(format!(
                "bit width {} exceeds {}",
                width, MAX_BIT_WIDTH
            )));
        }
        let width = width as u32;
        self.ensure(width);
        if self.bit_count < width {
            return Err(PaxError::malformed(format!(
                "payload exhausted: needed {} bits, {} left",
                width, self.bit_count
            )));
        }

        let result = if width == 32 {
            (self.bit_buffer & 0xFFFF_FFFF) as u32
        } else {
            (self.bit_buffer & ((1u64 << width) - 1)) as u32
        };
        self.bit_buffer >>= width;
        self.bit_count -= width;
        Ok(result)
    }

    /// Drops the unread bits of the current partially-consumed byte.
    pub fn align_to_byte(&mut self) {
        let drop = self.bit_count % 8;
        if drop != 0 {
            self.bit_buffer >>= drop;
            self.bit_count -= drop;
        }
    }

    pub fn bytes_consumed(&self) -> usize {
        self.index
    }

    /// Bits still held in the accumulator.
    pub fn held_bits(&self) -> u32 {
        self.bit_count
    }
}
