//! This module contains the pure, stateless kernels for VLQ (little-endian base-128)
//! framing of the stream's header and block fields.
//!
//! Every framed field is a 32-bit quantity, so an encoded value never exceeds
//! five bytes. Decoding is fully panic-free and rejects truncated or oversized
//! sequences instead of returning partial values.

use crate::error::PaxError;

/// The longest possible VLQ encoding of a `u32`.
pub const MAX_VLQ_LEN: usize = 5;

const SEVEN_BIT_MASK: u32 = 0x7F;
const CONTINUATION_BIT: u8 = 0x80;

//==================================================================================
// 1. Encoding
//==================================================================================

/// Encodes `value` into `out`, returning the number of bytes used.
#[inline]
pub fn encode_one(mut value: u32, out: &mut [u8; MAX_VLQ_LEN]) -> usize {
    let mut len = 0;
    while value >= 0x80 {
        out[len] = (value & SEVEN_BIT_MASK) as u8 | CONTINUATION_BIT;
        value >>= 7;
        len += 1;
    }
    out[len] = value as u8;
    len + 1
}

/// The number of bytes `encode_one` would emit for `value`.
#[inline]
pub fn encoded_len(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

//==================================================================================
// 2. Decoding
//==================================================================================

/// Decodes one value from the front of `input` and advances it past the bytes read.
pub fn decode_one(input: &mut &[u8]) -> Result<u32, PaxError> {
    let mut result = 0u32;
    let mut shift = 0u32;
    let bytes: &[u8] = input;

    for (i, &byte) in bytes.iter().enumerate() {
        if i == MAX_VLQ_LEN {
            return Err(PaxError::malformed(
                "VLQ value is longer than five bytes",
            ));
        }
        let payload = (byte as u32) & SEVEN_BIT_MASK;
        // The fifth group only has room for the top four bits of a u32.
        if shift == 28 && payload > 0x0F {
            return Err(PaxError::malformed("VLQ value overflows 32 bits"));
        }
        result |= payload << shift;

        if byte & CONTINUATION_BIT == 0 {
            *input = &bytes[i + 1..];
            return Ok(result);
        }
        shift += 7;
    }

    Err(PaxError::malformed(
        "unexpected end of input inside a VLQ value",
    ))
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn encode_vec(value: u32) -> Vec<u8> {
        let mut scratch = [0u8; MAX_VLQ_LEN];
        let len = encode_one(value, &mut scratch);
        scratch[..len].to_vec()
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(encode_vec(0), vec![0x00]);
        assert_eq!(encode_vec(127), vec![0x7F]);
        assert_eq!(encode_vec(128), vec![0x80, 0x01]);
        assert_eq!(encode_vec(624_485), vec![0xE5, 0x8E, 0x26]);
        assert_eq!(encode_vec(u32::MAX), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn test_roundtrip_and_len() {
        for value in [0u32, 1, 127, 128, 16_383, 16_384, 1 << 21, 1 << 28, u32::MAX] {
            let bytes = encode_vec(value);
            assert_eq!(bytes.len(), encoded_len(value), "len mismatch for {}", value);

            let mut input = bytes.as_slice();
            assert_eq!(decode_one(&mut input).unwrap(), value);
            assert!(input.is_empty());
        }
    }

    #[test]
    fn test_decode_advances_past_consumed_bytes_only() {
        let bytes = [0x80, 0x01, 0x05, 0xAA];
        let mut input = &bytes[..];
        assert_eq!(decode_one(&mut input).unwrap(), 128);
        assert_eq!(decode_one(&mut input).unwrap(), 5);
        assert_eq!(input, &[0xAA]);
    }

    #[test]
    fn test_decode_truncated_buffer() {
        let bytes = encode_vec(624_485);
        let mut input = &bytes[..2];
        let result = decode_one(&mut input);
        assert!(matches!(result, Err(PaxError::MalformedStream(_))));
        if let Err(e) = result {
            assert!(e.to_string().contains("unexpected end of input"));
        }

        let mut empty: &[u8] = &[];
        assert!(decode_one(&mut empty).is_err());
    }

    #[test]
    fn test_decode_overflow_error() {
        // Fifth group sets bit 32.
        let mut input: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF, 0x1F];
        let result = decode_one(&mut input);
        assert!(matches!(result, Err(PaxError::MalformedStream(msg)) if msg.contains("overflows")));

        // Six bytes can never be a valid u32.
        let mut input: &[u8] = &[0x80, 0x80, 0x80, 0x80, 0x80, 0x00];
        let result = decode_one(&mut input);
        assert!(matches!(result, Err(PaxError::MalformedStream(msg)) if msg.contains("five bytes")));
    }
}
