//! Minimal bit-width calculation for mini-block residuals.
//!
//! `num_bits_allow_zero` is the portable reference; `fast_num_bits` must agree
//! with it for every input.

/// Shift-and-count reference implementation. `0` maps to `0` bits.
pub fn num_bits_allow_zero(mut value: u32) -> u8 {
    let mut bits = 0u8;
    while value != 0 {
        bits += 1;
        value >>= 1;
    }
    bits
}

/// The smallest `w` such that `value < 2^w`.
#[inline(always)]
pub fn fast_num_bits(value: u32) -> u8 {
    (u32::BITS - value.leading_zeros()) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_known_widths() {
        assert_eq!(fast_num_bits(0), 0);
        assert_eq!(fast_num_bits(1), 1);
        assert_eq!(fast_num_bits(255), 8);
        assert_eq!(fast_num_bits(256), 9);
        assert_eq!(fast_num_bits(65_535), 16);
        assert_eq!(fast_num_bits(u32::MAX), 32);
    }

    #[test]
    fn test_fast_matches_reference_on_powers_of_two() {
        for shift in 0..32 {
            let p = 1u32 << shift;
            for v in [p - 1, p, p + 1, p.wrapping_mul(3)] {
                assert_eq!(fast_num_bits(v), num_bits_allow_zero(v), "value {}", v);
            }
        }
    }

    #[test]
    fn test_fast_matches_reference_random() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for _ in 0..10_000 {
            let v: u32 = rng.random();
            assert_eq!(fast_num_bits(v), num_bits_allow_zero(v));
            // Minimality: v fits in w bits but not in w - 1.
            let w = fast_num_bits(v) as u32;
            assert!(w == 32 || (v as u64) < (1u64 << w));
            assert!(w == 0 || (v as u64) >= (1u64 << (w - 1)));
        }
    }
}
