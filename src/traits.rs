//! This module defines the element traits shared by the delta encoder and decoder.
//!
//! All arithmetic on the wire is unsigned 32-bit. These traits pin down how each
//! in-memory element type maps onto that domain, so the codec itself can stay
//! generic over element width instead of being duplicated per type.

use num_traits::{PrimInt, Unsigned};
use std::fmt::Debug;

/// An integer element type the delta decoder can reconstruct.
pub trait DeltaValue: PrimInt + bytemuck::Pod + Debug {
    /// `self - prev` with wraparound in `Self`, reinterpreted as a `u32` delta.
    fn delta_from(self, prev: Self) -> u32;

    /// `self + addend`, wrapping in the width of `Self`.
    fn wrapping_add_u64(self, addend: u64) -> Self;

    /// Converts a 32-bit header field (the stream's first value) into `Self`.
    fn from_header(value: u32) -> Self;

    /// The low 32 bits of the value, as written into the stream header.
    fn to_header(self) -> u32;
}

/// An element type the delta encoder accepts.
///
/// Only unsigned types up to 32 bits qualify: every delta must fit the 32-bit
/// wire domain, and signed columns need a zigzag pass this codec does not do.
pub trait EncodableValue: DeltaValue + Unsigned {}

macro_rules! impl_delta_value {
    ($($T:ty),*) => {
        $(
            impl DeltaValue for $T {
                #[inline(always)]
                fn delta_from(self, prev: Self) -> u32 {
                    self.wrapping_sub(prev) as u32
                }

                #[inline(always)]
                fn wrapping_add_u64(self, addend: u64) -> Self {
                    (self as u64).wrapping_add(addend) as $T
                }

                #[inline(always)]
                fn from_header(value: u32) -> Self {
                    value as $T
                }

                #[inline(always)]
                fn to_header(self) -> u32 {
                    self as u32
                }
            }
        )*
    };
}

impl_delta_value!(u8, u16, u32, i8, i16, i32, i64);

impl EncodableValue for u8 {}
impl EncodableValue for u16 {}
impl EncodableValue for u32 {}
