//! Pure, stateless building blocks for the delta codec.
//!
//! - `vlq`: base-128 framing of header and block fields.
//! - `bit_width`: minimal bit-width selection for mini-block residuals.
//! - `bitstream`: the 64-bit-accumulator bit writer and reader.

pub mod bit_width;
pub mod bitstream;
pub mod vlq;
