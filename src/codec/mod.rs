// In: src/codec/mod.rs

//! The PAX delta codec: stream framing, the encoder and the decoder.
//!
//! `encode_into` and `decode_into` are the one-shot transforms. The
//! `PaxDeltaEncoder`/`PaxDeltaDecoder` structs wrap them behind the column
//! codec interface defined in `traits`.

pub mod decoder;
pub mod encoder;
pub mod format;
pub mod traits;

pub use decoder::{decode_into, PaxDeltaDecoder};
pub use encoder::{encode_into, PaxDeltaEncoder};
pub use format::{BlockHeader, StreamHeader};
pub use traits::{PaxDecoder, PaxEncoder};
