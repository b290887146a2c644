// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the convenience surface over the codec for callers that just
// want bytes in and values out, without managing `DataBuffer`s or encoder and
// decoder lifecycles themselves.
//
// Data Flow (Encoding):
//
//   1. [Stateless API (encode_delta)]        -> Receives `&[T]`
//         |
//         `-> calls `codec::encode_into` with a fresh `DataBuffer`
//
//   2. [Codec (encode_into)]                 -> Header + blocks appended to the buffer
//
//   3. [Stateless API]                       -> Returns the buffer as `Vec<u8>`
//
//
// Data Flow (Decoding):
//
//   1. [Stateless API (decode_delta)]        -> Receives `&[u8]`
//         |
//         `-> calls `codec::decode_into` with a fresh `DataBuffer`
//
//   2. [Stateless API]                       -> Reinterprets the bytes as `Vec<T>`
//
//
// Inspection:
//
//   [Stateless API (analyze_stream)]  -> Walks headers only, returns `StreamStats`
//
// ====================================================================================
pub mod format;
pub mod stateless_api;

pub use format::StreamStats;
pub use stateless_api::{analyze_stream, decode_delta, encode_delta, encode_delta_with_layout};
