//! This file is the root of the `pax_delta` Rust crate.
//!
//! The crate implements the block-based delta encoding used for sorted and
//! monotonic integer columns in PAX storage: values are turned into deltas,
//! each block subtracts its smallest delta, and each mini-block bit-packs the
//! remainders at the narrowest width that fits.
//!
//! Its responsibilities here are strictly limited to:
//! 1.  Declaring all the top-level modules of the library.
//! 2.  Re-exporting the types most callers need, so they can depend on
//!     `pax_delta::PaxDeltaEncoder` instead of the internal module paths.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod bridge;
pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod kernels;
pub mod logging;
pub mod traits;

mod utils;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use bridge::{analyze_stream, decode_delta, encode_delta, encode_delta_with_layout, StreamStats};
pub use buffer::DataBuffer;
pub use codec::{
    decode_into, encode_into, PaxDecoder, PaxDeltaDecoder, PaxDeltaEncoder, PaxEncoder,
};
pub use config::{BlockLayout, ColumnEncodingKind, DecodingOption, EncodingOption};
pub use error::{ErrorKind, PaxError};
pub use logging::enable_verbose_logging;
pub use traits::{DeltaValue, EncodableValue};
