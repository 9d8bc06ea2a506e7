//! # Huffpack: Static Huffman Coding for In-Memory Buffers
//!
//! This crate implements a classic, non-adaptive Huffman codec over the byte
//! alphabet. The encoder counts byte frequencies, builds a prefix-code tree by
//! greedy minimum-frequency merging, assigns codes and packs the input into
//! 64-bit words. The decoder walks the same tree bit by bit.
//!
//! ## Key Features
//!
//! - **Exact round-trip**: decoding reproduces the input byte for byte
//! - **Absent blobs**: empty input encodes to `None`, which decodes to nothing
//! - **Single-symbol safety**: a lone symbol still gets a one-bit code
//! - **Structural checks**: corrupt or foreign blobs fail with an error
//!   instead of overrunning the output buffer
//! - **Move-only blobs**: tree and buffer are released together, exactly once
//!
//! ## Quick Start
//!
//! ```rust
//! use huffpack::{decode, encode, original_length, release};
//!
//! let data = b"aabbbcccc";
//! let blob = encode(data);
//!
//! let mut out = vec![0u8; original_length(blob.as_ref())];
//! decode(blob.as_ref(), &mut out).unwrap();
//! assert_eq!(out, data);
//!
//! release(blob);
//! ```
//!
//! The encoded blob is an in-memory artifact only; storing or transmitting it
//! is left to the caller via [`EncodedBlob::into_parts`] and
//! [`EncodedBlob::from_parts`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod entropy;
pub mod error;

// Re-export core types
pub use config::{CodecConfig, Config};
pub use error::{HuffpackError, Result};

pub use entropy::{
    decode, decode_to_owned, decode_to_vec, encode, original_length, release, Code, CodeTable,
    CodeTree, EncodedBlob, EntropyStats, FrequencyTable, HuffmanEncoder, HuffmanTree,
};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library (currently only logs the version)
pub fn init() {
    log::debug!("Initializing huffpack v{}", VERSION);
}
