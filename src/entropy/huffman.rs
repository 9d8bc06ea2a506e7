//! Static Huffman encoder and the codec entry points
//!
//! Encoding makes two passes over the input: one to count symbol
//! frequencies, one to pack each symbol's code into 64-bit words. Empty input
//! produces no blob at all (`None`), and every entry point treats an absent
//! blob as an empty, trivially successful decode.
//!
//! ```rust
//! use huffpack::{decode_to_owned, encode, original_length};
//!
//! let blob = encode(b"aabbbcccc");
//! assert_eq!(original_length(blob.as_ref()), 9);
//! assert_eq!(decode_to_owned(blob.as_ref()).unwrap(), b"aabbbcccc");
//!
//! assert!(encode(b"").is_none());
//! assert!(decode_to_owned(None).unwrap().is_empty());
//! ```

use super::bit_ops::BitWriter;
use super::blob::EncodedBlob;
use super::code::CodeTree;
use super::frequency::FrequencyTable;
use super::tree::HuffmanTree;
use crate::config::{CodecConfig, Config};
use crate::error::{HuffpackError, Result};

/// Huffman encoder
#[derive(Debug, Clone, Default)]
pub struct HuffmanEncoder {
    config: CodecConfig,
}

impl HuffmanEncoder {
    /// Create an encoder with the given policy
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Encoder policy
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode `data`, or return `None` when it is empty
    ///
    /// Fails with a configuration error if the policy does not validate.
    pub fn encode(&self, data: &[u8]) -> Result<Option<EncodedBlob>> {
        self.config.validate()?;
        if data.len() > self.config.max_input_len {
            return Err(HuffpackError::input_too_large(
                data.len(),
                self.config.max_input_len,
            ));
        }
        if data.is_empty() {
            return Ok(None);
        }

        let frequencies = FrequencyTable::from_data(data);
        let tree = HuffmanTree::from_frequencies(&frequencies)?.assign_codes();
        if self.config.trace_code_table {
            trace_code_table(&tree);
        }

        Ok(Some(pack(data, tree)))
    }
}

fn pack(data: &[u8], tree: CodeTree) -> EncodedBlob {
    let table = tree.code_table();
    let bit_len = tree.encoded_bit_len();

    let mut writer = BitWriter::with_capacity(bit_len);
    for &byte in data {
        match table.get(byte) {
            Some(code) => writer.push_code(code),
            None => unreachable!("symbol {} was counted but has no code", byte),
        }
    }
    let (words, packed_bits) = writer.finish();
    debug_assert_eq!(packed_bits, bit_len);

    log::debug!(
        "huffman encode: {} bytes -> {} bytes ({} bits, {} symbols)",
        data.len(),
        (bit_len + 7) / 8,
        bit_len,
        tree.symbol_count()
    );

    EncodedBlob::new(data.len(), bit_len, words, tree)
}

fn trace_code_table(tree: &CodeTree) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }
    tree.for_each_leaf(|symbol, frequency, code| {
        let shown = if symbol.is_ascii_graphic() { symbol as char } else { ' ' };
        log::trace!(
            "'{}' {:3} : b = '{}' n = {} f = {}",
            shown,
            symbol,
            code,
            code.len(),
            frequency
        );
    });
}

/// Encode `data` with the default, unbounded policy
pub fn encode(data: &[u8]) -> Option<EncodedBlob> {
    match HuffmanEncoder::default().encode(data) {
        Ok(blob) => blob,
        // Byte counts of an in-memory buffer cannot overflow u64 or build a
        // tree past 64 levels, and the default policy has no size limit.
        Err(err) => unreachable!("unbounded encoder rejected {} bytes: {}", data.len(), err),
    }
}

/// Decode into a caller-provided buffer of at least `original_length(blob)`
/// bytes; an absent blob writes nothing and succeeds
pub fn decode(blob: Option<&EncodedBlob>, out: &mut [u8]) -> Result<()> {
    match blob {
        None => Ok(()),
        Some(blob) => blob.decode_into(out).map_err(log_decode_failure),
    }
}

/// Append the decoded bytes to `out`, growing it by the recorded length
pub fn decode_to_vec(blob: Option<&EncodedBlob>, out: &mut Vec<u8>) -> Result<()> {
    match blob {
        None => Ok(()),
        Some(blob) => blob.decode_to_vec(out).map_err(log_decode_failure),
    }
}

/// Decode into a new buffer
pub fn decode_to_owned(blob: Option<&EncodedBlob>) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(original_length(blob));
    decode_to_vec(blob, &mut out)?;
    Ok(out)
}

/// Recorded original length, 0 for an absent blob
pub fn original_length(blob: Option<&EncodedBlob>) -> usize {
    blob.map_or(0, EncodedBlob::original_len)
}

/// Release a blob, freeing its tree and buffer together
pub fn release(blob: Option<EncodedBlob>) {
    drop(blob);
}

fn log_decode_failure(err: HuffpackError) -> HuffpackError {
    log::debug!("huffman decode failed: {}", err);
    err
}
