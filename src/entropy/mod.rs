//! Static Huffman entropy coding
//!
//! The pipeline, leaf first:
//!
//! - [`frequency`]: one pass over the input, 256 counts
//! - [`tree`]: greedy minimum-frequency merging into a [`HuffmanTree`]
//! - [`code`]: a consuming walk attaching a [`Code`] to every leaf
//! - [`bit_ops`]: MSB-first packing into `u64` words
//! - [`blob`]: the [`EncodedBlob`] and its tree-walking decoder
//! - [`huffman`]: the encoder and the codec entry points

pub mod bit_ops;
pub mod blob;
pub mod code;
pub mod frequency;
pub mod huffman;
pub mod tree;

// Re-export main types
pub use bit_ops::{words_for_bits, BitWriter, WORD_BITS};
pub use blob::EncodedBlob;
pub use code::{Code, CodeNode, CodeTable, CodeTree, MAX_CODE_LEN};
pub use frequency::{FrequencyTable, ALPHABET_SIZE};
pub use huffman::{
    decode, decode_to_owned, decode_to_vec, encode, original_length, release, HuffmanEncoder,
};
pub use tree::{HuffmanTree, TreeNode};

/// Size and efficiency figures for one encoded buffer
///
/// Computed from exact bit counts; only `output_size` is rounded up to
/// whole bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct EntropyStats {
    /// Original size in bytes
    pub input_size: usize,
    /// Packed size in bits
    pub output_bits: usize,
    /// Packed size in bytes, `ceil(output_bits / 8)`
    pub output_size: usize,
    /// `output_size / input_size`
    pub compression_ratio: f64,
    /// Average code length in bits
    pub bits_per_symbol: f64,
    /// Shannon entropy of the input, bits per byte
    pub entropy: f64,
    /// `entropy / bits_per_symbol`, at most 1 for a Huffman code
    pub efficiency: f64,
}

impl EntropyStats {
    /// Figures for `input_size` bytes packed into `output_bits` bits
    pub fn from_bits(input_size: usize, output_bits: usize, entropy: f64) -> Self {
        let output_size = (output_bits + 7) / 8;
        let (compression_ratio, bits_per_symbol) = match input_size {
            0 => (0.0, 0.0),
            n => (
                output_size as f64 / n as f64,
                output_bits as f64 / n as f64,
            ),
        };
        let efficiency = if bits_per_symbol > 0.0 {
            entropy / bits_per_symbol
        } else {
            0.0
        };

        Self {
            input_size,
            output_bits,
            output_size,
            compression_ratio,
            bits_per_symbol,
            entropy,
            efficiency,
        }
    }

    /// Percentage of the input size saved
    pub fn space_savings(&self) -> f64 {
        (1.0 - self.compression_ratio) * 100.0
    }

    /// Shannon entropy of `data` in bits per byte
    pub fn calculate_entropy(data: &[u8]) -> f64 {
        FrequencyTable::from_data(data).entropy()
    }
}
