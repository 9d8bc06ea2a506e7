//! Encoded blob and the tree-walking decoder
//!
//! An [`EncodedBlob`] owns everything needed to reproduce the input: the
//! code tree, the packed words, the exact number of meaningful bits and the
//! original length. It is built in one step by the encoder and never
//! mutated afterwards.

use super::bit_ops::words_for_bits;
use super::code::{CodeNode, CodeTable, CodeTree};
use super::EntropyStats;
use crate::error::{HuffpackError, Result};

/// Output of a Huffman encode: code tree, packed bits and bookkeeping
///
/// Move-only; dropping it releases the tree and the buffer together.
#[derive(Debug)]
pub struct EncodedBlob {
    original_len: usize,
    bit_len: usize,
    words: Vec<u64>,
    tree: CodeTree,
}

impl EncodedBlob {
    pub(crate) fn new(original_len: usize, bit_len: usize, words: Vec<u64>, tree: CodeTree) -> Self {
        debug_assert!(original_len >= 1);
        debug_assert_eq!(words.len(), words_for_bits(bit_len));
        Self {
            original_len,
            bit_len,
            words,
            tree,
        }
    }

    /// Re-assemble a blob from externally stored parts
    ///
    /// Checks the bookkeeping is self-consistent; whether the bits actually
    /// walk the tree is only known on decode.
    pub fn from_parts(
        tree: CodeTree,
        words: Vec<u64>,
        bit_len: usize,
        original_len: usize,
    ) -> Result<Self> {
        if original_len == 0 {
            return Err(HuffpackError::invalid_data(
                "empty input has no blob; use None instead",
            ));
        }
        if bit_len == 0 {
            return Err(HuffpackError::invalid_data("blob holds no encoded bits"));
        }
        if words.len() != words_for_bits(bit_len) {
            return Err(HuffpackError::invalid_data(format!(
                "{} bits need {} words, got {}",
                bit_len,
                words_for_bits(bit_len),
                words.len()
            )));
        }
        Ok(Self {
            original_len,
            bit_len,
            words,
            tree,
        })
    }

    /// Split into `(tree, words, bit_len, original_len)`
    pub fn into_parts(self) -> (CodeTree, Vec<u64>, usize, usize) {
        (self.tree, self.words, self.bit_len, self.original_len)
    }

    /// Number of bytes the blob decodes to
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Number of meaningful bits in the packed words
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Packed words, MSB first, zero padded at the end
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Code tree used for both directions
    pub fn tree(&self) -> &CodeTree {
        &self.tree
    }

    /// Flat symbol to code table derived from the tree
    pub fn code_table(&self) -> CodeTable {
        self.tree.code_table()
    }

    /// Size of the packed bits rounded up to whole bytes
    pub fn encoded_bytes(&self) -> usize {
        (self.bit_len + 7) / 8
    }

    /// Compression statistics for this blob
    pub fn stats(&self) -> EntropyStats {
        EntropyStats::from_bits(
            self.original_len,
            self.bit_len,
            self.tree.frequencies().entropy(),
        )
    }

    /// Decode into the first `original_len()` bytes of `out`
    ///
    /// On error the contents of `out` are unspecified.
    pub fn decode_into(&self, out: &mut [u8]) -> Result<()> {
        if out.len() < self.original_len {
            return Err(HuffpackError::length_mismatch(self.original_len, out.len()));
        }
        let out = &mut out[..self.original_len];

        let root = self.tree.root();
        let mut node = root;
        let mut remaining = self.bit_len;
        let mut written = 0usize;

        for &word in &self.words {
            for shift in (0..64).rev() {
                if remaining == 0 {
                    break;
                }
                remaining -= 1;

                let bit = (word >> shift) & 1 == 1;
                node = node.child(bit).ok_or_else(|| {
                    HuffpackError::corrupt_stream(format!(
                        "no {} child at bit {}",
                        if bit { "right" } else { "left" },
                        self.bit_len - remaining - 1
                    ))
                })?;

                if let CodeNode::Leaf { symbol, .. } = node {
                    if written == out.len() {
                        return Err(HuffpackError::corrupt_stream(format!(
                            "stream holds more than {} symbols",
                            self.original_len
                        )));
                    }
                    out[written] = *symbol;
                    written += 1;
                    node = root;

                    if remaining == 0 {
                        if written != self.original_len {
                            return Err(HuffpackError::length_mismatch(self.original_len, written));
                        }
                        return Ok(());
                    }
                }
            }
        }

        Err(HuffpackError::corrupt_stream(format!(
            "stream ended inside a code after {} of {} symbols",
            written, self.original_len
        )))
    }

    /// Append the decoded bytes to `out`
    ///
    /// On error `out` is truncated back to its previous length.
    pub fn decode_to_vec(&self, out: &mut Vec<u8>) -> Result<()> {
        let start = out.len();
        out.resize(start + self.original_len, 0);
        let result = self.decode_into(&mut out[start..]);
        if result.is_err() {
            out.truncate(start);
        }
        result
    }

    /// Decode into a freshly allocated buffer
    pub fn decode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.original_len);
        self.decode_to_vec(&mut out)?;
        Ok(out)
    }

    /// Check that the blob decodes back to `original`
    pub fn verify(&self, original: &[u8]) -> Result<()> {
        if original.len() != self.original_len {
            return Err(HuffpackError::length_mismatch(self.original_len, original.len()));
        }
        let decoded = self.decode()?;
        match decoded.iter().zip(original).position(|(a, b)| a != b) {
            Some(index) => Err(HuffpackError::invalid_data(format!(
                "decoded byte {} differs from the original",
                index
            ))),
            None => Ok(()),
        }
    }
}
