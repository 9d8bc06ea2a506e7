//! Code assignment
//!
//! A single consuming depth-first walk turns a [`HuffmanTree`] into a
//! [`CodeTree`] whose leaves carry their final bit pattern. Left edges append
//! a 0 bit, right edges a 1 bit, most significant bit first.

use super::frequency::{FrequencyTable, ALPHABET_SIZE};
use super::tree::{HuffmanTree, TreeNode};
use crate::error::{HuffpackError, Result};

/// Longest code a leaf may carry; patterns are held in a `u64`.
///
/// Reaching it needs a Fibonacci-shaped distribution over tens of terabytes
/// of input, so exceeding it is treated as a broken invariant.
pub const MAX_CODE_LEN: u8 = 64;

/// Bit pattern assigned to one symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u64,
    len: u8,
}

impl Code {
    /// Create a code from its low `len` bits
    ///
    /// # Panics
    ///
    /// Panics if `len` is 0 or above [`MAX_CODE_LEN`]; a zero-length code
    /// would make the bitstream impossible to delimit.
    pub fn new(bits: u64, len: u8) -> Self {
        assert!(
            (1..=MAX_CODE_LEN).contains(&len),
            "code length {} outside 1..={}",
            len,
            MAX_CODE_LEN
        );
        let bits = if len == MAX_CODE_LEN {
            bits
        } else {
            bits & ((1u64 << len) - 1)
        };
        Self { bits, len }
    }

    /// Pattern in the low `len` bits
    #[inline]
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of bits
    #[inline]
    pub fn len(&self) -> u8 {
        self.len
    }

    /// Bit at `index`, counted from the first bit emitted
    pub fn bit(&self, index: u8) -> bool {
        debug_assert!(index < self.len);
        (self.bits >> (self.len - 1 - index)) & 1 == 1
    }

    /// True if `self` is a prefix of `other` (or equal to it)
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && (other.bits >> (other.len - self.len)) == self.bits
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for index in 0..self.len {
            f.write_str(if self.bit(index) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Node of a Huffman tree after code assignment
#[derive(Debug, PartialEq, Eq)]
pub enum CodeNode {
    /// A symbol together with its code
    Leaf {
        /// Byte value
        symbol: u8,
        /// Occurrences in the input the tree was built from
        frequency: u64,
        /// Path from the root
        code: Code,
    },
    /// A merge point
    Internal {
        /// Sum of the children's frequencies
        frequency: u64,
        /// Child reached by a 0 bit
        left: Box<CodeNode>,
        /// Child reached by a 1 bit, absent under a single-symbol root
        right: Option<Box<CodeNode>>,
    },
}

impl CodeNode {
    /// Frequency of the subtree
    pub fn frequency(&self) -> u64 {
        match self {
            CodeNode::Leaf { frequency, .. } => *frequency,
            CodeNode::Internal { frequency, .. } => *frequency,
        }
    }

    /// Child selected by `bit`, if present; always `None` for leaves
    #[inline]
    pub fn child(&self, bit: bool) -> Option<&CodeNode> {
        match self {
            CodeNode::Leaf { .. } => None,
            CodeNode::Internal { left, right, .. } => {
                if bit {
                    right.as_deref()
                } else {
                    Some(left)
                }
            }
        }
    }
}

impl HuffmanTree {
    /// Attach a code to every leaf, consuming the frequency-only tree
    pub fn assign_codes(self) -> CodeTree {
        let symbol_count = self.symbol_count();
        let root = assign(self.into_root(), 0, 0);
        CodeTree { root, symbol_count }
    }
}

fn assign(node: TreeNode, bits: u64, depth: u8) -> CodeNode {
    match node {
        TreeNode::Leaf { symbol, frequency } => CodeNode::Leaf {
            symbol,
            frequency,
            code: Code::new(bits, depth),
        },
        TreeNode::Internal { frequency, left, right } => {
            assert!(depth < MAX_CODE_LEN, "Huffman tree deeper than {} levels", MAX_CODE_LEN);
            let bits = bits << 1;
            let depth = depth + 1;
            CodeNode::Internal {
                frequency,
                left: Box::new(assign(*left, bits, depth)),
                right: right.map(|right| Box::new(assign(*right, bits | 1, depth))),
            }
        }
    }
}

/// Huffman tree whose leaves carry their codes
///
/// The root is always an internal node, so every code is at least one bit.
#[derive(Debug, PartialEq, Eq)]
pub struct CodeTree {
    root: CodeNode,
    symbol_count: usize,
}

impl CodeTree {
    /// Build and assign codes in one step
    ///
    /// Fails under the same conditions as [`HuffmanTree::from_frequencies`].
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        Ok(HuffmanTree::from_frequencies(frequencies)?.assign_codes())
    }

    /// Root node
    pub fn root(&self) -> &CodeNode {
        &self.root
    }

    /// Number of distinct symbols (leaves)
    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// Flatten into a direct symbol lookup table
    ///
    /// # Panics
    ///
    /// Panics if a symbol appears on more than one leaf.
    pub fn code_table(&self) -> CodeTable {
        let mut table = CodeTable::empty();
        self.for_each_leaf(|symbol, _, code| {
            assert!(
                table.codes[symbol as usize].is_none(),
                "symbol {} reached twice in code tree",
                symbol
            );
            table.codes[symbol as usize] = Some(code);
        });
        table
    }

    /// Leaf frequencies recovered from the tree
    pub fn frequencies(&self) -> FrequencyTable {
        let mut table = FrequencyTable::new();
        self.for_each_leaf(|symbol, frequency, _| table.add(symbol, frequency));
        table
    }

    /// Visit leaves left to right
    pub fn for_each_leaf<F: FnMut(u8, u64, Code)>(&self, mut visit: F) {
        fn walk<F: FnMut(u8, u64, Code)>(node: &CodeNode, visit: &mut F) {
            match node {
                CodeNode::Leaf { symbol, frequency, code } => visit(*symbol, *frequency, *code),
                CodeNode::Internal { left, right, .. } => {
                    walk(left, visit);
                    if let Some(right) = right {
                        walk(right, visit);
                    }
                }
            }
        }
        walk(&self.root, &mut visit);
    }

    /// Number of bits needed to encode the input the tree was built from
    pub fn encoded_bit_len(&self) -> usize {
        let mut total = 0usize;
        self.for_each_leaf(|_, frequency, code| {
            total += frequency as usize * code.len() as usize;
        });
        total
    }

    /// Assemble a tree from an externally held root
    ///
    /// Used when re-hydrating a blob from stored parts. The root must be
    /// internal and every leaf code must match its path.
    pub fn from_root(root: CodeNode) -> Result<Self> {
        if matches!(root, CodeNode::Leaf { .. }) {
            return Err(HuffpackError::invalid_data("code tree root must be internal"));
        }

        fn check(
            node: &CodeNode,
            bits: u64,
            depth: u8,
            seen: &mut [bool; ALPHABET_SIZE],
        ) -> Result<usize> {
            match node {
                CodeNode::Leaf { symbol, code, .. } => {
                    if code.len() != depth || code.bits() != bits {
                        return Err(HuffpackError::invalid_data(format!(
                            "leaf {} carries code {} but sits at a different path",
                            symbol, code
                        )));
                    }
                    if std::mem::replace(&mut seen[*symbol as usize], true) {
                        return Err(HuffpackError::invalid_data(format!(
                            "symbol {} appears on more than one leaf",
                            symbol
                        )));
                    }
                    Ok(1)
                }
                CodeNode::Internal { left, right, .. } => {
                    if depth >= MAX_CODE_LEN {
                        return Err(HuffpackError::invalid_data("code tree too deep"));
                    }
                    let mut leaves = check(left, bits << 1, depth + 1, seen)?;
                    if let Some(right) = right {
                        leaves += check(right, (bits << 1) | 1, depth + 1, seen)?;
                    }
                    Ok(leaves)
                }
            }
        }

        let mut seen = [false; ALPHABET_SIZE];
        let symbol_count = check(&root, 0, 0, &mut seen)?;
        Ok(Self { root, symbol_count })
    }

    #[cfg(test)]
    pub(crate) fn into_root(self) -> CodeNode {
        self.root
    }
}

/// Direct symbol to code lookup, absent entries for unused symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Code>; ALPHABET_SIZE],
}

impl CodeTable {
    fn empty() -> Self {
        Self {
            codes: [None; ALPHABET_SIZE],
        }
    }

    /// Code for `symbol`, if it occurred in the input
    #[inline]
    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    /// `(symbol, code)` pairs in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.map(|code| (symbol as u8, code)))
    }

    /// Number of symbols with a code
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|code| code.is_some()).count()
    }

    /// True when no symbol has a code
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Longest code length in the table
    pub fn max_code_len(&self) -> u8 {
        self.iter().map(|(_, code)| code.len()).max().unwrap_or(0)
    }

    /// Number of bits `data` occupies under this table, or `None` if it
    /// contains a symbol without a code
    pub fn encoded_bit_len(&self, data: &[u8]) -> Option<usize> {
        data.iter()
            .map(|&byte| self.get(byte).map(|code| code.len() as usize))
            .sum()
    }
}
