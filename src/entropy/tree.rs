//! Huffman tree construction
//!
//! Greedy minimum-frequency merging over a binary heap. Leaves carry only
//! their frequency at this stage; codes are attached by
//! [`HuffmanTree::assign_codes`](crate::entropy::HuffmanTree::assign_codes),
//! which consumes the tree and produces the final immutable
//! [`CodeTree`](crate::entropy::CodeTree).

use super::code::MAX_CODE_LEN;
use super::frequency::FrequencyTable;
use crate::error::{HuffpackError, Result};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Node of a Huffman tree before code assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// A symbol with non-zero frequency
    Leaf {
        /// Byte value
        symbol: u8,
        /// Occurrences in the input
        frequency: u64,
    },
    /// A merge point
    Internal {
        /// Sum of the children's frequencies
        frequency: u64,
        /// Child reached by a 0 bit
        left: Box<TreeNode>,
        /// Child reached by a 1 bit; `None` only for the synthetic root of a
        /// single-symbol alphabet
        right: Option<Box<TreeNode>>,
    },
}

impl TreeNode {
    /// Frequency of the subtree
    pub fn frequency(&self) -> u64 {
        match self {
            TreeNode::Leaf { frequency, .. } => *frequency,
            TreeNode::Internal { frequency, .. } => *frequency,
        }
    }

    /// True for leaf nodes
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }
}

/// Heap entry ordered by `(frequency, sequence)`, smallest first.
///
/// The sequence number makes tie-breaking depend only on insertion order, so
/// a given frequency table always yields the same tree in this build.
#[derive(Debug)]
struct HeapEntry {
    frequency: u64,
    sequence: usize,
    node: TreeNode,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.frequency == other.frequency && self.sequence == other.sequence
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .frequency
            .cmp(&self.frequency)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Huffman tree with frequency-only leaves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: TreeNode,
    symbol_count: usize,
}

impl HuffmanTree {
    /// Build a Huffman tree from symbol frequencies
    ///
    /// Fails when every frequency is zero; callers encoding an empty buffer
    /// must short-circuit before reaching this point. Also fails when the
    /// counts sum past `u64::MAX` or the tree would need codes longer than
    /// [`MAX_CODE_LEN`] bits.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        let mut heap = BinaryHeap::with_capacity(frequencies.distinct_symbols());
        let mut sequence = 0usize;

        for (symbol, frequency) in frequencies.iter_nonzero() {
            heap.push(HeapEntry {
                frequency,
                sequence,
                node: TreeNode::Leaf { symbol, frequency },
            });
            sequence += 1;
        }

        let symbol_count = heap.len();
        if symbol_count == 1 {
            // A lone leaf still needs one edge above it, otherwise its code
            // would be empty and the bitstream could not be delimited.
            if let Some(entry) = heap.pop() {
                heap.push(HeapEntry {
                    frequency: entry.frequency,
                    sequence,
                    node: TreeNode::Internal {
                        frequency: entry.frequency,
                        left: Box::new(entry.node),
                        right: None,
                    },
                });
                sequence += 1;
            }
        }

        while heap.len() > 1 {
            if let (Some(first), Some(second)) = (heap.pop(), heap.pop()) {
                let frequency = first
                    .frequency
                    .checked_add(second.frequency)
                    .ok_or_else(|| {
                        HuffpackError::invalid_data("symbol frequencies overflow u64")
                    })?;
                heap.push(HeapEntry {
                    frequency,
                    sequence,
                    node: TreeNode::Internal {
                        frequency,
                        left: Box::new(first.node),
                        right: Some(Box::new(second.node)),
                    },
                });
                sequence += 1;
            }
        }

        let root = heap.pop().map(|entry| entry.node).ok_or_else(|| {
            HuffpackError::invalid_data("cannot build a Huffman tree without symbols")
        })?;

        let tree = Self { root, symbol_count };
        if tree.depth() > MAX_CODE_LEN as usize {
            return Err(HuffpackError::invalid_data(format!(
                "frequencies yield a {}-bit code, longer than {} bits",
                tree.depth(),
                MAX_CODE_LEN
            )));
        }
        Ok(tree)
    }

    /// Count frequencies in `data` and build the tree
    pub fn from_data(data: &[u8]) -> Result<Self> {
        Self::from_frequencies(&FrequencyTable::from_data(data))
    }

    /// Root node
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Number of distinct symbols (leaves)
    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// Total frequency, equal to the length of the input it was built from
    pub fn total_frequency(&self) -> u64 {
        self.root.frequency()
    }

    /// Depth of the deepest leaf, i.e. the longest code length
    pub fn depth(&self) -> usize {
        fn depth_of(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Internal { left, right, .. } => {
                    let right_depth = right.as_deref().map_or(0, depth_of);
                    1 + depth_of(left).max(right_depth)
                }
            }
        }
        depth_of(&self.root)
    }

    pub(crate) fn into_root(self) -> TreeNode {
        self.root
    }
}
