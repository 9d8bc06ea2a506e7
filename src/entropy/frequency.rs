//! Byte frequency counting
//!
//! One linear pass over the input producing a count per byte value. The
//! table is the only input the tree builder needs.

/// Number of distinct symbols in the byte alphabet
pub const ALPHABET_SIZE: usize = 256;

/// Occurrence count for each of the 256 byte values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Create a table with every count at zero
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Count byte occurrences in `data`
    pub fn from_data(data: &[u8]) -> Self {
        let mut counts = [0u64; ALPHABET_SIZE];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        Self { counts }
    }

    /// Wrap an explicit count array
    pub fn from_counts(counts: [u64; ALPHABET_SIZE]) -> Self {
        Self { counts }
    }

    /// Count for one symbol
    #[inline]
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Add `count` occurrences of `symbol`
    pub fn add(&mut self, symbol: u8, count: u64) {
        self.counts[symbol as usize] += count;
    }

    /// Raw count array
    pub fn counts(&self) -> &[u64; ALPHABET_SIZE] {
        &self.counts
    }

    /// Sum of all counts, i.e. the input length
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of symbols with a non-zero count
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// True when no symbol occurs
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// `(symbol, count)` pairs with non-zero count, in ascending symbol order
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    /// Shannon entropy of the distribution in bits per symbol
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }

        let total = total as f64;
        let mut entropy = 0.0;
        for (_, count) in self.iter_nonzero() {
            let p = count as f64 / total;
            entropy -= p * p.log2();
        }
        entropy
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}
