//! Word-level bit packing
//!
//! Codes are appended most significant bit first into `u64` words. The final
//! word keeps its unused low bits at zero, so a buffer holding `n` bits is
//! always exactly [`words_for_bits(n)`](words_for_bits) words long.

use super::code::Code;

/// Width of one packed word in bits
pub const WORD_BITS: usize = 64;

/// Number of words needed to hold `bits` bits
#[inline]
pub const fn words_for_bits(bits: usize) -> usize {
    (bits + WORD_BITS - 1) / WORD_BITS
}

/// Read the bit at `index` (0 = most significant bit of the first word)
#[inline]
pub fn get_bit(words: &[u64], index: usize) -> bool {
    let word = words[index / WORD_BITS];
    (word >> (WORD_BITS - 1 - index % WORD_BITS)) & 1 == 1
}

/// Flip the bit at `index`
#[inline]
pub fn flip_bit(words: &mut [u64], index: usize) {
    words[index / WORD_BITS] ^= 1u64 << (WORD_BITS - 1 - index % WORD_BITS);
}

#[inline]
fn low_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Append-only MSB-first bit buffer over `u64` words
#[derive(Debug, Clone)]
pub struct BitWriter {
    words: Vec<u64>,
    current: u64,
    free: u32,
    bit_len: usize,
}

impl BitWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a writer with room for `bits` bits without reallocating
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: Vec::with_capacity(words_for_bits(bits)),
            current: 0,
            free: WORD_BITS as u32,
            bit_len: 0,
        }
    }

    /// Bits written so far
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Append a single bit
    pub fn push_bit(&mut self, bit: bool) {
        self.push_bits(bit as u64, 1);
    }

    /// Append the low `len` bits of `bits`, most significant first
    pub fn push_bits(&mut self, bits: u64, len: u32) {
        debug_assert!(len as usize <= WORD_BITS);
        let mut remaining = len;
        while remaining > 0 {
            let take = remaining.min(self.free);
            let chunk = (bits >> (remaining - take)) & low_mask(take);
            self.current |= chunk << (self.free - take);
            self.free -= take;
            remaining -= take;
            if self.free == 0 {
                self.words.push(self.current);
                self.current = 0;
                self.free = WORD_BITS as u32;
            }
        }
        self.bit_len += len as usize;
    }

    /// Append a code
    #[inline]
    pub fn push_code(&mut self, code: Code) {
        self.push_bits(code.bits(), code.len() as u32);
    }

    /// Flush the partial word and return `(words, bit_len)`
    pub fn finish(mut self) -> (Vec<u64>, usize) {
        if self.free != WORD_BITS as u32 {
            self.words.push(self.current);
        }
        (self.words, self.bit_len)
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_for_bits() {
        assert_eq!(words_for_bits(0), 0);
        assert_eq!(words_for_bits(1), 1);
        assert_eq!(words_for_bits(64), 1);
        assert_eq!(words_for_bits(65), 2);
        assert_eq!(words_for_bits(128), 2);
    }

    #[test]
    fn test_msb_first_packing() {
        let mut writer = BitWriter::new();
        writer.push_bits(0b101, 3);
        let (words, bit_len) = writer.finish();
        assert_eq!(bit_len, 3);
        assert_eq!(words, vec![0b101u64 << 61]);
    }

    #[test]
    fn test_empty_writer() {
        let (words, bit_len) = BitWriter::new().finish();
        assert!(words.is_empty());
        assert_eq!(bit_len, 0);
    }

    #[test]
    fn test_exact_word_boundary() {
        let mut writer = BitWriter::with_capacity(64);
        for _ in 0..64 {
            writer.push_bit(true);
        }
        let (words, bit_len) = writer.finish();
        assert_eq!(bit_len, 64);
        assert_eq!(words, vec![u64::MAX]);
    }

    #[test]
    fn test_code_straddles_words() {
        let mut writer = BitWriter::new();
        writer.push_bits(0, 60);
        writer.push_bits(0b1011_0111, 8);
        let (words, bit_len) = writer.finish();
        assert_eq!(bit_len, 68);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0], 0b1011);
        assert_eq!(words[1], 0b0111u64 << 60);
    }

    #[test]
    fn test_full_width_code() {
        let mut writer = BitWriter::new();
        writer.push_bit(true);
        writer.push_bits(u64::MAX, 64);
        let (words, bit_len) = writer.finish();
        assert_eq!(bit_len, 65);
        assert_eq!(words, vec![u64::MAX, 1u64 << 63]);
    }

    #[test]
    fn test_get_and_flip_bit() {
        let mut writer = BitWriter::new();
        for i in 0..100 {
            writer.push_bit(i % 3 == 0);
        }
        let (mut words, bit_len) = writer.finish();
        for i in 0..bit_len {
            assert_eq!(get_bit(&words, i), i % 3 == 0);
        }
        // Padding stays zero
        for i in bit_len..words.len() * WORD_BITS {
            assert!(!get_bit(&words, i));
        }

        flip_bit(&mut words, 70);
        assert_eq!(get_bit(&words, 70), 70 % 3 != 0);
    }

    #[test]
    fn test_push_code() {
        let mut writer = BitWriter::new();
        writer.push_code(Code::new(0b01, 2));
        writer.push_code(Code::new(0b1, 1));
        let (words, bit_len) = writer.finish();
        assert_eq!(bit_len, 3);
        assert_eq!(words[0] >> 61, 0b011);
    }
}
