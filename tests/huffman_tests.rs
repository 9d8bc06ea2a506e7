//! Integration tests for the static Huffman codec
//!
//! Covers the public entry points end to end:
//! - Empty, single-symbol and small mixed inputs
//! - Full alphabet and longer-than-alphabet inputs
//! - Random uppercase strings of every length up to 500
//! - Concurrent decoding of a shared blob
//! - Re-hydrating blobs from stored parts and corrupting them

use huffpack::entropy::bit_ops::{flip_bit, words_for_bits};
use huffpack::{
    decode, decode_to_owned, decode_to_vec, encode, original_length, release, CodecConfig,
    EncodedBlob, HuffmanEncoder, HuffpackError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn assert_round_trip(data: &[u8]) -> Option<EncodedBlob> {
    let blob = encode(data);
    assert_eq!(original_length(blob.as_ref()), data.len());

    let mut out = vec![0u8; data.len()];
    decode(blob.as_ref(), &mut out).unwrap();
    assert_eq!(out, data);

    if let Some(blob) = &blob {
        blob.verify(data).unwrap();
        assert_eq!(blob.words().len(), words_for_bits(blob.bit_len()));
    }
    blob
}

/// Test the empty input scenario
#[test]
fn test_empty_input() {
    let blob = assert_round_trip(b"");
    assert!(blob.is_none());

    let mut out: Vec<u8> = Vec::new();
    assert!(decode(None, &mut out).is_ok());
    assert!(out.is_empty());
    release(blob);
}

/// Test inputs made of one repeated byte
#[test]
fn test_single_symbol_inputs() {
    for len in [1usize, 2, 3, 63, 64, 65, 1000] {
        let data = vec![b'a'; len];
        let blob = assert_round_trip(&data).unwrap();
        let code = blob.code_table().get(b'a').unwrap();
        assert_eq!(code.len(), 1);
        assert_eq!(blob.bit_len(), len);
    }
}

/// Test the small three-symbol scenario
#[test]
fn test_three_symbols() {
    let blob = assert_round_trip(b"aabbbcccc").unwrap();
    let table = blob.code_table();
    assert!(table.get(b'c').unwrap().len() <= table.get(b'a').unwrap().len());
    assert!(table.get(b'c').unwrap().len() <= table.get(b'b').unwrap().len());
}

/// Test the textbook six-symbol distribution
#[test]
fn test_textbook_distribution() {
    let mut data = Vec::new();
    for (symbol, count) in [(b'a', 5), (b'b', 9), (b'c', 12), (b'd', 13), (b'e', 16), (b'f', 45)] {
        data.extend(std::iter::repeat(symbol).take(count));
    }
    let blob = assert_round_trip(&data).unwrap();
    assert_eq!(blob.bit_len(), 224);
    assert_eq!(blob.code_table().get(b'f').unwrap().len(), 1);
}

/// Test every byte value exactly once
#[test]
fn test_all_byte_values() {
    let data: Vec<u8> = (0..=255).collect();
    let blob = assert_round_trip(&data).unwrap();
    assert_eq!(blob.code_table().len(), 256);
    assert!(blob.code_table().iter().all(|(_, code)| code.len() == 8));
}

/// Test 500 bytes cycling through the alphabet
#[test]
fn test_wrapping_byte_sequence() {
    let data: Vec<u8> = (0..500).map(|i| i as u8).collect();
    assert_round_trip(&data);
}

/// Test random uppercase strings of every length below 500
#[test]
fn test_random_uppercase_strings() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for len in 0..500 {
        let data: Vec<u8> = (0..len).map(|_| b'A' + rng.gen_range(0..26u8)).collect();
        let blob = assert_round_trip(&data);
        release(blob);
    }
}

/// Test random bytes over a skewed distribution
#[test]
fn test_random_skewed_bytes() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let len = rng.gen_range(1..4096);
        let data: Vec<u8> = (0..len)
            .map(|_| {
                let r: u32 = rng.gen_range(0..1000);
                if r < 700 {
                    b' '
                } else if r < 950 {
                    rng.gen_range(b'a'..=b'z')
                } else {
                    rng.gen()
                }
            })
            .collect();
        let blob = assert_round_trip(&data).unwrap();
        assert!(blob.bit_len() < data.len() * 8);
    }
}

/// Test the growable decode appends after existing content
#[test]
fn test_decode_to_vec_appends() {
    let blob = encode(b" tail");
    let mut out = b"head".to_vec();
    decode_to_vec(blob.as_ref(), &mut out).unwrap();
    assert_eq!(out, b"head tail");

    decode_to_vec(None, &mut out).unwrap();
    assert_eq!(out, b"head tail");
}

/// Test decoding one blob from several threads at once
#[test]
fn test_concurrent_decode() {
    let data: Vec<u8> = b"shared immutable blob ".iter().cycle().take(10_000).copied().collect();
    let blob = encode(&data).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let decoded = blob.decode().unwrap();
                assert_eq!(decoded, data);
            });
        }
    });
}

/// Test encoding independent inputs on separate threads
#[test]
fn test_concurrent_encode() {
    let handles: Vec<_> = (0..4u8)
        .map(|seed| {
            std::thread::spawn(move || {
                let data: Vec<u8> = (0..2000u32).map(|i| (i as u8).wrapping_mul(seed + 1)).collect();
                let blob = encode(&data).unwrap();
                (data, blob)
            })
        })
        .collect();

    for handle in handles {
        let (data, blob) = handle.join().unwrap();
        assert_eq!(decode_to_owned(Some(&blob)).unwrap(), data);
    }
}

/// Test blobs survive a round trip through their parts
#[test]
fn test_parts_round_trip() {
    let data = b"stored elsewhere and loaded back";
    let blob = encode(data).unwrap();
    let (tree, words, bit_len, original_len) = blob.into_parts();
    let blob = EncodedBlob::from_parts(tree, words, bit_len, original_len).unwrap();
    assert_eq!(blob.decode().unwrap(), data);
}

/// Test that flipping any single bit never panics or overruns
#[test]
fn test_bit_flips_are_detected_or_contained() {
    let data = b"Corrupting one bit inside the packed buffer";
    let reference = encode(data).unwrap();
    let bit_len = reference.bit_len();

    for index in 0..bit_len {
        let (tree, mut words, bit_len, original_len) = encode(data).unwrap().into_parts();
        flip_bit(&mut words, index);
        let corrupt = EncodedBlob::from_parts(tree, words, bit_len, original_len).unwrap();

        let mut out = vec![0u8; data.len()];
        match decode(Some(&corrupt), &mut out) {
            Ok(()) => assert_ne!(&out[..], &data[..]),
            Err(err) => assert!(
                matches!(err, HuffpackError::CorruptStream { .. } | HuffpackError::LengthMismatch { .. }),
                "unexpected error {:?}",
                err
            ),
        }
    }
}

/// Test the bounded encoder policy
#[test]
fn test_bounded_encoder() {
    let encoder = HuffmanEncoder::new(CodecConfig::bounded(16));
    let blob = encoder.encode(b"sixteen bytes!!!").unwrap();
    assert!(blob.is_some());

    let err = encoder.encode(b"seventeen bytes!!").unwrap_err();
    assert_eq!(err.category(), "limit");
}

/// Test compression statistics are reported sensibly
#[test]
fn test_stats() {
    let data = b"aaaaaaaaaaaaaaaabbbbbbbbcccc";
    let blob = encode(data).unwrap();
    let stats = blob.stats();
    assert_eq!(stats.input_size, data.len());
    assert_eq!(stats.output_bits, blob.bit_len());
    assert_eq!(stats.output_size, blob.encoded_bytes());
    assert!(stats.compression_ratio < 1.0);
    assert!(stats.space_savings() > 0.0);
    assert!(stats.efficiency > 0.0 && stats.efficiency <= 1.0 + 1e-9);
}
