//! Nibble Codec Tests
//!
//! Tests for the (8,4) codec: round trips, single-bit correction and the
//! best-effort behavior on heavier corruption.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test ecc_tests

use mrf49xa_dongle::ecc::*;

// =============================================================================
// Table Construction Tests
// =============================================================================

#[test]
fn encode_table_has_distinct_codewords() {
    for a in 0..16 {
        for b in (a + 1)..16 {
            assert_ne!(ENCODE_TABLE[a], ENCODE_TABLE[b]);
        }
    }
}

#[test]
fn codewords_have_zero_syndrome() {
    for nibble in 0..16u8 {
        assert_eq!(syndrome(encode_nibble(nibble)), 0);
    }
}

#[test]
fn codewords_at_least_distance_three() {
    for a in 0..16 {
        for b in (a + 1)..16 {
            let distance = (ENCODE_TABLE[a] ^ ENCODE_TABLE[b]).count_ones();
            assert!(distance >= 3, "{a:X} vs {b:X}: {distance}");
        }
    }
}

#[test]
fn decode_table_high_nibble_is_syndrome() {
    for received in 0..=255u8 {
        assert_eq!(DECODE_TABLE[received as usize] >> 4, apply_check(received));
    }
}

#[test]
fn encode_ignores_high_bits() {
    assert_eq!(encode_nibble(0xF3), encode_nibble(0x03));
}

// =============================================================================
// Round Trip and Correction Tests
// =============================================================================

#[test]
fn every_nibble_round_trips() {
    for nibble in 0..16u8 {
        assert_eq!(decode_nibble(encode_nibble(nibble)), nibble);
    }
}

#[test]
fn every_single_bit_error_corrected() {
    for nibble in 0..16u8 {
        let codeword = encode_nibble(nibble);
        for bit in 0..8 {
            let received = codeword ^ (1 << bit);
            assert_eq!(decode_nibble(received), nibble, "nibble {nibble:X} bit {bit}");
            assert!(is_correctable(syndrome(received)));
        }
    }
}

#[test]
fn single_bit_syndrome_names_the_bit() {
    let codeword = encode_nibble(0x9);
    for bit in 0..8 {
        assert_eq!(syndrome(codeword ^ (1 << bit)), CHECK[7 - bit]);
    }
}

#[test]
fn double_errors_detected_not_corrected() {
    let codeword = encode_nibble(0x6);
    let received = codeword ^ 0b1000_0001;
    let s = syndrome(received);
    assert_ne!(s, 0);
    assert!(!is_correctable(s));
    // Data bits come back as received
    assert_eq!(decode_nibble(received), received >> 4);
}

#[test]
fn every_byte_decodes_to_some_nibble() {
    for received in 0..=255u8 {
        assert!(decode_nibble(received) < 16);
    }
}

#[test]
fn byte_round_trip_low_nibble_first() {
    let words = encode_byte(0xAB);
    assert_eq!(words[0], encode_nibble(0x0B));
    assert_eq!(words[1], encode_nibble(0x0A));
    for byte in 0..=255u8 {
        let [low, high] = encode_byte(byte);
        assert_eq!(decode_nibble(low) | (decode_nibble(high) << 4), byte);
    }
}

#[test]
fn byte_survives_one_error_per_codeword() {
    let [low, high] = encode_byte(0x5C);
    assert_eq!(decode_nibble(low ^ 0x10), 0x0C);
    assert_eq!(decode_nibble(high ^ 0x02), 0x05);
}
