//! (8,4) Nibble Codec
//!
//! Each 4-bit data nibble is carried as one 8-bit codeword. The code is an
//! extended Hamming code in systematic form: the data sits in the high
//! nibble of the codeword, the parity in the low nibble. Any single bit
//! error is corrected. Two-bit errors produce a syndrome that matches no
//! check-matrix column; the received data bits are returned unchanged and
//! are not guaranteed correct.
//!
//! Both lookup tables are computed at compile time from [`GENERATOR`] and
//! [`CHECK`].
//!
//! # Matrix conventions
//!
//! Data bit 3 (MSB) selects generator row 0. Codeword bit 7 (MSB) selects
//! check row 0, so a syndrome equal to `CHECK[k]` points at codeword bit
//! `7 - k`. Only the low four bits of each check row are used.

/// Generator matrix rows (systematic form)
pub const GENERATOR: [u8; 4] = [0x8E, 0x4D, 0x2B, 0x17];

/// Check matrix, one row per codeword bit (MSB first)
pub const CHECK: [u8; 8] = [0x0E, 0x0D, 0x0B, 0x07, 0x08, 0x04, 0x02, 0x01];

/// Codeword for every data nibble
pub const ENCODE_TABLE: [u8; 16] = build_encode_table();

/// Decoded nibble for every received byte
///
/// Low nibble: corrected data. High nibble: the syndrome, kept for
/// diagnostics.
pub const DECODE_TABLE: [u8; 256] = build_decode_table();

/// Multiply a data nibble by the generator matrix over GF(2)
#[must_use]
pub const fn apply_generator(nibble: u8) -> u8 {
    let mut codeword = 0;
    let mut row = 0;
    while row < GENERATOR.len() {
        if nibble & (0x08 >> row) != 0 {
            codeword ^= GENERATOR[row];
        }
        row += 1;
    }
    codeword
}

/// Multiply a received byte by the check matrix over GF(2)
///
/// Zero means the byte is a valid codeword.
#[must_use]
pub const fn apply_check(received: u8) -> u8 {
    let mut syndrome = 0;
    let mut row = 0;
    while row < CHECK.len() {
        if received & (0x80 >> row) != 0 {
            syndrome ^= CHECK[row];
        }
        row += 1;
    }
    syndrome
}

/// Correct a received byte using its syndrome
///
/// A syndrome equal to a check-matrix column flips that one bit. Any other
/// non-zero syndrome leaves the byte as received.
#[must_use]
pub const fn correct(received: u8, syndrome: u8) -> u8 {
    let mut corrected = received;
    if syndrome != 0 {
        let mut column = 0;
        while column < CHECK.len() {
            if CHECK[column] == syndrome {
                corrected ^= 0x80 >> column;
            }
            column += 1;
        }
    }
    corrected
}

const fn build_encode_table() -> [u8; 16] {
    let mut table = [0; 16];
    let mut nibble = 0;
    while nibble < 16 {
        table[nibble] = apply_generator(nibble as u8);
        nibble += 1;
    }
    table
}

const fn build_decode_table() -> [u8; 256] {
    let mut table = [0; 256];
    let mut received = 0;
    while received < 256 {
        let syndrome = apply_check(received as u8);
        let corrected = correct(received as u8, syndrome);
        table[received] = (syndrome << 4) | (corrected >> 4);
        received += 1;
    }
    table
}

/// Encode the low nibble of `nibble`
#[must_use]
pub const fn encode_nibble(nibble: u8) -> u8 {
    ENCODE_TABLE[(nibble & 0x0F) as usize]
}

/// Decode one codeword to its (best-effort) data nibble
#[must_use]
pub const fn decode_nibble(codeword: u8) -> u8 {
    DECODE_TABLE[codeword as usize] & 0x0F
}

/// Syndrome of a received codeword (zero when error-free)
#[must_use]
pub const fn syndrome(codeword: u8) -> u8 {
    DECODE_TABLE[codeword as usize] >> 4
}

/// Check if a syndrome names a single correctable bit
#[must_use]
pub const fn is_correctable(syndrome: u8) -> bool {
    if syndrome == 0 {
        return true;
    }
    let mut column = 0;
    while column < CHECK.len() {
        if CHECK[column] == syndrome {
            return true;
        }
        column += 1;
    }
    false
}

/// Encode a byte as two codewords, low nibble first
#[must_use]
pub const fn encode_byte(byte: u8) -> [u8; 2] {
    [encode_nibble(byte & 0x0F), encode_nibble(byte >> 4)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_rows_are_codewords() {
        for (row, &word) in GENERATOR.iter().enumerate() {
            assert_eq!(apply_check(word), 0, "row {row}");
            assert_eq!(encode_nibble(0x08 >> row), word);
        }
    }

    #[test]
    fn check_columns_distinct_and_nonzero() {
        for (i, &a) in CHECK.iter().enumerate() {
            assert_ne!(a, 0);
            for &b in &CHECK[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn systematic_data_in_high_nibble() {
        for nibble in 0..16u8 {
            assert_eq!(encode_nibble(nibble) >> 4, nibble);
        }
    }

    #[test]
    fn correct_leaves_uncorrectable_alone() {
        // 0x0C is not a column
        assert_eq!(correct(0x5A, 0x0C), 0x5A);
        assert!(!is_correctable(0x0C));
    }
}
