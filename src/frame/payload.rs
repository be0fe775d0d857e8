//! Nibble-parity payload decoding

use thiserror::Error;

/// Total logical bits per frame
pub const FRAME_BITS: usize = 64;
/// Leading all-ones marker bits, not part of the payload
pub const HEADER_BITS: usize = 9;
/// Bits per nibble group: 4 data bits + 1 even-parity bit
pub const NIBBLE_BITS: usize = 5;
/// Nibble groups per frame
pub const NIBBLE_COUNT: usize = 10;
/// Payload width: 4 data bits from each nibble group
pub const PAYLOAD_BITS: usize = 4 * NIBBLE_COUNT;

/// Body bits after the header
const BODY_BITS: usize = FRAME_BITS - HEADER_BITS;
/// Offset of the column-parity bits within the body
const COLUMN_PARITY_OFFSET: usize = NIBBLE_COUNT * NIBBLE_BITS;

/// Payload decode failures
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("expected a {FRAME_BITS}-bit frame, got {0} bits")]
    Length(usize),
    #[error("even parity violated in nibble {nibble}")]
    Parity { nibble: usize },
    #[error("column parity violated in column {column}")]
    ColumnParity { column: usize },
    #[error("nonzero framing bit at end of frame")]
    Framing,
}

/// Decode the 40-bit payload from a 64-bit logical frame.
///
/// Drops the 9 header bits, checks even parity over each 5-bit group, and
/// requires the final body bit (the framing bit) to be 0. Within a group,
/// bit 0 is the most significant data bit. Column parity is NOT checked
/// here; see [`check_column_parity`].
pub fn decode_payload(bits: &[u8]) -> Result<u64, FrameError> {
    if bits.len() != FRAME_BITS {
        return Err(FrameError::Length(bits.len()));
    }
    let body = &bits[HEADER_BITS..];

    let mut value = 0u64;
    for nibble in 0..NIBBLE_COUNT {
        let group = &body[nibble * NIBBLE_BITS..(nibble + 1) * NIBBLE_BITS];
        if group.iter().fold(0u8, |acc, &b| acc ^ b) != 0 {
            return Err(FrameError::Parity { nibble });
        }
        let data = (group[0] << 3) | (group[1] << 2) | (group[2] << 1) | group[3];
        value = (value << 4) | data as u64;
    }

    if body[BODY_BITS - 1] != 0 {
        return Err(FrameError::Framing);
    }

    Ok(value)
}

/// Check the four column-parity bits (body bits 50..53) against the data
/// columns of the 10 nibble rows.
///
/// The transmitting firmware sets these, but the baseline decode ignores
/// them; this runs only in strict mode.
pub fn check_column_parity(bits: &[u8]) -> Result<(), FrameError> {
    if bits.len() != FRAME_BITS {
        return Err(FrameError::Length(bits.len()));
    }
    let body = &bits[HEADER_BITS..];

    for column in 0..4 {
        let mut acc = body[COLUMN_PARITY_OFFSET + column];
        for row in 0..NIBBLE_COUNT {
            acc ^= body[row * NIBBLE_BITS + column];
        }
        if acc != 0 {
            return Err(FrameError::ColumnParity { column });
        }
    }
    Ok(())
}

/// Build the 64-bit logical frame for a 40-bit payload: header ones, 10 rows
/// with computed row parity, column parity, and a zero stop bit.
///
/// The exact inverse of [`decode_payload`] (and it satisfies
/// [`check_column_parity`]). Bits above the payload width are ignored.
pub fn payload_bits(value: u64) -> [u8; FRAME_BITS] {
    let mut bits = [0u8; FRAME_BITS];
    for bit in bits.iter_mut().take(HEADER_BITS) {
        *bit = 1;
    }

    let mut column = [0u8; 4];
    for row in 0..NIBBLE_COUNT {
        let data = ((value >> (4 * (NIBBLE_COUNT - 1 - row))) & 0xF) as u8;
        let base = HEADER_BITS + row * NIBBLE_BITS;
        let mut parity = 0u8;
        for i in 0..4 {
            let bit = (data >> (3 - i)) & 1;
            bits[base + i] = bit;
            parity ^= bit;
            column[i] ^= bit;
        }
        bits[base + 4] = parity;
    }

    for (i, &parity) in column.iter().enumerate() {
        bits[HEADER_BITS + COLUMN_PARITY_OFFSET + i] = parity;
    }
    // stop bit stays 0
    bits
}
