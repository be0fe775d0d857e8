//! Frame payload decoding
//!
//! A frame is 64 logical bits: a 9-bit all-ones header, 10 rows of
//! 4 data bits + row parity, 4 column-parity bits, and a stop bit of 0.
//! The 40 data bits concatenate into the tag payload.

mod payload;

pub use payload::{
    check_column_parity, decode_payload, payload_bits, FrameError, FRAME_BITS, HEADER_BITS,
    NIBBLE_BITS, NIBBLE_COUNT, PAYLOAD_BITS,
};
