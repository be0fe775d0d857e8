//! PWM signal demodulation
//!
//! This module turns a raw capture into decoded payloads:
//! 1. Expand capture bytes into individual samples (MSB first)
//! 2. Run-length encode the level transitions
//! 3. Scan for frame preambles
//! 4. Reconstruct frame bits with the toggle/hold rule
//! 5. Hand the 64-bit frame to the payload decoder

pub mod bits;
mod detect;
mod runs;

pub use bits::{expand_bits, pack_bits};
pub use detect::{
    decode_at, match_preamble, preamble_template, reconstruct_bits, Decode, DecodeError, Detector,
    DurationBound, RunTemplate, ScanStats, DURATION_THRESHOLD, PREAMBLE_REPEATS, PREAMBLE_RUNS,
};
pub use runs::{transition_runs, TransitionRun};
