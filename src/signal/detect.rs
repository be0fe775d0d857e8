//! Preamble detection and frame reconstruction
//!
//! Frame preamble, in transition runs:
//! one long low period ending in a rising edge (the sync pulse), then
//! 8 short high-low-high pairs. 17 runs total.
//!
//! Data encoding after the preamble is differential: a run longer than the
//! threshold flips the current bit, a short run repeats it (and consumes the
//! short run that follows).

use super::runs::TransitionRun;
use crate::frame::{
    self, decode_payload, FrameError, FRAME_BITS, HEADER_BITS, PAYLOAD_BITS,
};
use thiserror::Error;
use tracing::{debug, trace};

/// Duration threshold, in samples, separating short runs from long runs.
/// The sync pulse must be at least this long, preamble pairs at most this
/// long, and a data run strictly longer than this is a toggle.
pub const DURATION_THRESHOLD: u64 = 30;

/// High-low-high pair repetitions in the preamble
pub const PREAMBLE_REPEATS: usize = 8;
/// Runs in a complete preamble: sync plus the pairs
pub const PREAMBLE_RUNS: usize = 1 + 2 * PREAMBLE_REPEATS;

/// Runs shown in the post-match trace window
const TRACE_WINDOW: usize = 10;

/// Duration constraint for one preamble template entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationBound {
    AtLeast(u64),
    AtMost(u64),
}

/// One entry of the preamble recognition template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTemplate {
    pub level: u8,
    pub bound: DurationBound,
}

impl RunTemplate {
    pub fn matches(&self, run: &TransitionRun) -> bool {
        if run.level != self.level {
            return false;
        }
        match self.bound {
            DurationBound::AtLeast(min) => run.duration >= min,
            DurationBound::AtMost(max) => run.duration <= max,
        }
    }
}

/// The 17-run preamble template: a sync run of level 1 with duration at
/// least `threshold`, then 8 repetitions of a level-0 then a level-1 run,
/// each at most `threshold` long.
pub fn preamble_template(threshold: u64) -> [RunTemplate; PREAMBLE_RUNS] {
    let mut template = [RunTemplate {
        level: 1,
        bound: DurationBound::AtLeast(threshold),
    }; PREAMBLE_RUNS];
    for pair in 0..PREAMBLE_REPEATS {
        template[1 + 2 * pair] = RunTemplate {
            level: 0,
            bound: DurationBound::AtMost(threshold),
        };
        template[2 + 2 * pair] = RunTemplate {
            level: 1,
            bound: DurationBound::AtMost(threshold),
        };
    }
    template
}

/// Decode failures for a single scan offset. All of these are local: the
/// scan simply moves on to the next offset.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no preamble at this offset")]
    NoPreambleMatch,
    #[error("data region collided with the next sync pulse")]
    PreambleCollision,
    #[error("run sequence ended mid-frame")]
    TruncatedCapture,
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Match the preamble template at `start`.
///
/// Returns the index of the first run after the 17 matched runs, or `None`.
/// Cheap to call at every offset; a false sync pulse fails without side
/// effects.
pub fn match_preamble(
    runs: &[TransitionRun],
    start: usize,
    threshold: u64,
) -> Option<usize> {
    if start + PREAMBLE_RUNS > runs.len() {
        return None;
    }
    let template = preamble_template(threshold);
    for (i, entry) in template.iter().enumerate() {
        if !entry.matches(&runs[start + i]) {
            return None;
        }
    }
    Some(start + PREAMBLE_RUNS)
}

/// Reconstruct the 64-bit logical frame from runs starting right after a
/// matched preamble.
///
/// Seeds the 9 all-ones header bits with the current bit at 1, then applies
/// the toggle/hold rule: a long run flips the current bit, a short run
/// repeats it and must be followed by another short run. A long run in that
/// second position means we have run into the next frame's sync pulse, so
/// the whole attempt is dropped.
pub fn reconstruct_bits(
    runs: &[TransitionRun],
    start: usize,
    threshold: u64,
) -> Result<Vec<u8>, DecodeError> {
    let mut bits = vec![1u8; HEADER_BITS];
    let mut current = 1u8;
    let mut i = start;

    while bits.len() < FRAME_BITS {
        let run = runs.get(i).ok_or(DecodeError::TruncatedCapture)?;
        i += 1;
        if run.duration > threshold {
            current ^= 1;
            bits.push(current);
        } else {
            bits.push(current);
            let next = runs.get(i).ok_or(DecodeError::TruncatedCapture)?;
            if next.duration > threshold {
                return Err(DecodeError::PreambleCollision);
            }
            i += 1;
        }
    }

    Ok(bits)
}

/// A successfully decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decode {
    /// The 40-bit payload
    pub value: u64,
    /// Run index where the preamble matched
    pub run_index: usize,
}

impl Decode {
    /// Version byte: the top 8 bits of the payload
    pub fn version(&self) -> u8 {
        (self.value >> (PAYLOAD_BITS - 8)) as u8
    }

    /// Tag id: the low 32 bits of the payload
    pub fn tag_id(&self) -> u32 {
        self.value as u32
    }

    /// Lowercase hex form of the payload
    pub fn to_hex(&self) -> String {
        format!("{:x}", self.value)
    }
}

/// Attempt the full match -> reconstruct -> decode chain at one offset.
pub fn decode_at(
    runs: &[TransitionRun],
    index: usize,
    threshold: u64,
    strict_column_parity: bool,
) -> Result<Decode, DecodeError> {
    let data_start =
        match_preamble(runs, index, threshold).ok_or(DecodeError::NoPreambleMatch)?;

    let window_end = (data_start + TRACE_WINDOW).min(runs.len());
    trace!(
        "Preamble matched at run {}: data window {:?}",
        index,
        &runs[data_start..window_end]
    );

    let bits = reconstruct_bits(runs, data_start, threshold)?;

    if strict_column_parity {
        if let Err(e) = frame::check_column_parity(&bits) {
            debug!(
                "Frame at run {} rejected: {} (frame={})",
                index,
                e,
                hex::encode(super::bits::pack_bits(&bits))
            );
            return Err(e.into());
        }
    }

    match decode_payload(&bits) {
        Ok(value) => Ok(Decode {
            value,
            run_index: index,
        }),
        Err(e) => {
            debug!(
                "Frame at run {} rejected: {} (frame={})",
                index,
                e,
                hex::encode(super::bits::pack_bits(&bits))
            );
            Err(e.into())
        }
    }
}

/// Scan counters, reported at end of run
#[derive(Debug, Default)]
pub struct ScanStats {
    pub runs_scanned: u64,
    pub preambles_matched: u64,
    pub frames_decoded: u64,
    pub parity_failures: u64,
    pub framing_failures: u64,
    pub collisions: u64,
    pub truncated: u64,
}

/// Scans a transition-run sequence for frames and decodes every one it can.
pub struct Detector {
    threshold: u64,
    strict_column_parity: bool,
    pub stats: ScanStats,
}

impl Detector {
    pub fn new(threshold: u64, strict_column_parity: bool) -> Self {
        Self {
            threshold,
            strict_column_parity,
            stats: ScanStats::default(),
        }
    }

    /// Attempt a decode at every run index and collect the successes in scan
    /// order. Matches are tried at every offset regardless of earlier
    /// outcomes, so overlapping or back-to-back frames are each found from
    /// their own preamble.
    pub fn scan(&mut self, runs: &[TransitionRun]) -> Vec<Decode> {
        let mut decodes = Vec::new();

        for i in 0..runs.len() {
            match decode_at(runs, i, self.threshold, self.strict_column_parity) {
                Ok(decode) => {
                    self.stats.preambles_matched += 1;
                    self.stats.frames_decoded += 1;
                    trace!(
                        "Decoded frame at run {}: {} 0x{}",
                        i,
                        decode.value,
                        decode.to_hex()
                    );
                    decodes.push(decode);
                }
                Err(DecodeError::NoPreambleMatch) => {}
                Err(e) => {
                    self.stats.preambles_matched += 1;
                    match e {
                        DecodeError::PreambleCollision => self.stats.collisions += 1,
                        DecodeError::TruncatedCapture => self.stats.truncated += 1,
                        DecodeError::Frame(FrameError::Framing) => {
                            self.stats.framing_failures += 1
                        }
                        DecodeError::Frame(_) => self.stats.parity_failures += 1,
                        DecodeError::NoPreambleMatch => unreachable!(),
                    }
                }
            }
        }

        self.stats.runs_scanned += runs.len() as u64;
        decodes
    }
}
