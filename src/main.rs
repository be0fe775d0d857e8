//! PWM Decode - nibble-parity tag decoder for raw serial captures
//!
//! Reads a complete capture dump, expands it into samples, run-length
//! encodes the level transitions, scans for frame preambles, and prints
//! every payload that survives reconstruction and parity checking.

mod capture;
mod config;
mod frame;
mod signal;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::Config;
use signal::{expand_bits, transition_runs, Decode, Detector};

/// One decode, as emitted on the JSON report
#[derive(Debug, Serialize)]
struct DecodeRecord {
    value: u64,
    hex: String,
    version: u8,
    tag_id: u32,
    run_index: usize,
}

impl From<&Decode> for DecodeRecord {
    fn from(decode: &Decode) -> Self {
        Self {
            value: decode.value,
            hex: decode.to_hex(),
            version: decode.version(),
            tag_id: decode.tag_id(),
            run_index: decode.run_index,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .init();

    let config = Config::from_env();
    let path: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("Usage: pwm-decode <capture.dump>")?;

    info!("===========================================");
    info!("   PWM Decode - capture frame scanner");
    info!("===========================================");
    info!("Configuration:");
    info!("  Capture dump: {}", path.display());
    info!("  Pulse threshold: {} samples", config.pulse_threshold);
    info!("  Strict column parity: {}", config.strict_column_parity);

    let raw = capture::load_dump(&path)?;
    let bits = expand_bits(&raw);
    let runs = transition_runs(&bits);
    info!(
        "Capture: {} bytes, {} samples, {} transitions",
        raw.len(),
        bits.len(),
        runs.len()
    );

    let mut detector = Detector::new(config.pulse_threshold, config.strict_column_parity);
    let decodes = detector.scan(&runs);

    for decode in &decodes {
        if config.json_report {
            println!("{}", serde_json::to_string(&DecodeRecord::from(decode))?);
        } else {
            println!("{} 0x{}", decode.value, decode.to_hex());
        }
        info!(
            "Frame at run {}: version={:#04x} tag={}",
            decode.run_index,
            decode.version(),
            decode.tag_id()
        );
    }

    let stats = &detector.stats;
    info!(
        "Scan complete: {} runs, {} preambles, {} frames decoded, {} parity failures, {} framing failures, {} collisions, {} truncated",
        stats.runs_scanned,
        stats.preambles_matched,
        stats.frames_decoded,
        stats.parity_failures,
        stats.framing_failures,
        stats.collisions,
        stats.truncated
    );

    if decodes.is_empty() {
        warn!("No frames decoded from this capture");
    }

    Ok(())
}
