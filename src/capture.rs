//! Dump-file loading
//!
//! The capture tool records raw serial bytes straight to disk. The firmware
//! announces itself with an ASCII start marker before the sampled data
//! begins, and may emit a failure marker when its own decode gave up; both
//! are stripped or reported here so the decoder only ever sees samples.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Transmitter banner; everything up to and including it is not sample data
const START_MARKER: &[u8] = b"Starting\r\n";
/// Emitted by the firmware when its decode failed mid-capture
const FAILURE_MARKER: &[u8] = b"Failed";

/// Load a capture dump, stripping the start marker when present and warning
/// if the firmware reported a failure during the capture.
pub fn load_dump(path: &Path) -> Result<Vec<u8>> {
    let raw = std::fs::read(path)
        .with_context(|| format!("Failed to read capture dump {}", path.display()))?;
    info!("Read {} bytes from {}", raw.len(), path.display());

    if find_subsequence(&raw, FAILURE_MARKER).is_some() {
        warn!("Capture contains a firmware failure marker; decode results may be incomplete");
    }

    Ok(strip_start_marker(raw))
}

/// Drop everything up to and including the first start marker. A dump that
/// was already stripped by the capture tool passes through untouched.
pub fn strip_start_marker(mut data: Vec<u8>) -> Vec<u8> {
    if let Some(pos) = find_subsequence(&data, START_MARKER) {
        data.drain(..pos + START_MARKER.len());
    }
    data
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_marker_at_start() {
        let mut data = b"Starting\r\n".to_vec();
        data.extend_from_slice(&[0xAA, 0xBB]);
        assert_eq!(strip_start_marker(data), vec![0xAA, 0xBB]);
    }

    #[test]
    fn test_strip_marker_after_noise() {
        let mut data = vec![0x00, 0xFF];
        data.extend_from_slice(b"Starting\r\n");
        data.extend_from_slice(&[0x01, 0x02, 0x03]);
        assert_eq!(strip_start_marker(data), vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_no_marker_passes_through() {
        let data = vec![0x01, 0x02, 0x03];
        assert_eq!(strip_start_marker(data.clone()), data);
    }

    #[test]
    fn test_find_subsequence() {
        assert_eq!(find_subsequence(b"abcFailedxyz", b"Failed"), Some(3));
        assert_eq!(find_subsequence(b"clean capture", b"Failed"), None);
    }
}
