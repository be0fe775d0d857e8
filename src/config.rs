//! Configuration loaded from environment variables

use crate::signal::DURATION_THRESHOLD;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Duration threshold in samples separating short and long runs
    pub pulse_threshold: u64,

    /// Also verify the column-parity bits the firmware checks
    pub strict_column_parity: bool,

    /// Emit one JSON object per decode instead of plain text
    pub json_report: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            pulse_threshold: std::env::var("PWM_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DURATION_THRESHOLD),

            strict_column_parity: std::env::var("PWM_STRICT_PARITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),

            json_report: std::env::var("PWM_JSON")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }
}
