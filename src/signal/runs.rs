//! Run-length encoding of level transitions
//!
//! The decoder never works on raw samples directly; everything downstream
//! (preamble matching, bit reconstruction) sees only the transitions and the
//! sample counts between them.

/// A level transition: the line level after the transition and the number of
/// samples since the previous transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRun {
    /// Line level after the transition (0 or 1)
    pub level: u8,
    /// Samples elapsed since the previous transition. Wide enough that a
    /// constant stretch spanning gigabytes of capture cannot wrap.
    pub duration: u64,
}

/// Run-length encode a sample sequence into its transitions.
///
/// A transition at sample index `i` (where `bits[i] != bits[i + 1]`) emits a
/// run with level `bits[i + 1]` and duration `i - last_transition`, with the
/// implicit previous transition starting at index 0. Single linear pass;
/// fewer than two samples yields no runs.
pub fn transition_runs(bits: &[u8]) -> Vec<TransitionRun> {
    let mut runs = Vec::new();
    let mut last_change = 0usize;
    for i in 0..bits.len().saturating_sub(1) {
        if bits[i] != bits[i + 1] {
            runs.push(TransitionRun {
                level: bits[i + 1],
                duration: (i - last_change) as u64,
            });
            last_change = i;
        }
    }
    runs
}
