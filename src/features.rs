//! Session metric derivation
//!
//! Computes typing speed and the pause/burst structure of a session from its raw
//! keystroke timestamps. Derivation never fails: degenerate sessions produce
//! zero-valued metrics.

use crate::config::AnalyzerConfig;
use crate::types::{KeystrokeEvent, SessionInput, SessionMetrics};

/// Classification of a single inter-keystroke gap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapClass {
    /// Hesitation: gap above the pause threshold
    Pause,
    /// Rapid consecutive input: gap below the burst threshold
    Burst,
    /// Normal typing rhythm
    Steady,
}

/// Classify one gap (milliseconds). Exactly one class applies to every gap.
pub fn classify_gap(gap_ms: i64, config: &AnalyzerConfig) -> GapClass {
    let gap = i128::from(gap_ms);
    if gap > i128::from(config.pause_threshold_ms) {
        GapClass::Pause
    } else if gap < i128::from(config.burst_threshold_ms) {
        GapClass::Burst
    } else {
        GapClass::Steady
    }
}

/// Gaps between adjacent keystrokes, in milliseconds
pub fn inter_keystroke_gaps(keystrokes: &[KeystrokeEvent]) -> Vec<i64> {
    keystrokes
        .windows(2)
        .map(|pair| {
            pair[1]
                .timestamp_millis
                .saturating_sub(pair[0].timestamp_millis)
        })
        .collect()
}

/// Count whitespace-separated words
pub fn count_words(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Compute words per minute
///
/// A non-positive duration is treated as one minute. The result is rounded half up.
pub fn words_per_minute(words: u32, duration_seconds: f64) -> u32 {
    let minutes = if duration_seconds > 0.0 {
        duration_seconds / 60.0
    } else {
        1.0
    };
    if minutes <= 0.0 {
        return 0;
    }
    // Validated sessions stay below u32::MAX; `as` saturates otherwise
    (words as f64 / minutes).round() as u32
}

/// Derive metrics from a session using the given thresholds
pub fn compute_metrics(input: &SessionInput, config: &AnalyzerConfig) -> SessionMetrics {
    let words = count_words(&input.raw_text);
    let words_per_minute = words_per_minute(words, input.duration_seconds);

    let mut pause_count = 0u32;
    let mut pause_total_ms = 0f64;
    let mut burst_count = 0u32;

    for gap in inter_keystroke_gaps(&input.keystrokes) {
        match classify_gap(gap, config) {
            GapClass::Pause => {
                pause_count += 1;
                pause_total_ms += gap as f64;
            }
            GapClass::Burst => burst_count += 1,
            GapClass::Steady => {}
        }
    }

    let average_pause_duration_millis = if pause_count > 0 {
        pause_total_ms / pause_count as f64
    } else {
        0.0
    };

    SessionMetrics {
        words_per_minute,
        pause_count,
        average_pause_duration_millis,
        burst_count,
        total_keystrokes: input.keystrokes.len() as u32,
    }
}

/// Metric extractor bound to a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct MetricsExtractor {
    config: AnalyzerConfig,
}

impl MetricsExtractor {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn extract(&self, input: &SessionInput) -> SessionMetrics {
        compute_metrics(input, &self.config)
    }
}
