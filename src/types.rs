//! Session data types
//!
//! This module defines the records that flow through the analyzer: the submitted
//! session, the derived metrics, and the final assessment.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::features::count_words;

/// A single character-level input action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeystrokeEvent {
    /// Client timestamp in milliseconds
    pub timestamp_millis: i64,
}

impl KeystrokeEvent {
    pub fn new(timestamp_millis: i64) -> Self {
        Self { timestamp_millis }
    }
}

/// A finished typing session as submitted by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    /// Wall-clock length of the session in seconds
    pub duration_seconds: f64,
    /// Keystrokes in the order they were received
    pub keystrokes: Vec<KeystrokeEvent>,
    /// Corrective actions (backspace, delete) reported by the client
    pub correction_count: u32,
    /// Text produced during the session, only used for the word count
    pub raw_text: String,
}

impl SessionInput {
    /// Build a session from keystroke timestamps
    pub fn from_timestamps(
        duration_seconds: f64,
        timestamps: &[i64],
        correction_count: u32,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            duration_seconds,
            keystrokes: timestamps.iter().copied().map(KeystrokeEvent::new).collect(),
            correction_count,
            raw_text: raw_text.into(),
        }
    }

    /// Check the invariants the typed fields cannot express on their own.
    ///
    /// Duration must be finite, non-negative and long enough that words per
    /// minute fits in a `u32`. Timestamps must never go backwards; equal adjacent
    /// timestamps are allowed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.duration_seconds.is_finite() {
            return Err(ValidationError::InvalidField {
                field: "durationSeconds".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }
        if self.duration_seconds < 0.0 {
            return Err(ValidationError::InvalidField {
                field: "durationSeconds".to_string(),
                reason: format!("must be non-negative, got {}", self.duration_seconds),
            });
        }
        if self.duration_seconds > 0.0 {
            let words = count_words(&self.raw_text);
            let wpm = words as f64 / (self.duration_seconds / 60.0);
            if wpm.round() > u32::MAX as f64 {
                return Err(ValidationError::InvalidField {
                    field: "durationSeconds".to_string(),
                    reason: format!(
                        "{}s is too short for {words} words, words per minute overflows",
                        self.duration_seconds
                    ),
                });
            }
        }

        for (offset, pair) in self.keystrokes.windows(2).enumerate() {
            if pair[1].timestamp_millis < pair[0].timestamp_millis {
                return Err(ValidationError::NonChronological {
                    index: offset + 1,
                    previous: pair[0].timestamp_millis,
                    current: pair[1].timestamp_millis,
                });
            }
        }

        Ok(())
    }
}

/// Signals derived from a single session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetrics {
    /// Words per minute, rounded to the nearest integer
    pub words_per_minute: u32,
    /// Number of gaps above the pause threshold
    pub pause_count: u32,
    /// Mean duration of the pause gaps (0 when there are none)
    pub average_pause_duration_millis: f64,
    /// Number of gaps below the burst threshold
    pub burst_count: u32,
    /// Number of keystrokes in the session
    pub total_keystrokes: u32,
}

/// Discrete behavioral label assigned to a completed session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Stressed,
    Thoughtful,
    Confident,
    Focused,
    Relaxed,
    Neutral,
}

impl Mood {
    /// Every label, in classification order
    pub const ALL: [Mood; 6] = [
        Mood::Stressed,
        Mood::Thoughtful,
        Mood::Confident,
        Mood::Focused,
        Mood::Relaxed,
        Mood::Neutral,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Stressed => "Stressed",
            Mood::Thoughtful => "Thoughtful",
            Mood::Confident => "Confident",
            Mood::Focused => "Focused",
            Mood::Relaxed => "Relaxed",
            Mood::Neutral => "Neutral",
        }
    }

    /// Display tag shown next to the label. Not part of the classification.
    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Stressed => "😰",
            Mood::Thoughtful => "🤔",
            Mood::Confident => "😎",
            Mood::Focused => "🎯",
            Mood::Relaxed => "😌",
            Mood::Neutral => "😊",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mood, scores and suggestion for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAssessment {
    pub mood: Mood,
    /// Confidence score (0-100)
    pub confidence_score: u8,
    /// Focus score (0-100)
    pub focus_score: u8,
    pub suggestion: String,
}

/// Full result of analyzing one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalysis {
    pub metrics: SessionMetrics,
    pub assessment: SessionAssessment,
}
