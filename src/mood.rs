//! Mood classification
//!
//! Maps session metrics to a single [`Mood`] using an ordered rule table. The first
//! matching rule wins and [`DEFAULT_MOOD`] applies when none match. Categories
//! overlap, so changing the order of [`MOOD_RULES`] changes results.

use crate::types::{Mood, SessionMetrics};

/// Correction rate above which a session is Stressed
pub const STRESSED_CORRECTION_RATE: f64 = 0.15;

/// Pause count above which a session is Thoughtful
pub const THOUGHTFUL_MIN_PAUSES: u32 = 10;

/// Confident: wpm above this with fewer than `CONFIDENT_MAX_CORRECTIONS` corrections
pub const CONFIDENT_MIN_WPM: u32 = 60;
pub const CONFIDENT_MAX_CORRECTIONS: u32 = 3;

/// Focused: wpm above this and more than `FOCUSED_MIN_BURSTS` bursts
pub const FOCUSED_MIN_WPM: u32 = 50;
pub const FOCUSED_MIN_BURSTS: u32 = 20;

/// Relaxed: wpm below this
pub const RELAXED_MAX_WPM: u32 = 30;

/// Fallback label when no rule matches
pub const DEFAULT_MOOD: Mood = Mood::Neutral;

/// Inputs the mood rules look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodSignals {
    pub words_per_minute: u32,
    pub pause_count: u32,
    pub burst_count: u32,
    pub correction_count: u32,
    /// corrections / keystrokes, 0 when there are no keystrokes
    pub correction_rate: f64,
}

impl MoodSignals {
    pub fn new(metrics: &SessionMetrics, correction_count: u32) -> Self {
        Self {
            words_per_minute: metrics.words_per_minute,
            pause_count: metrics.pause_count,
            burst_count: metrics.burst_count,
            correction_count,
            correction_rate: correction_rate(correction_count, metrics.total_keystrokes),
        }
    }
}

/// A labelled predicate in the mood table
pub struct MoodRule {
    pub mood: Mood,
    pub applies: fn(&MoodSignals) -> bool,
}

/// Classification rules in priority order
pub const MOOD_RULES: [MoodRule; 5] = [
    MoodRule {
        mood: Mood::Stressed,
        applies: |s| s.correction_rate > STRESSED_CORRECTION_RATE,
    },
    MoodRule {
        mood: Mood::Thoughtful,
        applies: |s| s.pause_count > THOUGHTFUL_MIN_PAUSES,
    },
    MoodRule {
        mood: Mood::Confident,
        applies: |s| {
            s.words_per_minute > CONFIDENT_MIN_WPM
                && s.correction_count < CONFIDENT_MAX_CORRECTIONS
        },
    },
    MoodRule {
        mood: Mood::Focused,
        applies: |s| s.words_per_minute > FOCUSED_MIN_WPM && s.burst_count > FOCUSED_MIN_BURSTS,
    },
    MoodRule {
        mood: Mood::Relaxed,
        applies: |s| s.words_per_minute < RELAXED_MAX_WPM,
    },
];

/// Corrections per keystroke
pub fn correction_rate(correction_count: u32, total_keystrokes: u32) -> f64 {
    if total_keystrokes == 0 {
        return 0.0;
    }
    correction_count as f64 / total_keystrokes as f64
}

/// Classify a session. Total over its domain: always returns exactly one label.
pub fn classify_mood(metrics: &SessionMetrics, correction_count: u32) -> Mood {
    classify_signals(&MoodSignals::new(metrics, correction_count))
}

pub fn classify_signals(signals: &MoodSignals) -> Mood {
    MOOD_RULES
        .iter()
        .find(|rule| (rule.applies)(signals))
        .map(|rule| rule.mood)
        .unwrap_or(DEFAULT_MOOD)
}
