//! Practice suggestions
//!
//! Picks a fixed suggestion from an ordered rule table, first match wins.

use serde::{Deserialize, Serialize};

use crate::types::Mood;

/// Below this wpm the speed drill is suggested
const SPEED_DRILL_MAX_WPM: f64 = 30.0;

/// Above this many corrections the accuracy exercise is suggested
const ACCURACY_MIN_CORRECTIONS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    SpeedDrill,
    SlowAccuracy,
    Relax,
    Challenge,
    KeepPracticing,
}

impl Suggestion {
    pub fn text(&self) -> &'static str {
        match self {
            Suggestion::SpeedDrill => "Try a 5-second speed drill to boost your typing speed!",
            Suggestion::SlowAccuracy => "Focus on accuracy with a slow typing exercise.",
            Suggestion::Relax => "Take a deep breath and try a relaxing typing session.",
            Suggestion::Challenge => "Great job! Challenge yourself with a longer text.",
            Suggestion::KeepPracticing => "Keep practicing! Consistency is key.",
        }
    }
}

struct SuggestionRule {
    suggestion: Suggestion,
    applies: fn(f64, f64, Mood) -> bool,
}

const SUGGESTION_RULES: [SuggestionRule; 4] = [
    SuggestionRule {
        suggestion: Suggestion::SpeedDrill,
        applies: |wpm, _, _| wpm < SPEED_DRILL_MAX_WPM,
    },
    SuggestionRule {
        suggestion: Suggestion::SlowAccuracy,
        applies: |_, corrections, _| corrections > ACCURACY_MIN_CORRECTIONS,
    },
    SuggestionRule {
        suggestion: Suggestion::Relax,
        applies: |_, _, mood| mood == Mood::Stressed,
    },
    SuggestionRule {
        suggestion: Suggestion::Challenge,
        applies: |_, _, mood| mood == Mood::Confident,
    },
];

/// Choose the suggestion for a session
pub fn choose(wpm: f64, corrections: f64, mood: Mood) -> Suggestion {
    SUGGESTION_RULES
        .iter()
        .find(|rule| (rule.applies)(wpm, corrections, mood))
        .map(|rule| rule.suggestion)
        .unwrap_or(Suggestion::KeepPracticing)
}

/// Suggestion text for a session
pub fn suggest(wpm: f64, corrections: f64, mood: Mood) -> String {
    choose(wpm, corrections, mood).text().to_string()
}
