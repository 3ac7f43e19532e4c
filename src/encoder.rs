//! Analysis encoder
//!
//! Flattens a [`SessionAnalysis`] into the wire payload returned to callers. The
//! payload carries no clock or random values, so identical sessions encode to
//! identical bytes.

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;
use crate::types::{Mood, SessionAnalysis};
use crate::{ANALYZER_VERSION, PRODUCER_NAME};

/// Wire-level analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub producer: String,
    pub analyzer_version: String,
    pub words_per_minute: u32,
    pub mood: Mood,
    pub mood_emoji: String,
    pub confidence_score: u8,
    pub focus_score: u8,
    pub suggestion: String,
    pub pause_count: u32,
    pub average_pause_duration_millis: f64,
    pub burst_count: u32,
    pub total_keystrokes: u32,
}

/// Encoder for analysis payloads
pub struct AnalysisEncoder;

impl AnalysisEncoder {
    pub fn encode(analysis: &SessionAnalysis) -> AnalysisPayload {
        let metrics = &analysis.metrics;
        let assessment = &analysis.assessment;

        AnalysisPayload {
            producer: PRODUCER_NAME.to_string(),
            analyzer_version: ANALYZER_VERSION.to_string(),
            words_per_minute: metrics.words_per_minute,
            mood: assessment.mood,
            mood_emoji: assessment.mood.emoji().to_string(),
            confidence_score: assessment.confidence_score,
            focus_score: assessment.focus_score,
            suggestion: assessment.suggestion.clone(),
            pause_count: metrics.pause_count,
            average_pause_duration_millis: metrics.average_pause_duration_millis,
            burst_count: metrics.burst_count,
            total_keystrokes: metrics.total_keystrokes,
        }
    }

    /// Encode to a compact JSON string
    pub fn encode_to_json(analysis: &SessionAnalysis) -> Result<String, ComputeError> {
        serde_json::to_string(&Self::encode(analysis)).map_err(ComputeError::JsonError)
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json_pretty(analysis: &SessionAnalysis) -> Result<String, ComputeError> {
        serde_json::to_string_pretty(&Self::encode(analysis)).map_err(ComputeError::JsonError)
    }
}
