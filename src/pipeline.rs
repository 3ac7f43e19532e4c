//! Analysis pipeline orchestration
//!
//! This module provides the public API for session analysis. It runs the full
//! pipeline from a submitted session to metrics plus assessment:
//!
//! Session JSON → Adapter → Metrics → Mood → Scores → Suggestion → Encoder
//!
//! Every stage is pure. The analyzer holds only its immutable configuration, so one
//! instance can be shared across threads.

use tracing::{debug, trace, warn};

use crate::adapter::parse_session;
use crate::config::AnalyzerConfig;
use crate::encoder::AnalysisEncoder;
use crate::error::{ComputeError, ValidationError};
use crate::features::MetricsExtractor;
use crate::mood::classify_mood;
use crate::scoring::{confidence_score, focus_score};
use crate::suggestion::suggest;
use crate::types::{SessionAnalysis, SessionAssessment, SessionInput, SessionMetrics};

/// Analyze a session with the default thresholds (stateless, one-shot).
pub fn analyze(input: &SessionInput) -> Result<SessionAnalysis, ValidationError> {
    SessionAnalyzer::new().analyze(input)
}

/// Convert session JSON to analysis JSON with the default thresholds.
///
/// # Example
/// ```ignore
/// let result_json = analyze_json(session_json)?;
/// ```
pub fn analyze_json(session_json: String) -> Result<String, ComputeError> {
    SessionAnalyzer::new().analyze_json(&session_json)
}

/// Build the assessment for already-computed metrics
pub fn assess(metrics: &SessionMetrics, correction_count: u32) -> SessionAssessment {
    let mood = classify_mood(metrics, correction_count);
    let wpm = metrics.words_per_minute as f64;
    let corrections = correction_count as f64;

    SessionAssessment {
        mood,
        confidence_score: confidence_score(wpm, corrections, metrics.burst_count as f64),
        focus_score: focus_score(corrections, metrics.pause_count as f64),
        suggestion: suggest(wpm, corrections, mood),
    }
}

/// Session analyzer bound to a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct SessionAnalyzer {
    extractor: MetricsExtractor,
}

impl SessionAnalyzer {
    /// Create an analyzer with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with custom thresholds
    pub fn with_config(config: AnalyzerConfig) -> Result<Self, ComputeError> {
        config.validate()?;
        Ok(Self {
            extractor: MetricsExtractor::new(config),
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        self.extractor.config()
    }

    /// Analyze a typed session
    ///
    /// Fails only when the session is malformed; degenerate sessions (no
    /// keystrokes, zero duration) analyze normally.
    pub fn analyze(&self, input: &SessionInput) -> Result<SessionAnalysis, ValidationError> {
        if let Err(e) = input.validate() {
            warn!(field = %e.field(), error = %e, "rejecting session");
            return Err(e);
        }

        // Stage 1: Derive metrics
        let metrics = self.extractor.extract(input);
        debug!(
            words_per_minute = metrics.words_per_minute,
            pause_count = metrics.pause_count,
            burst_count = metrics.burst_count,
            total_keystrokes = metrics.total_keystrokes,
            "derived session metrics"
        );

        // Stage 2: Classify and score
        let assessment = assess(&metrics, input.correction_count);
        debug!(
            mood = %assessment.mood,
            confidence_score = assessment.confidence_score,
            focus_score = assessment.focus_score,
            "assessed session"
        );

        Ok(SessionAnalysis {
            metrics,
            assessment,
        })
    }

    /// Parse, validate and analyze session JSON
    pub fn analyze_payload(&self, session_json: &str) -> Result<SessionAnalysis, ComputeError> {
        trace!(bytes = session_json.len(), "parsing session payload");
        let input = parse_session(session_json)?.into_input()?;
        Ok(self.analyze(&input)?)
    }

    /// Parse, validate and analyze session JSON, returning the encoded result
    pub fn analyze_json(&self, session_json: &str) -> Result<String, ComputeError> {
        let analysis = self.analyze_payload(session_json)?;
        AnalysisEncoder::encode_to_json(&analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mood;
    use pretty_assertions::assert_eq;

    fn sample_session_json() -> &'static str {
        r#"{
            "durationSeconds": 60,
            "keystrokes": [
                {"timestampMillis": 0},
                {"timestampMillis": 1200},
                {"timestampMillis": 1300}
            ],
            "correctionCount": 0,
            "rawText": "the quick brown fox"
        }"#
    }

    #[test]
    fn test_analyze_json_stateless() {
        let result = analyze_json(sample_session_json().to_string());
        assert!(result.is_ok());

        let payload: serde_json::Value = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(payload["wordsPerMinute"], 4);
        assert_eq!(payload["pauseCount"], 1);
        assert_eq!(payload["burstCount"], 1);
        assert_eq!(payload["mood"], "Relaxed");
        assert_eq!(payload["moodEmoji"], "😌");
        assert_eq!(
            payload["suggestion"],
            "Try a 5-second speed drill to boost your typing speed!"
        );
    }

    #[test]
    fn test_empty_session_takes_default_path() {
        let input = SessionInput::from_timestamps(60.0, &[], 0, "the quick brown fox");
        let analysis = analyze(&input).unwrap();

        assert_eq!(analysis.metrics.words_per_minute, 4);
        assert_eq!(analysis.metrics.pause_count, 0);
        assert_eq!(analysis.metrics.burst_count, 0);
        assert_eq!(analysis.assessment.mood, Mood::Relaxed);
        // 50 + 2 - 0 + 0
        assert_eq!(analysis.assessment.confidence_score, 52);
        assert_eq!(analysis.assessment.focus_score, 100);
    }

    #[test]
    fn test_zero_duration_session() {
        let input = SessionInput::from_timestamps(0.0, &[], 0, "");
        let analysis = analyze(&input).unwrap();

        assert_eq!(analysis.metrics.words_per_minute, 0);
        assert_eq!(analysis.assessment.mood, Mood::Relaxed);
    }

    #[test]
    fn test_high_correction_rate_session_is_stressed() {
        let timestamps: Vec<i64> = (0..100).map(|i| i * 200).collect();
        let text = vec!["word"; 80].join(" ");
        let input = SessionInput::from_timestamps(60.0, &timestamps, 20, text);

        let analysis = analyze(&input).unwrap();
        assert_eq!(analysis.assessment.mood, Mood::Stressed);
        // 80 wpm, but 20 corrections drive the accuracy suggestion
        assert_eq!(
            analysis.assessment.suggestion,
            "Focus on accuracy with a slow typing exercise."
        );
        assert_eq!(analysis.assessment.focus_score, 0);
    }

    #[test]
    fn test_fast_bursty_session_is_focused() {
        // 30 keystrokes 100ms apart: 29 bursts
        let timestamps: Vec<i64> = (0..30).map(|i| i * 100).collect();
        let text = vec!["word"; 55].join(" ");
        let input = SessionInput::from_timestamps(60.0, &timestamps, 4, text);

        let analysis = analyze(&input).unwrap();
        assert_eq!(analysis.metrics.burst_count, 29);
        assert_eq!(analysis.assessment.mood, Mood::Focused);
        assert_eq!(
            analysis.assessment.suggestion,
            "Keep practicing! Consistency is key."
        );
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let analyzer = SessionAnalyzer::new();
        let first = analyzer.analyze_json(sample_session_json()).unwrap();
        let second = analyzer.analyze_json(sample_session_json()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_config_changes_gap_classification() {
        let analyzer = SessionAnalyzer::with_config(AnalyzerConfig {
            pause_threshold_ms: 2000,
            burst_threshold_ms: 150,
        })
        .unwrap();

        let analysis = analyzer.analyze_payload(sample_session_json()).unwrap();
        assert_eq!(analysis.metrics.pause_count, 0);
        assert_eq!(analysis.metrics.burst_count, 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = SessionAnalyzer::with_config(AnalyzerConfig {
            pause_threshold_ms: 100,
            burst_threshold_ms: 500,
        });
        assert!(matches!(result, Err(ComputeError::ConfigError(_))));
    }

    #[test]
    fn test_malformed_session_rejected() {
        let input = SessionInput::from_timestamps(60.0, &[100, 50], 0, "");
        let err = analyze(&input).unwrap_err();
        assert_eq!(err.field(), "keystrokes[1].timestampMillis");
    }

    #[test]
    fn test_invalid_json() {
        let result = analyze_json("not valid json".to_string());
        assert!(result.is_err());
    }
}
