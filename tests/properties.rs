//! Property tests for the analyzer engine

use proptest::prelude::*;

use typesense::features::{classify_gap, inter_keystroke_gaps, GapClass};
use typesense::mood::{classify_signals, MoodSignals, MOOD_RULES};
use typesense::{
    analyze, classify_mood, compute_metrics, confidence_score, focus_score, AnalyzerConfig, Mood,
    SessionInput, SessionMetrics,
};

fn sorted_timestamps() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..5_000, 0..200).prop_map(|deltas| {
        deltas
            .iter()
            .scan(0i64, |t, d| {
                *t += d;
                Some(*t)
            })
            .collect()
    })
}

fn session() -> impl Strategy<Value = SessionInput> {
    (
        0.0f64..3600.0,
        sorted_timestamps(),
        0u32..200,
        "[a-z ]{0,200}",
    )
        .prop_map(|(duration, timestamps, corrections, text)| {
            SessionInput::from_timestamps(duration, &timestamps, corrections, text)
        })
}

fn metrics() -> impl Strategy<Value = SessionMetrics> {
    (0u32..200, 0u32..30, 0u32..60, 0u32..2000).prop_map(|(wpm, pauses, bursts, keys)| {
        SessionMetrics {
            words_per_minute: wpm,
            pause_count: pauses,
            average_pause_duration_millis: 0.0,
            burst_count: bursts,
            total_keystrokes: keys,
        }
    })
}

proptest! {
    #[test]
    fn scores_stay_in_range(
        wpm in prop::num::f64::ANY,
        corrections in prop::num::f64::ANY,
        other in prop::num::f64::ANY,
    ) {
        prop_assert!(confidence_score(wpm, corrections, other) <= 100);
        prop_assert!(focus_score(corrections, other) <= 100);
    }

    #[test]
    fn more_wpm_never_lowers_confidence(
        a in -1e6f64..1e6,
        b in -1e6f64..1e6,
        corrections in 0.0f64..100.0,
        bursts in 0.0f64..100.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            confidence_score(lo, corrections, bursts) <= confidence_score(hi, corrections, bursts)
        );
    }

    #[test]
    fn more_corrections_never_raise_scores(
        a in -1e6f64..1e6,
        b in -1e6f64..1e6,
        wpm in 0.0f64..200.0,
        other in 0.0f64..100.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(confidence_score(wpm, hi, other) <= confidence_score(wpm, lo, other));
        prop_assert!(focus_score(hi, other) <= focus_score(lo, other));
    }

    #[test]
    fn every_gap_lands_in_one_bucket(input in session()) {
        let config = AnalyzerConfig::default();
        let gaps = inter_keystroke_gaps(&input.keystrokes);
        let metrics = compute_metrics(&input, &config);
        let steady = gaps
            .iter()
            .filter(|g| classify_gap(**g, &config) == GapClass::Steady)
            .count() as u32;

        prop_assert_eq!(gaps.len(), input.keystrokes.len().saturating_sub(1));
        prop_assert_eq!(metrics.pause_count + metrics.burst_count + steady, gaps.len() as u32);
        prop_assert_eq!(metrics.total_keystrokes as usize, input.keystrokes.len());
    }

    #[test]
    fn mood_is_first_matching_rule(m in metrics(), corrections in 0u32..500) {
        let signals = MoodSignals::new(&m, corrections);
        let expected = MOOD_RULES
            .iter()
            .find(|rule| (rule.applies)(&signals))
            .map(|rule| rule.mood)
            .unwrap_or(Mood::Neutral);

        let mood = classify_mood(&m, corrections);
        prop_assert_eq!(mood, expected);
        prop_assert_eq!(mood, classify_signals(&signals));
        prop_assert!(Mood::ALL.contains(&mood));
    }

    #[test]
    fn analysis_is_idempotent(input in session()) {
        prop_assert_eq!(analyze(&input), analyze(&input));
    }
}

#[test]
fn four_words_in_a_minute_is_relaxed() {
    let input = SessionInput::from_timestamps(60.0, &[], 0, "the quick brown fox");
    let analysis = analyze(&input).unwrap();

    assert_eq!(analysis.metrics.words_per_minute, 4);
    assert_eq!(analysis.metrics.pause_count, 0);
    assert_eq!(analysis.metrics.burst_count, 0);
    assert_eq!(analysis.assessment.mood, Mood::Relaxed);
}

#[test]
fn one_pause_and_one_burst() {
    let input = SessionInput::from_timestamps(60.0, &[0, 1200, 1300], 0, "");
    let metrics = compute_metrics(&input, &AnalyzerConfig::default());

    assert_eq!(metrics.pause_count, 1);
    assert_eq!(metrics.burst_count, 1);
    assert_eq!(metrics.average_pause_duration_millis, 1200.0);
}

#[test]
fn confidence_for_fast_accurate_typing() {
    assert_eq!(confidence_score(70.0, 1.0, 0.0), 77);
}

#[test]
fn high_correction_rate_overrides_everything() {
    let metrics = SessionMetrics {
        words_per_minute: 120,
        pause_count: 40,
        average_pause_duration_millis: 2000.0,
        burst_count: 80,
        total_keystrokes: 100,
    };
    assert_eq!(classify_mood(&metrics, 20), Mood::Stressed);
}
