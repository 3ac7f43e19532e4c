//! Confidence and focus scores
//!
//! Both scores are saturating linear combinations of session counters, rounded and
//! clamped to 0-100. They accept any real input and never panic.

/// Starting confidence before adjustments
const CONFIDENCE_BASE: f64 = 50.0;
/// Maximum bonus from typing speed
const CONFIDENCE_MAX_SPEED_BONUS: f64 = 30.0;
/// Maximum bonus from burst typing
const CONFIDENCE_MAX_BURST_BONUS: f64 = 20.0;
const CONFIDENCE_CORRECTION_PENALTY: f64 = 3.0;

/// Starting focus before penalties
const FOCUS_BASE: f64 = 100.0;
const FOCUS_CORRECTION_PENALTY: f64 = 5.0;
const FOCUS_PAUSE_PENALTY: f64 = 2.0;

pub const SCORE_MIN: u8 = 0;
pub const SCORE_MAX: u8 = 100;

/// Compute the confidence score
///
/// Formula: `50 + min(wpm/2, 30) - corrections*3 + min(bursts/2, 20)`
pub fn confidence_score(wpm: f64, corrections: f64, bursts: f64) -> u8 {
    let score = CONFIDENCE_BASE + (wpm / 2.0).min(CONFIDENCE_MAX_SPEED_BONUS)
        - corrections * CONFIDENCE_CORRECTION_PENALTY
        + (bursts / 2.0).min(CONFIDENCE_MAX_BURST_BONUS);
    to_score(score)
}

/// Compute the focus score
///
/// Formula: `100 - corrections*5 - pauses*2`
pub fn focus_score(corrections: f64, pauses: f64) -> u8 {
    let score = FOCUS_BASE - corrections * FOCUS_CORRECTION_PENALTY - pauses * FOCUS_PAUSE_PENALTY;
    to_score(score)
}

/// Round half up and clamp into the score range. NaN maps to the lower bound.
fn to_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return SCORE_MIN;
    }
    raw.round().clamp(SCORE_MIN as f64, SCORE_MAX as f64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_example() {
        // 50 + min(35, 30) - 3 + 0
        assert_eq!(confidence_score(70.0, 1.0, 0.0), 77);
    }

    #[test]
    fn test_confidence_bonuses_saturate() {
        assert_eq!(confidence_score(1000.0, 0.0, 1000.0), 100);
        assert_eq!(confidence_score(60.0, 0.0, 40.0), 100);
        assert_eq!(confidence_score(58.0, 0.0, 0.0), 79);
    }

    #[test]
    fn test_confidence_clamps_low() {
        assert_eq!(confidence_score(0.0, 50.0, 0.0), 0);
        assert_eq!(confidence_score(-500.0, 0.0, 0.0), 0);
    }

    #[test]
    fn test_confidence_rounds_half_up() {
        // 50 + 0.5 = 50.5
        assert_eq!(confidence_score(1.0, 0.0, 0.0), 51);
        // 50 + 1.5 + 0.5 = 52
        assert_eq!(confidence_score(3.0, 0.0, 1.0), 52);
    }

    #[test]
    fn test_focus_penalties() {
        assert_eq!(focus_score(0.0, 0.0), 100);
        assert_eq!(focus_score(2.0, 5.0), 80);
        assert_eq!(focus_score(10.0, 30.0), 0);
    }

    #[test]
    fn test_focus_clamps_high_for_negative_inputs() {
        assert_eq!(focus_score(-10.0, 0.0), 100);
    }

    #[test]
    fn test_non_finite_inputs_saturate() {
        assert_eq!(confidence_score(f64::INFINITY, 0.0, 0.0), 80);
        assert_eq!(confidence_score(0.0, f64::INFINITY, 0.0), 0);
        assert_eq!(focus_score(f64::NEG_INFINITY, 0.0), 100);
        assert_eq!(focus_score(f64::NAN, 0.0), 0);
        assert_eq!(confidence_score(0.0, f64::NEG_INFINITY, f64::NEG_INFINITY), 0);
    }
}
