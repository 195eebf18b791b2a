//! Per-ascent point scoring.

use crate::grade::grade_info;

/// Points awarded for a single logged ascent.
///
/// `base × max(0.1, stars/3) × (1.0 sent | 0.5 tried) × max(0.1, 1/√tries)`,
/// rounded to the nearest integer. Every multiplier is floored at 0.1 so no
/// well-formed grade ever scores zero. Pure and total: unknown grades score
/// zero, `tries` below 1 counts as 1.
pub fn calculate_points(grade_label: &str, stars: u8, sent: bool, tries: u32) -> u32 {
    let base = grade_info(grade_label).base_points as f64;
    let star_multiplier = (stars as f64 / 3.0).max(0.1);
    let status_multiplier = if sent { 1.0 } else { 0.5 };
    let tries_multiplier = (1.0 / (tries.max(1) as f64).sqrt()).max(0.1);
    (base * star_multiplier * status_multiplier * tries_multiplier).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sent_first_try_scores_base() {
        // 5.8 base 100, all multipliers 1.0
        assert_eq!(calculate_points("5.8", 3, true, 1), 100);
    }

    #[test]
    fn test_attempt_with_tries_penalty() {
        // 5.10b base 220; 0.5 status x 0.5 tries penalty
        assert_eq!(calculate_points("5.10b", 3, false, 4), 55);
    }

    #[test]
    fn test_unknown_grade_scores_zero() {
        assert_eq!(calculate_points("V7", 5, true, 1), 0);
        assert_eq!(calculate_points("", 3, true, 1), 0);
    }

    #[test]
    fn test_attempt_halves_send_value() {
        for tries in [1, 2, 3, 9] {
            let sent = calculate_points("5.11a", 3, true, tries);
            let tried = calculate_points("5.11a", 3, false, tries);
            assert!((sent as i64 - 2 * tried as i64).abs() <= 1);
        }
    }

    #[test]
    fn test_more_tries_never_score_more() {
        let mut last = u32::MAX;
        for tries in 1..200 {
            let points = calculate_points("5.12d", 4, true, tries);
            assert!(points <= last);
            last = points;
        }
    }

    #[test]
    fn test_tries_multiplier_floor() {
        // 1/sqrt(10000) would be 0.01; the 0.1 floor keeps persistence paid
        assert_eq!(calculate_points("5.8", 3, true, 10_000), 10);
    }

    #[test]
    fn test_zero_stars_floor() {
        assert_eq!(calculate_points("5.8", 0, true, 1), 10);
    }
}
