//! Yosemite Decimal System grade model.
//!
//! Grade labels follow the pattern `5.<n>[a-d]?` with `0 <= n <= 15`. Every
//! label resolves to a base point value and a difficulty rank; labels outside
//! the pattern resolve to zero so scoring degrades instead of failing.

/// Base points per digit tier, `5.0` through `5.15`. Values grow
/// non-linearly: a `5.15` is worth far more than ten `5.5`s.
const TIER_BASE_POINTS: [u32; 16] = [
    50, 55, 60, 65, 70, 75, 80, 90, 100, 150, 200, 400, 800, 1500, 3000, 7500,
];

/// Multiplier applied for the a/b/c/d letter suffix within a digit tier.
const LETTER_MULTIPLIERS: [f64; 4] = [1.0, 1.1, 1.2, 1.3];

pub const NO_GRADE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeInfo {
    pub base_points: u32,
    /// Total order over valid labels; 0 marks an unknown grade.
    pub difficulty_rank: u32,
}

impl GradeInfo {
    pub const UNKNOWN: GradeInfo = GradeInfo {
        base_points: 0,
        difficulty_rank: 0,
    };
}

/// Splits a label into its digit tier and optional letter index (a=0..d=3).
pub fn parse_grade(label: &str) -> Option<(u8, Option<u8>)> {
    let rest = label.strip_prefix("5.")?;
    let digit_len = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digit_len == 0 {
        return None;
    }
    let tier: u8 = rest[..digit_len].parse().ok().filter(|&n| n <= 15)?;
    let letter = match &rest[digit_len..] {
        "" => None,
        "a" => Some(0),
        "b" => Some(1),
        "c" => Some(2),
        "d" => Some(3),
        _ => return None,
    };
    Some((tier, letter))
}

/// Resolves a label to its base points and difficulty rank. Total function:
/// malformed labels come back as [`GradeInfo::UNKNOWN`].
pub fn grade_info(label: &str) -> GradeInfo {
    let Some((tier, letter)) = parse_grade(label) else {
        return GradeInfo::UNKNOWN;
    };
    let letter_index = letter.unwrap_or(0) as usize;
    let base = TIER_BASE_POINTS[tier as usize] as f64 * LETTER_MULTIPLIERS[letter_index];
    GradeInfo {
        base_points: base.round() as u32,
        difficulty_rank: 4 * tier as u32 + letter_index as u32 + 1,
    }
}

/// Numeric component of a label, used when averaging sent grades.
pub fn grade_digit(label: &str) -> Option<u8> {
    parse_grade(label).map(|(tier, _)| tier)
}

/// Renders a mean of grade digits back into a label. The fractional
/// remainder picks the letter tier: <0.25 a, <0.5 b, <0.75 c, else d.
pub fn render_avg_grade(mean: f64) -> String {
    if !mean.is_finite() || mean < 0.0 {
        return NO_GRADE.to_string();
    }
    let tier = (mean.floor() as u32).min(15);
    let letter = match mean - mean.floor() {
        f if f < 0.25 => 'a',
        f if f < 0.5 => 'b',
        f if f < 0.75 => 'c',
        _ => 'd',
    };
    format!("5.{}{}", tier, letter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(tier: u8, letter: Option<usize>) -> String {
        match letter {
            Some(i) => format!("5.{}{}", tier, ['a', 'b', 'c', 'd'][i]),
            None => format!("5.{}", tier),
        }
    }

    #[test]
    fn test_base_points_monotone_in_tier() {
        let mut last = 0;
        for tier in 0..=15 {
            let info = grade_info(&label(tier, None));
            assert!(info.base_points >= last, "tier {} decreased", tier);
            last = info.base_points;
        }
    }

    #[test]
    fn test_base_points_monotone_in_letter() {
        for tier in 0..=15 {
            let mut last = 0;
            for letter in 0..4 {
                let info = grade_info(&label(tier, Some(letter)));
                assert!(
                    info.base_points >= last,
                    "5.{} letter {} decreased",
                    tier,
                    letter
                );
                last = info.base_points;
            }
        }
    }

    #[test]
    fn test_difficulty_rank_total_order() {
        let mut last = 0;
        for tier in 0..=15 {
            for letter in 0..4 {
                let info = grade_info(&label(tier, Some(letter)));
                assert!(info.difficulty_rank > last);
                last = info.difficulty_rank;
            }
        }
    }

    #[test]
    fn test_pinned_values() {
        assert_eq!(grade_info("5.8").base_points, 100);
        assert_eq!(grade_info("5.10a").base_points, 200);
        assert_eq!(grade_info("5.10b").base_points, 220);
        assert_eq!(grade_info("5.0").base_points, 50);
        assert_eq!(grade_info("5.15").base_points, 7500);
    }

    #[test]
    fn test_letterless_matches_letter_a() {
        for tier in 0..=15 {
            assert_eq!(
                grade_info(&label(tier, None)).base_points,
                grade_info(&label(tier, Some(0))).base_points
            );
        }
    }

    #[test]
    fn test_malformed_labels_resolve_to_zero() {
        for bad in ["", "5.", "5.16", "5.x", "6.10", "5.10e", "V5", "5.10ab", "5.-1"] {
            assert_eq!(grade_info(bad), GradeInfo::UNKNOWN, "label {:?}", bad);
        }
    }

    #[test]
    fn test_render_avg_grade() {
        assert_eq!(render_avg_grade(10.0), "5.10a");
        assert_eq!(render_avg_grade(10.3), "5.10b");
        assert_eq!(render_avg_grade(10.5), "5.10c");
        assert_eq!(render_avg_grade(10.8), "5.10d");
        assert_eq!(render_avg_grade(9.9), "5.9d");
        assert_eq!(render_avg_grade(f64::NAN), NO_GRADE);
    }
}
