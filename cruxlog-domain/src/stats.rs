//! Statistics over a user's ascent history.
//!
//! Everything here is a pure fold over a created-time-ordered slice of
//! [`ClimbRecord`]s; the web layer fetches the records once and derives both
//! the summary card and the chart series from the same pass. An empty
//! history yields zeros and placeholders, never an error.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    ServiceResult,
    climb::{ArcClimbRepository, ClimbRecord},
    grade::{NO_GRADE, grade_digit, grade_info, render_avg_grade},
    user::ArcUserService,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClimbStats {
    pub total_ascents: u32,
    pub total_sends: u32,
    /// Rounded percent of ascents that were sends, over the whole history.
    pub success_rate: u32,
    pub total_points: i64,
    pub avg_sent_grade: String,
    pub climbs_per_session: u32,
    /// Mean of each session's own send ratio. Deliberately not the
    /// aggregate rate: a two-climb evening counts as much as a twenty-climb
    /// one.
    pub success_rate_per_session: u32,
}

/// Groups climbs by the calendar date of their stored timestamp. No
/// timezone conversion; the date component is taken verbatim.
pub fn group_by_session(climbs: &[ClimbRecord]) -> BTreeMap<NaiveDate, Vec<&ClimbRecord>> {
    let mut sessions: BTreeMap<NaiveDate, Vec<&ClimbRecord>> = BTreeMap::new();
    for record in climbs {
        sessions
            .entry(record.climb.created_at.date_naive())
            .or_default()
            .push(record);
    }
    sessions
}

pub fn aggregate(climbs: &[ClimbRecord]) -> ClimbStats {
    let total_ascents = climbs.len() as u32;
    let total_sends = climbs.iter().filter(|r| r.climb.sent).count() as u32;
    let success_rate = if total_ascents == 0 {
        0
    } else {
        (total_sends as f64 / total_ascents as f64 * 100.0).round() as u32
    };
    let total_points: i64 = climbs.iter().map(|r| r.climb.points as i64).sum();

    let sent_digits: Vec<f64> = climbs
        .iter()
        .filter(|r| r.climb.sent)
        .filter_map(|r| grade_digit(&r.grade))
        .map(f64::from)
        .collect();
    let avg_sent_grade = if sent_digits.is_empty() {
        NO_GRADE.to_string()
    } else {
        render_avg_grade(sent_digits.iter().sum::<f64>() / sent_digits.len() as f64)
    };

    let sessions = group_by_session(climbs);
    let climbs_per_session = if sessions.is_empty() {
        0
    } else {
        (total_ascents as f64 / sessions.len() as f64).round() as u32
    };
    let session_rates: Vec<f64> = sessions
        .values()
        .map(|session| {
            let sends = session.iter().filter(|r| r.climb.sent).count();
            sends as f64 / session.len() as f64 * 100.0
        })
        .collect();
    let success_rate_per_session = if session_rates.is_empty() {
        0
    } else {
        (session_rates.iter().sum::<f64>() / session_rates.len() as f64).round() as u32
    };

    ClimbStats {
        total_ascents,
        total_sends,
        success_rate,
        total_points,
        avg_sent_grade,
        climbs_per_session,
        success_rate_per_session,
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CountSeries {
    pub labels: Vec<String>,
    pub data: Vec<u32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RateSeries {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SendsByDate {
    pub labels: Vec<String>,
    pub sends: Vec<u32>,
    pub attempts: Vec<u32>,
}

/// Chart-ready series for the stats page.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub ascents_by_grade: CountSeries,
    pub sends_by_date: SendsByDate,
    pub success_rate_over_time: RateSeries,
    pub send_rate_by_color: RateSeries,
}

pub fn chart_data(climbs: &[ClimbRecord]) -> ChartData {
    // Histogram of sent ascents, easiest grade first.
    let mut by_grade: BTreeMap<(u32, String), u32> = BTreeMap::new();
    for record in climbs.iter().filter(|r| r.climb.sent) {
        let rank = grade_info(&record.grade).difficulty_rank;
        *by_grade.entry((rank, record.grade.clone())).or_default() += 1;
    }
    let ascents_by_grade = CountSeries {
        labels: by_grade.keys().map(|(_, label)| label.clone()).collect(),
        data: by_grade.values().copied().collect(),
    };

    // Per-date send counts and try totals; attempts are the tries that did
    // not convert into sends on that date.
    let mut by_date: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();
    for record in climbs {
        let entry = by_date
            .entry(record.climb.created_at.date_naive())
            .or_default();
        if record.climb.sent {
            entry.0 += 1;
        }
        entry.1 += record.climb.tries;
    }
    let sends_by_date = SendsByDate {
        labels: by_date.keys().map(|d| d.to_string()).collect(),
        sends: by_date.values().map(|(sends, _)| *sends).collect(),
        attempts: by_date
            .values()
            .map(|(sends, tries)| tries.saturating_sub(*sends))
            .collect(),
    };
    let success_rate_over_time = RateSeries {
        labels: by_date.keys().map(|d| d.to_string()).collect(),
        data: by_date
            .values()
            .map(|(sends, tries)| {
                if *tries == 0 {
                    0.0
                } else {
                    *sends as f64 / *tries as f64 * 100.0
                }
            })
            .collect(),
    };

    let mut by_color: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    for record in climbs {
        let entry = by_color.entry(record.color.clone()).or_default();
        if record.climb.sent {
            entry.0 += 1;
        }
        entry.1 += 1;
    }
    let send_rate_by_color = RateSeries {
        labels: by_color.keys().cloned().collect(),
        data: by_color
            .values()
            .map(|(sends, total)| *sends as f64 / *total as f64 * 100.0)
            .collect(),
    };

    ChartData {
        ascents_by_grade,
        sends_by_date,
        success_rate_over_time,
        send_rate_by_color,
    }
}

pub type ArcStatsService = Arc<Box<dyn StatsService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait StatsService {
    async fn user_stats(&self, username: &str) -> ServiceResult<ClimbStats>;
    async fn user_chart_data(&self, username: &str) -> ServiceResult<ChartData>;
}

pub struct StatsServiceImpl {
    climb_repository: ArcClimbRepository,
    user_service: ArcUserService,
}

impl StatsServiceImpl {
    pub fn new(climb_repository: ArcClimbRepository, user_service: ArcUserService) -> Self {
        Self {
            climb_repository,
            user_service,
        }
    }
}

#[async_trait::async_trait]
impl StatsService for StatsServiceImpl {
    async fn user_stats(&self, username: &str) -> ServiceResult<ClimbStats> {
        let (user_id, _) = self.user_service.fetch_user(username).await?;
        let climbs = self.climb_repository.get_climbs_for_user(user_id).await?;
        Ok(aggregate(&climbs))
    }

    async fn user_chart_data(&self, username: &str) -> ServiceResult<ChartData> {
        let (user_id, _) = self.user_service.fetch_user(username).await?;
        let climbs = self.climb_repository.get_climbs_for_user(user_id).await?;
        Ok(chart_data(&climbs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climb::Climb;
    use chrono::{TimeZone, Utc};

    fn record(
        id: i64,
        date: (i32, u32, u32),
        sent: bool,
        tries: u32,
        points: u32,
        grade: &str,
        color: &str,
    ) -> ClimbRecord {
        ClimbRecord {
            id,
            climb: Climb {
                user_id: 1,
                route_id: id,
                stars: 3,
                sent,
                tries,
                notes: None,
                points,
                created_at: Utc
                    .with_ymd_and_hms(date.0, date.1, date.2, 18, 30, 0)
                    .unwrap(),
            },
            color: color.to_string(),
            grade: grade.to_string(),
        }
    }

    #[test]
    fn test_empty_history() {
        let stats = aggregate(&[]);
        assert_eq!(
            stats,
            ClimbStats {
                total_ascents: 0,
                total_sends: 0,
                success_rate: 0,
                total_points: 0,
                avg_sent_grade: NO_GRADE.to_string(),
                climbs_per_session: 0,
                success_rate_per_session: 0,
            }
        );
    }

    #[test]
    fn test_totals_reproduce_inputs() {
        let climbs = vec![
            record(1, (2025, 3, 1), true, 1, 100, "5.8", "blue"),
            record(2, (2025, 3, 1), false, 4, 55, "5.10b", "red"),
            record(3, (2025, 3, 8), true, 2, 156, "5.10a", "red"),
        ];
        let stats = aggregate(&climbs);
        assert_eq!(stats.total_ascents, 3);
        assert_eq!(stats.total_sends, 2);
        assert_eq!(stats.total_points, 311);
        assert_eq!(stats.success_rate, 67);
    }

    #[test]
    fn test_single_session_success_rate() {
        // Three ascents on one date, two sent: 66.7% rounds to 67.
        let climbs = vec![
            record(1, (2025, 3, 1), true, 1, 100, "5.8", "blue"),
            record(2, (2025, 3, 1), true, 1, 100, "5.8", "blue"),
            record(3, (2025, 3, 1), false, 1, 50, "5.8", "blue"),
        ];
        let stats = aggregate(&climbs);
        assert_eq!(stats.success_rate_per_session, 67);
        assert_eq!(stats.climbs_per_session, 3);
    }

    #[test]
    fn test_sessions_weighted_equally() {
        // Session A: 1 of 3 sent (33.3%). Session B: 1 of 1 sent (100%).
        // Mean of session rates is 67; the aggregate rate would be 50.
        let climbs = vec![
            record(1, (2025, 3, 1), true, 1, 100, "5.8", "blue"),
            record(2, (2025, 3, 1), false, 1, 50, "5.8", "blue"),
            record(3, (2025, 3, 1), false, 1, 50, "5.8", "blue"),
            record(4, (2025, 3, 8), true, 1, 100, "5.8", "blue"),
        ];
        let stats = aggregate(&climbs);
        assert_eq!(stats.success_rate_per_session, 67);
        assert_eq!(stats.success_rate, 50);
        assert_eq!(stats.climbs_per_session, 2);
    }

    #[test]
    fn test_avg_sent_grade_ignores_attempts_and_junk() {
        let climbs = vec![
            record(1, (2025, 3, 1), true, 1, 100, "5.10a", "blue"),
            record(2, (2025, 3, 1), true, 1, 100, "5.11c", "red"),
            record(3, (2025, 3, 1), false, 1, 50, "5.15d", "black"),
            record(4, (2025, 3, 1), true, 1, 0, "??", "blue"),
        ];
        // Mean of 10 and 11 is 10.5 -> letter c.
        assert_eq!(aggregate(&climbs).avg_sent_grade, "5.10c");
    }

    #[test]
    fn test_avg_sent_grade_placeholder_without_sends() {
        let climbs = vec![record(1, (2025, 3, 1), false, 3, 30, "5.9", "blue")];
        assert_eq!(aggregate(&climbs).avg_sent_grade, NO_GRADE);
    }

    #[test]
    fn test_chart_data_series() {
        let climbs = vec![
            record(1, (2025, 3, 1), true, 1, 100, "5.8", "blue"),
            record(2, (2025, 3, 1), false, 3, 40, "5.10b", "red"),
            record(3, (2025, 3, 8), true, 2, 140, "5.10b", "red"),
        ];
        let charts = chart_data(&climbs);

        assert_eq!(charts.ascents_by_grade.labels, vec!["5.8", "5.10b"]);
        assert_eq!(charts.ascents_by_grade.data, vec![1, 1]);

        assert_eq!(
            charts.sends_by_date.labels,
            vec!["2025-03-01", "2025-03-08"]
        );
        assert_eq!(charts.sends_by_date.sends, vec![1, 1]);
        assert_eq!(charts.sends_by_date.attempts, vec![3, 1]);

        assert_eq!(charts.success_rate_over_time.data, vec![25.0, 50.0]);

        assert_eq!(charts.send_rate_by_color.labels, vec!["blue", "red"]);
        assert_eq!(charts.send_rate_by_color.data, vec![100.0, 50.0]);
    }

    #[test]
    fn test_group_by_session_uses_stored_date() {
        let climbs = vec![
            record(1, (2025, 3, 1), true, 1, 100, "5.8", "blue"),
            record(2, (2025, 3, 8), true, 1, 100, "5.8", "blue"),
            record(3, (2025, 3, 1), false, 1, 50, "5.8", "blue"),
        ];
        let sessions = group_by_session(&climbs);
        assert_eq!(sessions.len(), 2);
        assert_eq!(
            sessions[&NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()].len(),
            2
        );
    }
}
