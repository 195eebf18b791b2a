use std::sync::Arc;

use serde::Serialize;

use crate::{
    ServiceResult,
    climb::{ArcClimbRepository, ClimbRecord},
    stats::aggregate,
    user::{ArcUserRepository, Username},
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StandingsEntry {
    pub username: Username,
    pub total_sends: u32,
    pub total_points: i64,
    pub avg_sent_grade: String,
}

/// Ranks users by total points, highest first. Ties break on username
/// ascending so the order is stable regardless of fetch order.
pub fn build_leaderboard(users: Vec<(Username, Vec<ClimbRecord>)>) -> Vec<StandingsEntry> {
    let mut entries: Vec<StandingsEntry> = users
        .into_iter()
        .map(|(username, climbs)| {
            let stats = aggregate(&climbs);
            StandingsEntry {
                username,
                total_sends: stats.total_sends,
                total_points: stats.total_points,
                avg_sent_grade: stats.avg_sent_grade,
            }
        })
        .collect();
    entries.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.username.cmp(&b.username))
    });
    entries
}

pub type ArcStandingsService = Arc<Box<dyn StandingsService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait StandingsService {
    async fn leaderboard(&self) -> ServiceResult<Vec<StandingsEntry>>;
}

pub struct StandingsServiceImpl {
    user_repository: ArcUserRepository,
    climb_repository: ArcClimbRepository,
}

impl StandingsServiceImpl {
    pub fn new(user_repository: ArcUserRepository, climb_repository: ArcClimbRepository) -> Self {
        Self {
            user_repository,
            climb_repository,
        }
    }
}

#[async_trait::async_trait]
impl StandingsService for StandingsServiceImpl {
    async fn leaderboard(&self) -> ServiceResult<Vec<StandingsEntry>> {
        let users = self.user_repository.get_all_users().await?;
        let mut with_climbs = Vec::with_capacity(users.len());
        for (id, user) in users {
            let climbs = self.climb_repository.get_climbs_for_user(id).await?;
            with_climbs.push((user.username, climbs));
        }
        Ok(build_leaderboard(with_climbs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climb::Climb;
    use chrono::Utc;

    fn climb_worth(points: u32, sent: bool) -> ClimbRecord {
        ClimbRecord {
            id: 1,
            climb: Climb {
                user_id: 1,
                route_id: 1,
                stars: 3,
                sent,
                tries: 1,
                notes: None,
                points,
                created_at: Utc::now(),
            },
            color: "blue".to_string(),
            grade: "5.9".to_string(),
        }
    }

    #[test]
    fn test_highest_points_first() {
        let board = build_leaderboard(vec![
            ("margo".to_string(), vec![climb_worth(300, true)]),
            ("janja".to_string(), vec![climb_worth(500, true)]),
        ]);
        assert_eq!(board[0].username, "janja");
        assert_eq!(board[0].total_points, 500);
        assert_eq!(board[1].username, "margo");
    }

    #[test]
    fn test_tie_breaks_on_username() {
        let board = build_leaderboard(vec![
            ("zoe".to_string(), vec![climb_worth(200, true)]),
            ("ai".to_string(), vec![climb_worth(200, false)]),
        ]);
        assert_eq!(board[0].username, "ai");
        assert_eq!(board[1].username, "zoe");
    }

    #[test]
    fn test_users_without_climbs_rank_last() {
        let board = build_leaderboard(vec![
            ("newcomer".to_string(), vec![]),
            ("regular".to_string(), vec![climb_worth(10, true)]),
        ]);
        assert_eq!(board[0].username, "regular");
        assert_eq!(board[1].total_points, 0);
        assert_eq!(board[1].avg_sent_grade, "N/A");
    }
}
