use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::info;
use serde::Serialize;

use crate::{
    ServiceResult,
    points::calculate_points,
    route::{ArcRouteService, Route, RouteId},
    stats,
    user::{ArcUserService, UserId},
};

pub type ClimbId = i64;

/// One logged ascent. Immutable once recorded; the points are computed at
/// creation time and stored so aggregation never has to re-derive them.
#[derive(Clone, Debug)]
pub struct Climb {
    pub user_id: UserId,
    pub route_id: RouteId,
    pub stars: u8,
    pub sent: bool,
    pub tries: u32,
    pub notes: Option<String>,
    pub points: u32,
    pub created_at: DateTime<Utc>,
}

/// A climb joined with the route fields the statistics core needs.
#[derive(Clone, Debug)]
pub struct ClimbRecord {
    pub id: ClimbId,
    pub climb: Climb,
    pub color: String,
    pub grade: String,
}

#[derive(Clone, Debug)]
pub struct NewClimb {
    pub route_id: RouteId,
    pub stars: Option<u8>,
    pub sent: bool,
    pub tries: Option<u32>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoggedClimb {
    pub id: ClimbId,
    pub color: String,
    pub grade: String,
    pub stars: u8,
    pub sent: bool,
    pub tries: u32,
    pub points: u32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Climbs of one calendar date, the unit the stats views call a session.
#[derive(Clone, Debug)]
pub struct Session {
    pub date: chrono::NaiveDate,
    pub climbs: Vec<ClimbRecord>,
}

pub type ArcClimbRepository = Arc<Box<dyn ClimbRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait ClimbRepository {
    /// Persists the climb and folds its star rating into the route's
    /// running mean in a single transaction, so a crash cannot leave the
    /// route's aggregate updated without the climb row (or vice versa).
    async fn record_climb(&self, climb: &Climb) -> ServiceResult<ClimbId>;
    /// All climbs for a user, oldest first.
    async fn get_climbs_for_user(&self, user_id: UserId) -> ServiceResult<Vec<ClimbRecord>>;
}

pub type ArcClimbService = Arc<Box<dyn ClimbService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait ClimbService {
    async fn log_climb(&self, username: &str, new_climb: NewClimb) -> ServiceResult<LoggedClimb>;
    async fn get_user_climbs(&self, username: &str) -> ServiceResult<Vec<ClimbRecord>>;
    /// Climbs grouped by calendar date, most recent session first.
    async fn get_sessions(&self, username: &str) -> ServiceResult<Vec<Session>>;
}

pub struct ClimbServiceImpl {
    climb_repository: ArcClimbRepository,
    route_service: ArcRouteService,
    user_service: ArcUserService,
}

impl ClimbServiceImpl {
    pub fn new(
        climb_repository: ArcClimbRepository,
        route_service: ArcRouteService,
        user_service: ArcUserService,
    ) -> Self {
        Self {
            climb_repository,
            route_service,
            user_service,
        }
    }
}

#[async_trait::async_trait]
impl ClimbService for ClimbServiceImpl {
    async fn log_climb(&self, username: &str, new_climb: NewClimb) -> ServiceResult<LoggedClimb> {
        let (user_id, _) = self.user_service.fetch_user(username).await?;
        let route = self.route_service.get_route(new_climb.route_id).await?;

        let stars = new_climb.stars.unwrap_or(3).clamp(1, 5);
        let tries = new_climb.tries.unwrap_or(1).max(1);
        let points = calculate_points(&route.grade, stars, new_climb.sent, tries);

        let climb = Climb {
            user_id,
            route_id: new_climb.route_id,
            stars,
            sent: new_climb.sent,
            tries,
            notes: new_climb.notes,
            points,
            created_at: Utc::now(),
        };
        let id = self.climb_repository.record_climb(&climb).await?;

        info!(
            "User {} logged {} on {} {} for {} points",
            username,
            if climb.sent { "a send" } else { "an attempt" },
            route.color,
            route.grade,
            points
        );
        Ok(LoggedClimb {
            id,
            color: route.color,
            grade: route.grade,
            stars,
            sent: climb.sent,
            tries,
            points,
            notes: climb.notes,
            created_at: climb.created_at,
        })
    }

    async fn get_user_climbs(&self, username: &str) -> ServiceResult<Vec<ClimbRecord>> {
        let (user_id, _) = self.user_service.fetch_user(username).await?;
        self.climb_repository.get_climbs_for_user(user_id).await
    }

    async fn get_sessions(&self, username: &str) -> ServiceResult<Vec<Session>> {
        let climbs = self.get_user_climbs(username).await?;
        let grouped = stats::group_by_session(&climbs);
        Ok(grouped
            .into_iter()
            .rev()
            .map(|(date, climbs)| Session {
                date,
                climbs: climbs.into_iter().cloned().collect(),
            })
            .collect())
    }
}

#[derive(Default)]
pub struct MockClimbRepository {
    pub climbs: DashMap<ClimbId, (Climb, String, String)>,
    pub route_stars: DashMap<RouteId, (f64, u32)>,
    next_id: std::sync::atomic::AtomicI64,
}

impl MockClimbRepository {
    pub fn insert_record(&self, record: &ClimbRecord) {
        self.climbs.insert(
            record.id,
            (record.climb.clone(), record.color.clone(), record.grade.clone()),
        );
    }
}

#[async_trait::async_trait]
impl ClimbRepository for MockClimbRepository {
    async fn record_climb(&self, climb: &Climb) -> ServiceResult<ClimbId> {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1;
        self.climbs
            .insert(id, (climb.clone(), String::new(), String::new()));
        let mut entry = self
            .route_stars
            .entry(climb.route_id)
            .or_insert((0.0, 0));
        *entry = Route::next_stars(entry.0, entry.1, climb.stars);
        Ok(id)
    }

    async fn get_climbs_for_user(&self, user_id: UserId) -> ServiceResult<Vec<ClimbRecord>> {
        let mut records: Vec<ClimbRecord> = self
            .climbs
            .iter()
            .filter(|entry| entry.value().0.user_id == user_id)
            .map(|entry| {
                let (climb, color, grade) = entry.value().clone();
                ClimbRecord {
                    id: *entry.key(),
                    climb,
                    color,
                    grade,
                }
            })
            .collect();
        records.sort_by_key(|r| (r.climb.created_at, r.id));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gym::{ArcGymRepository, MockGymRepository},
        route::{ArcRouteRepository, MockRouteRepository, RouteRepository, RouteServiceImpl},
        user::{ArcUserRepository, ArcUserService, MockUserRepository, UserServiceImpl},
    };

    async fn service_with_route(grade: &str) -> (ClimbServiceImpl, Arc<MockClimbRepository>, RouteId)
    {
        let user_repo = MockUserRepository::default();
        user_repo.add_user("beth");
        let user_repo: ArcUserRepository = Arc::new(Box::new(user_repo));
        let gym_repo: ArcGymRepository = Arc::new(Box::new(MockGymRepository::default()));
        let user_service: ArcUserService = Arc::new(Box::new(UserServiceImpl::new(
            user_repo,
            gym_repo,
        )));

        let route_repo = MockRouteRepository::default();
        let route_id = route_repo
            .create_route(&Route {
                gym_id: 1,
                color: "blue".into(),
                grade: grade.into(),
                avg_stars: 0.0,
                stars_count: 0,
                active: true,
            })
            .await
            .unwrap();
        let route_repo: ArcRouteRepository = Arc::new(Box::new(route_repo));
        let route_service: crate::route::ArcRouteService = Arc::new(Box::new(
            RouteServiceImpl::new(route_repo, user_service.clone()),
        ));

        let climb_repo = Arc::new(MockClimbRepository::default());
        let climb_repo_arc: ArcClimbRepository =
            Arc::new(Box::new(SharedClimbRepository(climb_repo.clone())));
        (
            ClimbServiceImpl::new(climb_repo_arc, route_service, user_service),
            climb_repo,
            route_id,
        )
    }

    struct SharedClimbRepository(Arc<MockClimbRepository>);

    #[async_trait::async_trait]
    impl ClimbRepository for SharedClimbRepository {
        async fn record_climb(&self, climb: &Climb) -> ServiceResult<ClimbId> {
            self.0.record_climb(climb).await
        }
        async fn get_climbs_for_user(&self, user_id: UserId) -> ServiceResult<Vec<ClimbRecord>> {
            self.0.get_climbs_for_user(user_id).await
        }
    }

    #[tokio::test]
    async fn test_log_climb_computes_points() {
        let (service, _, route_id) = service_with_route("5.8").await;
        let logged = service
            .log_climb(
                "beth",
                NewClimb {
                    route_id,
                    stars: Some(3),
                    sent: true,
                    tries: Some(1),
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(logged.points, 100);
        assert_eq!(logged.grade, "5.8");
    }

    #[tokio::test]
    async fn test_log_climb_clamps_inputs() {
        let (service, repo, route_id) = service_with_route("5.8").await;
        let logged = service
            .log_climb(
                "beth",
                NewClimb {
                    route_id,
                    stars: Some(9),
                    sent: true,
                    tries: Some(0),
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(logged.stars, 5);
        assert_eq!(logged.tries, 1);
        assert_eq!(repo.route_stars.get(&route_id).unwrap().1, 1);
    }

    #[tokio::test]
    async fn test_log_climb_updates_route_stars() {
        let (service, repo, route_id) = service_with_route("5.10a").await;
        for stars in [4, 2] {
            service
                .log_climb(
                    "beth",
                    NewClimb {
                        route_id,
                        stars: Some(stars),
                        sent: false,
                        tries: None,
                        notes: None,
                    },
                )
                .await
                .unwrap();
        }
        let (avg, count) = *repo.route_stars.get(&route_id).unwrap();
        assert_eq!(count, 2);
        assert!((avg - 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_log_climb_unknown_route() {
        let (service, _, _) = service_with_route("5.8").await;
        let result = service
            .log_climb(
                "beth",
                NewClimb {
                    route_id: 999,
                    stars: None,
                    sent: true,
                    tries: None,
                    notes: None,
                },
            )
            .await;
        assert!(matches!(result, Err(crate::ServiceError::NotFound(..))));
    }
}
