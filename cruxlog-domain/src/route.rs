use std::sync::Arc;

use dashmap::DashMap;

use crate::{
    ServiceError, ServiceResult,
    grade::grade_info,
    gym::GymId,
    user::ArcUserService,
};

pub type RouteId = i64;

/// A climbing line on a gym wall. The star rating is a running mean over
/// every ascent logged against the route; routes are never deleted while
/// climbs reference them, only deactivated.
#[derive(Clone, Debug)]
pub struct Route {
    pub gym_id: GymId,
    pub color: String,
    pub grade: String,
    pub avg_stars: f64,
    pub stars_count: u32,
    pub active: bool,
}

impl Route {
    pub fn difficulty_rank(&self) -> u32 {
        grade_info(&self.grade).difficulty_rank
    }

    /// Folds one more star rating into a running mean.
    pub fn next_stars(avg_stars: f64, stars_count: u32, stars: u8) -> (f64, u32) {
        let count = stars_count + 1;
        let avg = avg_stars + (stars as f64 - avg_stars) / count as f64;
        (avg, count)
    }
}

pub type ArcRouteRepository = Arc<Box<dyn RouteRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait RouteRepository {
    async fn get_route(&self, id: RouteId) -> ServiceResult<Option<Route>>;
    /// Active routes for a gym, ordered easiest to hardest.
    async fn get_routes_for_gym(&self, gym_id: GymId) -> ServiceResult<Vec<(RouteId, Route)>>;
    async fn create_route(&self, route: &Route) -> ServiceResult<RouteId>;
}

pub type ArcRouteService = Arc<Box<dyn RouteService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait RouteService {
    /// Routes on the wall at the user's home gym; empty when no gym is set.
    async fn routes_for_user(&self, username: &str) -> ServiceResult<Vec<(RouteId, Route)>>;
    async fn get_route(&self, id: RouteId) -> ServiceResult<Route>;
}

pub struct RouteServiceImpl {
    route_repository: ArcRouteRepository,
    user_service: ArcUserService,
}

impl RouteServiceImpl {
    pub fn new(route_repository: ArcRouteRepository, user_service: ArcUserService) -> Self {
        Self {
            route_repository,
            user_service,
        }
    }
}

#[async_trait::async_trait]
impl RouteService for RouteServiceImpl {
    async fn routes_for_user(&self, username: &str) -> ServiceResult<Vec<(RouteId, Route)>> {
        let (_, user) = self.user_service.fetch_user(username).await?;
        let Some(gym_id) = user.gym_id else {
            return Ok(Vec::new());
        };
        self.route_repository.get_routes_for_gym(gym_id).await
    }

    async fn get_route(&self, id: RouteId) -> ServiceResult<Route> {
        match self.route_repository.get_route(id).await? {
            Some(route) => Ok(route),
            None => ServiceError::not_found("Route not found"),
        }
    }
}

#[derive(Default)]
pub struct MockRouteRepository {
    pub routes: DashMap<RouteId, Route>,
    next_id: std::sync::atomic::AtomicI64,
}

#[async_trait::async_trait]
impl RouteRepository for MockRouteRepository {
    async fn get_route(&self, id: RouteId) -> ServiceResult<Option<Route>> {
        Ok(self.routes.get(&id).map(|entry| entry.value().clone()))
    }

    async fn get_routes_for_gym(&self, gym_id: GymId) -> ServiceResult<Vec<(RouteId, Route)>> {
        let mut routes: Vec<(RouteId, Route)> = self
            .routes
            .iter()
            .filter(|entry| entry.value().gym_id == gym_id && entry.value().active)
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        routes.sort_by_key(|(id, route)| (route.difficulty_rank(), *id));
        Ok(routes)
    }

    async fn create_route(&self, route: &Route) -> ServiceResult<RouteId> {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1;
        self.routes.insert(id, route.clone());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_stars_running_mean() {
        let (avg, count) = Route::next_stars(0.0, 0, 4);
        assert_eq!((avg, count), (4.0, 1));
        let (avg, count) = Route::next_stars(avg, count, 2);
        assert_eq!((avg, count), (3.0, 2));
        let (avg, count) = Route::next_stars(avg, count, 3);
        assert_eq!((avg, count), (3.0, 3));
    }
}
