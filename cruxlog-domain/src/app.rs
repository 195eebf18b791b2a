use std::sync::Arc;

use crate::{
    climb::{ArcClimbRepository, ArcClimbService, ClimbServiceImpl},
    feedback::{ArcFeedbackRepository, ArcFeedbackService, FeedbackServiceImpl},
    gym::ArcGymRepository,
    route::{ArcRouteRepository, ArcRouteService, RouteServiceImpl},
    standings::{ArcStandingsService, StandingsServiceImpl},
    stats::{ArcStatsService, StatsServiceImpl},
    user::{ArcUserRepository, ArcUserService, UserServiceImpl},
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: ArcUserService,
    pub route_service: ArcRouteService,
    pub climb_service: ArcClimbService,
    pub stats_service: ArcStatsService,
    pub standings_service: ArcStandingsService,
    pub feedback_service: ArcFeedbackService,

    pub gym_repository: ArcGymRepository,
}

impl AppState {
    pub async fn start(&self) {
        self.user_service
            .load_taken_usernames()
            .await
            .expect("Failed to load taken usernames");
    }
}

pub fn construct_app(
    user_repository: ArcUserRepository,
    gym_repository: ArcGymRepository,
    route_repository: ArcRouteRepository,
    climb_repository: ArcClimbRepository,
    feedback_repository: ArcFeedbackRepository,
) -> AppState {
    let user_service: ArcUserService = Arc::new(Box::new(UserServiceImpl::new(
        user_repository.clone(),
        gym_repository.clone(),
    )));

    let route_service: ArcRouteService = Arc::new(Box::new(RouteServiceImpl::new(
        route_repository.clone(),
        user_service.clone(),
    )));

    let climb_service: ArcClimbService = Arc::new(Box::new(ClimbServiceImpl::new(
        climb_repository.clone(),
        route_service.clone(),
        user_service.clone(),
    )));

    let stats_service: ArcStatsService = Arc::new(Box::new(StatsServiceImpl::new(
        climb_repository.clone(),
        user_service.clone(),
    )));

    let standings_service: ArcStandingsService = Arc::new(Box::new(StandingsServiceImpl::new(
        user_repository.clone(),
        climb_repository.clone(),
    )));

    let feedback_service: ArcFeedbackService = Arc::new(Box::new(FeedbackServiceImpl::new(
        feedback_repository,
        user_service.clone(),
    )));

    AppState {
        user_service,
        route_service,
        climb_service,
        stats_service,
        standings_service,
        feedback_service,
        gym_repository,
    }
}
