use axum::{Json, extract::State};
use serde::Serialize;

use cruxlog_domain::app::AppState;

use crate::{ApiError, jwt::Claims};

#[derive(Serialize)]
pub struct GymResponse {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
}

#[derive(Serialize)]
pub struct RouteResponse {
    pub id: i64,
    pub color: String,
    pub grade: String,
    pub avg_stars: f64,
    pub stars_count: u32,
}

#[axum::debug_handler]
pub async fn get_gyms(State(app): State<AppState>) -> Result<Json<Vec<GymResponse>>, ApiError> {
    let gyms = app.gym_repository.get_gyms().await?;
    let gyms = gyms
        .into_iter()
        .map(|(id, gym)| GymResponse {
            id,
            name: gym.name,
            location: gym.location,
        })
        .collect();
    Ok(Json(gyms))
}

#[axum::debug_handler]
pub async fn get_routes(
    State(app): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<RouteResponse>>, ApiError> {
    let routes = app.route_service.routes_for_user(&claims.sub).await?;
    let routes = routes
        .into_iter()
        .map(|(id, route)| RouteResponse {
            id,
            color: route.color,
            grade: route.grade,
            avg_stars: route.avg_stars,
            stars_count: route.stars_count,
        })
        .collect();
    Ok(Json(routes))
}
