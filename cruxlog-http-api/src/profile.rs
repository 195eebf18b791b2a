use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cruxlog_domain::{app::AppState, messages::MessageKind, user::ProfileUpdate};

use crate::{ApiError, StatusMessage, jwt::Claims};

#[derive(Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub name: Option<String>,
    pub gym: Option<String>,
    pub member_since: DateTime<Utc>,
    pub total_ascents: u32,
    pub total_points: i64,
    pub avg_sent_grade: String,
}

#[axum::debug_handler]
pub async fn get_profile(
    State(app): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    // Profile links may carry an "@" prefix.
    let username = username.strip_prefix('@').unwrap_or(&username);
    let (_, user) = app.user_service.fetch_user(username).await?;
    let stats = app.stats_service.user_stats(username).await?;

    let gym = match user.gym_id {
        Some(gym_id) => app.gym_repository.get_gym(gym_id).await?.map(|g| g.name),
        None => None,
    };

    Ok(Json(ProfileResponse {
        username: user.username,
        name: user.name,
        gym,
        member_since: user.member_since,
        total_ascents: stats.total_ascents,
        total_points: stats.total_points,
        avg_sent_grade: stats.avg_sent_grade,
    }))
}

#[derive(Deserialize)]
pub struct ProfilePayload {
    pub username: Option<String>,
    pub name: Option<String>,
    pub gym_id: Option<i64>,
}

#[axum::debug_handler]
pub async fn update_profile(
    State(app): State<AppState>,
    claims: Claims,
    Json(payload): Json<ProfilePayload>,
) -> Result<Json<StatusMessage>, ApiError> {
    let update = ProfileUpdate {
        username: payload.username,
        name: payload.name,
        gym_id: payload.gym_id,
    };
    app.user_service.update_profile(&claims.sub, update).await?;
    Ok(Json(MessageKind::ProfileUpdated.into()))
}
