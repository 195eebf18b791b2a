use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use cruxlog_domain::{
    app::AppState,
    climb::{ClimbRecord, LoggedClimb, NewClimb},
    messages::MessageKind,
};

use crate::{ApiError, StatusMessage, jwt::Claims};

#[derive(Deserialize)]
pub struct ClimbPayload {
    pub route_id: i64,
    pub stars: Option<u8>,
    pub sent: bool,
    pub tries: Option<u32>,
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct ClimbResponse {
    #[serde(flatten)]
    pub message: StatusMessage,
    pub climb: LoggedClimb,
}

#[axum::debug_handler]
pub async fn log_climb(
    State(app): State<AppState>,
    claims: Claims,
    Json(payload): Json<ClimbPayload>,
) -> Result<Json<ClimbResponse>, ApiError> {
    let new_climb = NewClimb {
        route_id: payload.route_id,
        stars: payload.stars,
        sent: payload.sent,
        tries: payload.tries,
        notes: payload.notes,
    };
    let climb = app.climb_service.log_climb(&claims.sub, new_climb).await?;
    Ok(Json(ClimbResponse {
        message: MessageKind::SendLogged.into(),
        climb,
    }))
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub date: NaiveDate,
    pub climbs: Vec<LoggedClimb>,
}

fn to_logged(record: ClimbRecord) -> LoggedClimb {
    LoggedClimb {
        id: record.id,
        color: record.color,
        grade: record.grade,
        stars: record.climb.stars,
        sent: record.climb.sent,
        tries: record.climb.tries,
        points: record.climb.points,
        notes: record.climb.notes,
        created_at: record.climb.created_at,
    }
}

#[axum::debug_handler]
pub async fn get_sessions(
    State(app): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<SessionResponse>>, ApiError> {
    let sessions = app.climb_service.get_sessions(&claims.sub).await?;
    let sessions = sessions
        .into_iter()
        .map(|session| SessionResponse {
            date: session.date,
            climbs: session.climbs.into_iter().map(to_logged).collect(),
        })
        .collect();
    Ok(Json(sessions))
}
