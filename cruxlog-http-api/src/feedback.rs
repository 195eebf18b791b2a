use axum::{Json, extract::State};
use serde::Deserialize;

use cruxlog_domain::{app::AppState, messages::MessageKind};

use crate::{ApiError, StatusMessage, jwt::Claims};

#[derive(Deserialize)]
pub struct FeedbackPayload {
    pub message: String,
}

#[axum::debug_handler]
pub async fn submit_feedback(
    State(app): State<AppState>,
    claims: Option<Claims>,
    Json(payload): Json<FeedbackPayload>,
) -> Result<Json<StatusMessage>, ApiError> {
    let username = claims.as_ref().map(|c| c.sub.as_str());
    app.feedback_service.submit(username, &payload.message).await?;
    Ok(Json(MessageKind::FeedbackSubmitted.into()))
}
