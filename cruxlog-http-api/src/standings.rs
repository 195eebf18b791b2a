use axum::{Json, extract::State};

use cruxlog_domain::{app::AppState, standings::StandingsEntry};

use crate::ApiError;

#[axum::debug_handler]
pub async fn get_standings(
    State(app): State<AppState>,
) -> Result<Json<Vec<StandingsEntry>>, ApiError> {
    let entries = app.standings_service.leaderboard().await?;
    Ok(Json(entries))
}
