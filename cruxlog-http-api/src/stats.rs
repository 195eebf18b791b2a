use axum::{Json, extract::State};

use cruxlog_domain::{
    app::AppState,
    stats::{ChartData, ClimbStats},
};

use crate::{ApiError, jwt::Claims};

#[axum::debug_handler]
pub async fn get_stats(
    State(app): State<AppState>,
    claims: Claims,
) -> Result<Json<ClimbStats>, ApiError> {
    let stats = app.stats_service.user_stats(&claims.sub).await?;
    Ok(Json(stats))
}

#[axum::debug_handler]
pub async fn get_chart_data(
    State(app): State<AppState>,
    claims: Claims,
) -> Result<Json<ChartData>, ApiError> {
    let data = app.stats_service.user_chart_data(&claims.sub).await?;
    Ok(Json(data))
}
