use axum::{Json, extract::State};
use serde::Deserialize;

use cruxlog_domain::{app::AppState, user::Registration};

use crate::{
    ApiError,
    jwt::{AuthBody, generate_jwt},
};

#[derive(Deserialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    pub gym_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[axum::debug_handler]
pub async fn register(
    State(app): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<AuthBody>, ApiError> {
    let registration = Registration {
        username: payload.username,
        email: payload.email,
        password: payload.password,
        gym_id: payload.gym_id,
    };
    app.user_service.try_register(&registration).await?;
    let token = generate_jwt(&registration.username);
    Ok(Json(AuthBody { token }))
}

#[axum::debug_handler]
pub async fn login(
    State(app): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthBody>, ApiError> {
    let username = app
        .user_service
        .try_login(&payload.username, &payload.password)
        .await?;
    let token = generate_jwt(&username);
    Ok(Json(AuthBody { token }))
}
