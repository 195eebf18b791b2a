use axum::{
    Router,
    response::IntoResponse,
    routing::{get, post, put},
};
use log::info;
use serde::Serialize;

use cruxlog_domain::{
    ServiceError,
    app::AppState,
    messages::{MessageKind, MessageSeverity},
};

mod auth;
mod climbs;
mod feedback;
pub mod jwt;
mod profile;
mod routes;
mod standings;
mod stats;

pub async fn run(
    app: AppState,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) {
    let router: Router<AppState> = Router::new().nest(
        "/v1",
        Router::new()
            .route("/auth/register", post(auth::register))
            .route("/auth/login", post(auth::login))
            .route("/profile", put(profile::update_profile))
            .route("/profile/{username}", get(profile::get_profile))
            .route("/stats", get(stats::get_stats))
            .route("/api/stats", get(stats::get_chart_data))
            .route("/standings", get(standings::get_standings))
            .route("/gyms", get(routes::get_gyms))
            .route("/routes", get(routes::get_routes))
            .route("/climbs", post(climbs::log_climb))
            .route("/sessions", get(climbs::get_sessions))
            .route("/feedback", post(feedback::submit_feedback)),
    );

    let port = std::env::var("CRUXLOG_HTTP_PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .expect("CRUXLOG_HTTP_PORT must be a valid u16");

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .unwrap();

    info!("API server listening on port {}", port);
    axum::serve(listener, router.with_state(app))
        .with_graceful_shutdown(shutdown_signal)
        .await
        .unwrap();

    info!("HTTP API shut down gracefully");
}

pub struct ApiError(ServiceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::http::Response<axum::body::Body> {
        let (status, msg) = match self.0 {
            ServiceError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            ServiceError::Unauthorized(msg) => (axum::http::StatusCode::UNAUTHORIZED, msg),
            ServiceError::BadRequest(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            ServiceError::Conflict(msg) => (axum::http::StatusCode::CONFLICT, msg),
            ServiceError::Forbidden(msg) => (axum::http::StatusCode::FORBIDDEN, msg),
            ServiceError::Internal(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        ApiError(value)
    }
}

/// The `{ status, message }` pair every mutating endpoint responds with.
#[derive(Serialize, Clone, Copy)]
pub struct StatusMessage {
    pub status: MessageSeverity,
    pub message: &'static str,
}

impl From<MessageKind> for StatusMessage {
    fn from(kind: MessageKind) -> Self {
        Self {
            status: kind.severity(),
            message: kind.text(),
        }
    }
}
