use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/passenger/:action", post(handlers::passenger_form))
        .route("/passenger-config", post(handlers::passenger_config_form))
        .route("/api/passenger", get(handlers::get_passenger))
        .route("/api/passenger/command", post(handlers::passenger_command))
        .route("/api/passenger/config", post(handlers::passenger_config))
        .route("/api/passenger/export", get(handlers::passenger_export))
        .route("/scorecard", get(handlers::scorecard_page))
        .route("/scorecard/:action", post(handlers::scorecard_form))
        .route("/scorecard/points/:side/:points", post(handlers::scorecard_points_form))
        .route("/scorecard-config", post(handlers::scorecard_config_form))
        .route("/api/scorecard", get(handlers::get_scorecard))
        .route("/api/scorecard/points", post(handlers::scorecard_points))
        .route("/api/scorecard/command", post(handlers::scorecard_command))
        .route("/api/scorecard/config", post(handlers::scorecard_config))
        .route("/api/scorecard/export", get(handlers::scorecard_export))
        .with_state(state)
}
