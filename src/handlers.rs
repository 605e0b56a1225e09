use crate::errors::AppError;
use crate::export::CsvExport;
use crate::models::{
    CommandRequest, PassengerCommand, PassengerConfigRequest, PassengerView, PointsRequest,
    ScoreCommand, ScorecardConfigRequest, ScorecardView, Side,
};
use crate::state::AppState;
use crate::ui::{render_passenger, render_scorecard};
use axum::{
    Form, Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::debug;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_passenger(&state.passenger_view().await))
}

pub async fn scorecard_page(State(state): State<AppState>) -> Html<String> {
    Html(render_scorecard(&state.scorecard_view().await))
}

pub async fn get_passenger(State(state): State<AppState>) -> Json<PassengerView> {
    Json(state.passenger_view().await)
}

pub async fn passenger_command(
    State(state): State<AppState>,
    Json(payload): Json<CommandRequest>,
) -> Result<Json<PassengerView>, AppError> {
    let command = parse_passenger_action(&payload.action)?;
    Ok(Json(state.passenger_command(command).await))
}

pub async fn passenger_form(
    State(state): State<AppState>,
    Path(action): Path<String>,
) -> Result<Redirect, AppError> {
    let command = parse_passenger_action(&action)?;
    state.passenger_command(command).await;
    Ok(Redirect::to("/"))
}

pub async fn passenger_config(
    State(state): State<AppState>,
    Json(payload): Json<PassengerConfigRequest>,
) -> Json<PassengerView> {
    Json(state.passenger_config(payload).await)
}

pub async fn passenger_config_form(
    State(state): State<AppState>,
    Form(payload): Form<PassengerConfigRequest>,
) -> Redirect {
    state.passenger_config(payload).await;
    Redirect::to("/")
}

pub async fn passenger_export(State(state): State<AppState>) -> Response {
    csv_response(state.passenger_export().await)
}

pub async fn get_scorecard(State(state): State<AppState>) -> Json<ScorecardView> {
    Json(state.scorecard_view().await)
}

pub async fn scorecard_points(
    State(state): State<AppState>,
    Json(payload): Json<PointsRequest>,
) -> Result<Json<ScorecardView>, AppError> {
    let side = parse_side(&payload.side)?;
    Ok(Json(score(&state, side, payload.points).await))
}

pub async fn scorecard_points_form(
    State(state): State<AppState>,
    Path((side, points)): Path<(String, u8)>,
) -> Result<Redirect, AppError> {
    let side = parse_side(&side)?;
    score(&state, side, points).await;
    Ok(Redirect::to("/scorecard"))
}

pub async fn scorecard_command(
    State(state): State<AppState>,
    Json(payload): Json<CommandRequest>,
) -> Result<Json<ScorecardView>, AppError> {
    let command = parse_score_action(&payload.action)?;
    Ok(Json(state.scorecard_command(command).await))
}

pub async fn scorecard_form(
    State(state): State<AppState>,
    Path(action): Path<String>,
) -> Result<Redirect, AppError> {
    let command = parse_score_action(&action)?;
    state.scorecard_command(command).await;
    Ok(Redirect::to("/scorecard"))
}

pub async fn scorecard_config(
    State(state): State<AppState>,
    Json(payload): Json<ScorecardConfigRequest>,
) -> Json<ScorecardView> {
    Json(state.scorecard_config(payload).await)
}

pub async fn scorecard_config_form(
    State(state): State<AppState>,
    Form(payload): Form<ScorecardConfigRequest>,
) -> Redirect {
    state.scorecard_config(payload).await;
    Redirect::to("/scorecard")
}

pub async fn scorecard_export(State(state): State<AppState>) -> Response {
    csv_response(state.scorecard_export().await)
}

/// Scores a play. Refused point values leave the card as it was and are
/// listed under `rejected`.
async fn score(state: &AppState, side: Side, points: u8) -> ScorecardView {
    match state.add_points(side, points).await {
        Ok(view) => view,
        Err(err) => {
            debug!("{err}");
            let mut view = state.scorecard_view().await;
            view.rejected.push(err.field.to_string());
            view
        }
    }
}

fn parse_passenger_action(action: &str) -> Result<PassengerCommand, AppError> {
    PassengerCommand::parse(action).ok_or_else(|| {
        AppError::bad_request(format!("unknown passenger action '{}'", action.trim()))
    })
}

fn parse_score_action(action: &str) -> Result<ScoreCommand, AppError> {
    ScoreCommand::parse(action).ok_or_else(|| {
        AppError::bad_request(format!("unknown scorecard action '{}'", action.trim()))
    })
}

fn parse_side(side: &str) -> Result<Side, AppError> {
    Side::parse(side).ok_or_else(|| AppError::bad_request("side must be 'home' or 'away'"))
}

fn csv_response(export: Option<CsvExport>) -> Response {
    let Some(export) = export else {
        return StatusCode::NO_CONTENT.into_response();
    };
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::passenger_csv;
    use crate::models::PassengerState;

    #[test]
    fn export_with_control_characters_in_station_still_downloads() {
        let mut state = PassengerState::default();
        state.set_station("Pier\u{1}7");
        state.increment();
        state.commit();

        let response = csv_response(passenger_csv(&state));
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .expect("content disposition")
            .to_str()
            .unwrap();
        assert_eq!(disposition, "attachment; filename=\"Pier_7_log.csv\"");
    }

    #[test]
    fn empty_export_is_no_content() {
        let response = csv_response(passenger_csv(&PassengerState::default()));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
