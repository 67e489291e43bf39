use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    error::AppError,
    state::AppState,
    students::{
        dto::{SubmitRequest, SubmitResponse},
        repo_types::Student,
        services,
    },
};

pub fn submit_routes() -> Router<AppState> {
    Router::new().route("/submit", post(submit_attendance))
}

pub fn list_routes() -> Router<AppState> {
    Router::new().route("/students", get(list_students))
}

#[instrument(skip(state, payload))]
pub async fn submit_attendance(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection, "unreadable submission body");
        AppError::from(rejection)
    })?;

    services::submit(state.store.as_ref(), state.config.submit_precheck, payload).await?;
    Ok((StatusCode::CREATED, Json(SubmitResponse::success())))
}

#[instrument(skip(state))]
pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    let students = services::list_all(state.store.as_ref()).await?;
    Ok(Json(students))
}
