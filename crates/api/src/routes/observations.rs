use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fieldwatch_core::{parse, Observation, ObservationCreate, ObservationResponse, ObservationUpdate};

use crate::error::{ApiError, ApiResult};
use crate::repo;
use crate::state::AppState;

/// Observation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/observations", post(create_observation))
        .route(
            "/v1/observations/{id}",
            get(get_observation).patch(update_observation),
        )
}

async fn create_observation(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ObservationResponse>)> {
    let input: ObservationCreate = parse(&body)?;
    let mut obs = Observation::new(input)?;
    repo::observations::insert(state.pool(), &mut obs).await?;

    tracing::info!(
        id = ?obs.id(),
        kps_id = %obs.external_id,
        finding_type = %obs.finding_type,
        "observation recorded"
    );
    Ok((StatusCode::CREATED, Json(ObservationResponse::try_from(&obs)?)))
}

async fn get_observation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ObservationResponse>> {
    let obs = load(&state, id).await?;
    Ok(Json(ObservationResponse::try_from(&obs)?))
}

async fn update_observation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> ApiResult<Json<ObservationResponse>> {
    let patch: ObservationUpdate = parse(&body)?;
    let mut obs = load(&state, id).await?;

    if !patch.is_empty() {
        patch.apply(&mut obs)?;
        repo::observations::update(state.pool(), id, &obs).await?;
        tracing::info!(id, "observation updated");
    }
    Ok(Json(ObservationResponse::try_from(&obs)?))
}

async fn load(state: &AppState, id: i64) -> ApiResult<Observation> {
    repo::observations::find(state.pool(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("observation {id}")))
}
