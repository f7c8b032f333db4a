use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fieldwatch_core::{parse, AoiCreate, AoiResponse, AoiUpdate, AreaOfInterest};

use crate::error::{ApiError, ApiResult};
use crate::repo;
use crate::state::AppState;

/// Area of Interest routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/aois", post(create_aoi))
        .route("/v1/aois/{id}", get(get_aoi).patch(update_aoi))
}

async fn create_aoi(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<AoiResponse>)> {
    let input: AoiCreate = parse(&body)?;
    let mut aoi = AreaOfInterest::new(input)?;
    repo::aois::insert(state.pool(), &mut aoi).await?;

    tracing::info!(id = ?aoi.id(), kps_code = %aoi.external_code, "aoi created");
    Ok((StatusCode::CREATED, Json(AoiResponse::try_from(&aoi)?)))
}

async fn get_aoi(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AoiResponse>> {
    let aoi = load(&state, id).await?;
    Ok(Json(AoiResponse::try_from(&aoi)?))
}

async fn update_aoi(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> ApiResult<Json<AoiResponse>> {
    let patch: AoiUpdate = parse(&body)?;
    let mut aoi = load(&state, id).await?;

    if !patch.is_empty() {
        patch.apply(&mut aoi)?;
        repo::aois::update(state.pool(), id, &aoi).await?;
        tracing::info!(id, "aoi updated");
    }
    Ok(Json(AoiResponse::try_from(&aoi)?))
}

async fn load(state: &AppState, id: i64) -> ApiResult<AreaOfInterest> {
    repo::aois::find(state.pool(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("aoi {id}")))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::routes::test_support::send;

    #[tokio::test]
    async fn create_rejects_overlong_kps_code() {
        let body = format!(
            r#"{{"name":"Ridge","geojson":{{"type":"Point","coordinates":[0,0]}},"kps_code":"{}"}}"#,
            "K".repeat(51)
        );
        let (status, body) = send(Method::POST, "/v1/aois", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "validationError");
        assert_eq!(body["error"]["field"], "kps_code");
    }

    #[tokio::test]
    async fn create_rejects_malformed_json() {
        let (status, body) = send(Method::POST, "/v1/aois", "{").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "validationError");
    }

    #[tokio::test]
    async fn wrongly_typed_field_is_named() {
        let body = r#"{"name":5,"geojson":null,"kps_code":"X"}"#;
        let (status, body) = send(Method::POST, "/v1/aois", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "name");
    }

    #[tokio::test]
    async fn id_beyond_integer_key_is_not_found() {
        let (status, body) = send(Method::GET, "/v1/aois/4294967296", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "notFound");
    }

    #[tokio::test]
    async fn patch_rejects_null_name_before_lookup() {
        let (status, body) = send(Method::PATCH, "/v1/aois/1", r#"{"name":null}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "name");
    }

    #[tokio::test]
    async fn oversized_body_is_refused() {
        let body = format!(r#"{{"name":"{}"}}"#, "a".repeat(8192));
        let (status, _) = send(Method::PATCH, "/v1/aois/1", &body).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
