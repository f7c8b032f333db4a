use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fieldwatch_core::ValidationError;
use serde_json::json;

/// API error type that maps to JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "notFound", msg.clone()),
            ApiError::Validation(err) => {
                (StatusCode::BAD_REQUEST, "validationError", err.to_string())
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": {
                "type": error_type,
                "message": message,
                "statusCode": status.as_u16(),
            }
        });
        if let ApiError::Validation(err) = &self {
            if let Some(field) = err.field() {
                body["error"]["field"] = json!(field);
            }
        }

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_error_names_the_field() {
        let (status, body) = render(ApiError::from(ValidationError::NotNullable {
            field: "source",
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "validationError");
        assert_eq!(body["error"]["field"], "source");
        assert_eq!(body["error"]["statusCode"], 400);
    }

    #[tokio::test]
    async fn decoding_error_carries_its_path() {
        let (status, body) = render(ApiError::from(ValidationError::InvalidValue {
            field: "lat".to_string(),
            message: "invalid type".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "lat");
    }

    #[tokio::test]
    async fn malformed_input_has_no_field() {
        let (_, body) = render(ApiError::from(ValidationError::Malformed("eof".into()))).await;
        assert!(body["error"].get("field").is_none());
    }

    #[tokio::test]
    async fn database_detail_is_not_leaked() {
        let (status, body) = render(ApiError::Database(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "An internal error occurred");
    }
}
