use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error taxonomy for the HTTP layer.
///
/// Scoring components never construct these — they degrade to a zero score
/// with a message. Handlers and repos are the first layers allowed to fail
/// hard.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Unknown goal: {0}")]
    UnknownGoalKey(String),

    #[error("Coach upstream error")]
    CoachUpstream(anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Internal error")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) | ApiError::UnknownGoalKey(_) => StatusCode::NOT_FOUND,
            ApiError::CoachUpstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Failure details go to the log, never the client.
        match &self {
            ApiError::Database(e) => error!(error = %e, "database error"),
            ApiError::Internal(e) => error!(error = %e, "internal error"),
            ApiError::CoachUpstream(e) => error!(error = %e, "coach upstream error"),
            _ => {}
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ApiError::NotFound("Entry"), StatusCode::NOT_FOUND),
            (
                ApiError::UnknownGoalKey("nope".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn internal_message_does_not_leak_details() {
        let err = ApiError::Internal(anyhow::anyhow!("secret connection string"));
        assert_eq!(err.to_string(), "Internal error");
    }
}
