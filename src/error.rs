use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub const MISSING_VIDEO_ID: &str = "Missing 'videoId' parameter.";

/// Why a request failed. Every variant renders as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Missing 'videoId' parameter.")]
    MissingVideoId,
    /// Metadata or transcript collaborator failed.
    #[error("{0:#}")]
    Upstream(anyhow::Error),
    /// Reading or writing the transcript cache failed.
    #[error("{0:#}")]
    Storage(anyhow::Error),
    #[error("transcript not cached")]
    NotCached,
    #[error("unsupported language {0:?}")]
    UnknownLanguage(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingVideoId => StatusCode::BAD_REQUEST,
            Self::NotCached | Self::UnknownLanguage(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
