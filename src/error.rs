use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors that prevent the catalog from loading; the process must not start
#[derive(thiserror::Error, Debug)]
pub enum StartupDataError {
    #[error("Dataset archive unreadable: {0}")]
    ArchiveUnreadable(#[from] std::io::Error),

    #[error("Invalid dataset archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Resource {0} not found in dataset archive")]
    MissingResource(String),

    #[error("Malformed dataset: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Entry {entry} has a film without a title")]
    EmptyTitle { entry: usize },
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(uuid::Uuid),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::SessionNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let response = AppError::NotFound("no such film".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_session_not_found_status() {
        let response = AppError::SessionNotFound(uuid::Uuid::new_v4()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_input_status() {
        let response = AppError::InvalidInput("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_startup_error_messages() {
        let err = StartupDataError::MissingResource("data_ml_final.json".to_string());
        assert_eq!(
            err.to_string(),
            "Resource data_ml_final.json not found in dataset archive"
        );

        let err = StartupDataError::EmptyTitle { entry: 3 };
        assert_eq!(err.to_string(), "Entry 3 has a film without a title");
    }
}
