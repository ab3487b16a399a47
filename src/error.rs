//! Error taxonomy shared by the store, the balancer and the HTTP surface.

use crate::auth::AuthError;
use crate::store::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Errors reported to the caller of an operation. Nothing is retried.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid input fields, or too few players to split.
    #[error("{0}")]
    Validation(String),
    /// Team generation referenced ids that are not in the store.
    #[error("Some players were not found")]
    MissingPlayers(Vec<String>),
    #[error("{0}")]
    NotFound(String),
    /// Name already taken by another player.
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Unauthorized(#[from] AuthError),
    /// Backend failure. The detail is logged, never sent to the client.
    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => AppError::NotFound("Player not found".to_string()),
            StoreError::DuplicateName(_) => {
                AppError::Conflict("Player with this name already exists".to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MissingPlayers(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::Internal(detail) => {
                log::error!("Internal error: {}", detail);
                HttpResponse::build(status)
                    .json(serde_json::json!({ "error": "Internal server error" }))
            }
            AppError::MissingPlayers(ids) => HttpResponse::build(status)
                .json(serde_json::json!({ "error": self.to_string(), "missing": ids })),
            _ => HttpResponse::build(status).json(serde_json::json!({ "error": self.to_string() })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn store_errors_map_to_taxonomy() {
        let id = Uuid::new_v4();
        assert!(matches!(
            AppError::from(StoreError::NotFound(id)),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::DuplicateName("Ana".into())),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::Poisoned),
            AppError::Internal(_)
        ));
    }

    #[actix_web::test]
    async fn internal_detail_is_hidden() {
        let err = AppError::Internal("disk on fire at /var/data".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(body, r#"{"error":"Internal server error"}"#);
        assert!(!String::from_utf8_lossy(&body).contains("/var/data"));
    }

    #[actix_web::test]
    async fn missing_players_are_listed() {
        let resp = AppError::MissingPlayers(vec!["x".into()]).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["missing"], serde_json::json!(["x"]));
    }

    #[test]
    fn auth_errors_are_unauthorized() {
        assert_eq!(
            AppError::from(AuthError::Expired).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
