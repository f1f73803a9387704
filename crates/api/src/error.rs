use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::services::{DomainError, PlacesError, StoreError};
use serde::Serialize;
use thiserror::Error;

use crate::services::OAuthError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::MethodNotAllowed(msg) => (
                StatusCode::METHOD_NOT_ALLOWED,
                "method_not_allowed",
                msg.clone(),
            ),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    msg.clone(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => ApiError::Conflict("Resource already exists".into()),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::from(errors).into()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(constraint) => {
                ApiError::Conflict(format!("Resource already exists ({})", constraint))
            }
            StoreError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::Unauthorized => ApiError::Unauthorized("Authentication required".into()),
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
            DomainError::Store(e) => e.into(),
        }
    }
}

impl From<PlacesError> for ApiError {
    fn from(err: PlacesError) -> Self {
        match err {
            PlacesError::InvalidLocation => ApiError::Validation("Invalid location".into()),
            PlacesError::Upstream(msg) => ApiError::ServiceUnavailable(msg),
        }
    }
}

impl From<OAuthError> for ApiError {
    fn from(err: OAuthError) -> Self {
        match err {
            OAuthError::InvalidUrl(msg) => ApiError::Internal(msg),
            OAuthError::Rejected(msg) => {
                tracing::warn!("OAuth request rejected: {}", msg);
                ApiError::Validation("Failed to authenticate with Google.".into())
            }
            OAuthError::Transport(msg) => ApiError::ServiceUnavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                ApiError::MethodNotAllowed("x".into()),
                StatusCode::METHOD_NOT_ALLOWED,
            ),
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::Conflict("Already responded".into()).into_response();
        let json = body_json(response).await;
        assert_eq!(json["error"], "conflict");
        assert_eq!(json["message"], "Already responded");
    }

    #[tokio::test]
    async fn test_internal_error_hides_message() {
        let response = ApiError::Internal("connection refused".into()).into_response();
        let json = body_json(response).await;
        assert_eq!(json["message"], "An internal error occurred");
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::Unauthorized("test".to_string())),
            "Unauthorized: test"
        );
        assert_eq!(
            format!("{}", ApiError::Validation("test".to_string())),
            "Validation error: test"
        );
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        match error {
            ApiError::NotFound(msg) => assert_eq!(msg, "Resource not found"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_from_domain_error() {
        assert!(matches!(
            ApiError::from(DomainError::Conflict("Already responded".into())),
            ApiError::Conflict(m) if m == "Already responded"
        ));
        assert!(matches!(
            ApiError::from(DomainError::Forbidden("no".into())),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(DomainError::Unauthorized),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(DomainError::Store(StoreError::Backend("down".into()))),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_from_oauth_error() {
        assert!(matches!(
            ApiError::from(OAuthError::Rejected("400".into())),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from(OAuthError::Transport("reset".into())),
            ApiError::ServiceUnavailable(_)
        ));
    }

    #[test]
    fn test_from_places_error() {
        assert!(matches!(
            ApiError::from(PlacesError::InvalidLocation),
            ApiError::Validation(m) if m == "Invalid location"
        ));
        assert!(matches!(
            ApiError::from(PlacesError::Upstream("timeout".into())),
            ApiError::ServiceUnavailable(_)
        ));
    }
}
