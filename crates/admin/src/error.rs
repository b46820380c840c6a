//! Unified error handling for the discount rules service.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::rules::RuleError;
use crate::rules::shipping_country::ConfigureError;

/// Application-level error type for HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Rule evaluation or management failed.
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Submitted form failed validation, one message per field.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ConfigureError> for AppError {
    fn from(err: ConfigureError) -> Self {
        match err {
            ConfigureError::DiscountNotFound | ConfigureError::RequirementNotFound => {
                Self::NotFound(err.to_string())
            }
            ConfigureError::Validation(errors) => Self::Validation(errors),
            ConfigureError::Repository(e) => Self::Database(e),
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rule(RuleError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            Self::Rule(RuleError::UnknownRule(_)) => StatusCode::NOT_FOUND,
            Self::Rule(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Messages safe to show to the client.
    #[must_use]
    pub fn client_messages(&self) -> Vec<String> {
        match self {
            Self::NotFound(msg) | Self::BadRequest(msg) => vec![msg.clone()],
            Self::Validation(errors) => errors.clone(),
            Self::Rule(err @ (RuleError::InvalidArgument(_) | RuleError::UnknownRule(_))) => {
                vec![err.to_string()]
            }
            // Don't expose internal error details to clients
            Self::Database(_) | Self::Rule(_) | Self::Internal(_) => {
                vec!["Internal server error".to_string()]
            }
        }
    }

    fn report(&self) {
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();

        let status = self.status();
        let message = match &self {
            Self::Validation(_) => return (status, Json(ErrorBody::from(&self))).into_response(),
            _ => self.client_messages().join("\n"),
        };

        (status, message).into_response()
    }
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub errors: Vec<String>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            errors: err.client_messages(),
        }
    }
}

/// An [`AppError`] rendered as a JSON error list, for endpoints called by scripts.
#[derive(Debug)]
pub struct JsonError(pub AppError);

impl From<AppError> for JsonError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ConfigureError> for JsonError {
    fn from(err: ConfigureError) -> Self {
        Self(err.into())
    }
}

impl From<RuleError> for JsonError {
    fn from(err: RuleError) -> Self {
        Self(err.into())
    }
}

impl From<RepositoryError> for JsonError {
    fn from(err: RepositoryError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        self.0.report();
        (self.0.status(), Json(ErrorBody::from(&self.0))).into_response()
    }
}

/// Set the Sentry user context from an admin user ID.
pub fn set_sentry_user(admin_user_id: i32, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("requirement 7".to_string());
        assert_eq!(err.to_string(), "Not found: requirement 7");

        let err = AppError::Validation(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Validation failed: a, b");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Validation(vec![])),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rule_error_status_codes() {
        assert_eq!(
            get_status(RuleError::InvalidArgument("missing".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(RuleError::UnknownRule("X".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(RuleError::Repository(RepositoryError::NotFound).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_configure_errors_map_to_not_found() {
        let err = AppError::from(ConfigureError::DiscountNotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.client_messages(), ["Discount could not be loaded"]);

        let err = AppError::from(ConfigureError::RequirementNotFound);
        assert_eq!(err.client_messages(), ["Failed to load requirement."]);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Database(RepositoryError::DataCorruption("secret".to_string()));
        assert_eq!(err.client_messages(), ["Internal server error"]);
    }

    #[tokio::test]
    async fn test_json_error_body() {
        let response = JsonError::from(ConfigureError::DiscountNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"errors": ["Discount could not be loaded"]}));
    }
}
