//! Request body extractors.

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

use crate::error::{AppError, JsonError};

/// Body extractor accepting either JSON or a URL-encoded form.
///
/// JSON is chosen when the `Content-Type` is `application/json` (or a
/// `+json` type); everything else is parsed as a form. A body that does not
/// deserialize is rejected as a validation error, rendered as
/// `{ "errors": [...] }` with status 400.
pub struct FormOrJson<T>(pub T);

impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = JsonError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .is_some_and(|mime| {
                let mime = mime.trim();
                mime == "application/json" || mime.ends_with("+json")
            });

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| invalid_body(rejection.body_text()))?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| invalid_body(rejection.body_text()))?;
            Ok(Self(value))
        }
    }
}

fn invalid_body(message: String) -> JsonError {
    tracing::debug!(error = %message, "Rejected request body");
    JsonError(AppError::Validation(vec![message]))
}
