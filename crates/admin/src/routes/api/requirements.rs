//! Discount requirement API handlers.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use discount_rules_core::{DiscountId, DiscountRequirementId};

use crate::{
    error::{AppError, JsonError},
    middleware::RequireAdminAuth,
    rules::{ValidationRequest, ValidationResult},
    state::AppState,
};

/// Build the requirements router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/discount-requirements/evaluate", post(evaluate))
        .route("/api/discount-requirements/rules", get(list_rules))
}

/// Evaluate a requirement for a customer on behalf of the discount engine.
///
/// The body is a [`ValidationRequest`]. An empty body (or JSON `null`) is an
/// invalid argument rather than a failed requirement.
///
/// # Errors
///
/// Returns 400 for a missing or malformed body, 404 if the requirement's
/// rule is not registered, or 500 if a store fails.
#[instrument(skip(state, body))]
pub async fn evaluate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ValidationResult>, JsonError> {
    let request: Option<ValidationRequest> = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid validation request: {e}")))?
    };

    let result = state
        .registry()
        .evaluate(state.services().discounts.as_ref(), request.as_ref())
        .await?;

    tracing::debug!(is_valid = result.is_valid, "Requirement evaluated");
    Ok(Json(result))
}

/// Query for listing rules with their configuration links.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesQuery {
    pub discount_id: i32,
    #[serde(default)]
    pub discount_requirement_id: Option<i32>,
}

/// A registered rule as shown in the host's "add requirement" list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleView {
    pub system_name: &'static str,
    pub friendly_name: &'static str,
    pub configuration_url: String,
}

/// List registered rules with configuration links for one discount.
///
/// # Errors
///
/// Returns 400 if `discountId` is not positive, or 500 if a link cannot be built.
#[instrument(skip(_admin, state))]
pub async fn list_rules(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<RulesQuery>,
) -> Result<Json<Vec<RuleView>>, JsonError> {
    let discount_id = DiscountId::non_zero(query.discount_id)
        .ok_or_else(|| AppError::BadRequest("discountId must be positive".to_string()))?;
    let requirement_id = query
        .discount_requirement_id
        .and_then(DiscountRequirementId::non_zero);

    let views = state
        .registry()
        .rules()
        .map(|rule| {
            let url = rule.configuration_url(state.base_url(), discount_id, requirement_id)?;
            Ok(RuleView {
                system_name: rule.system_name(),
                friendly_name: rule.friendly_name(),
                configuration_url: url.into(),
            })
        })
        .collect::<Result<Vec<_>, JsonError>>()?;

    Ok(Json(views))
}
