//! Shipping country rule configuration handlers.

#![allow(clippy::used_underscore_binding)]

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use discount_rules_core::{DiscountId, DiscountRequirementId};

use super::extract::FormOrJson;
use crate::{
    error::{AppError, JsonError},
    middleware::RequireDiscountManager,
    models::{RequirementForm, RequirementModel},
    rules::{
        RuleError,
        shipping_country::{ConfigureError, configure_endpoint, defaults, defaults::resources},
    },
    state::AppState,
};

/// Build the shipping country configuration router.
pub fn router() -> Router<AppState> {
    Router::new().route(defaults::CONFIGURE_PATH, get(configure).post(save))
}

/// Query for the configuration screen.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureQuery {
    #[serde(default)]
    pub discount_id: i32,
    #[serde(default)]
    pub discount_requirement_id: Option<i32>,
}

/// Configuration form template.
#[derive(Template)]
#[template(path = "shipping_country/configure.html")]
pub struct ConfigureTemplate {
    pub model: RequirementModel,
    pub country_label: String,
    pub country_hint: String,
    pub save_label: String,
    pub save_url: String,
}

/// Successful save response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub success: bool,
    pub new_requirement_id: i32,
}

/// Configuration screen handler.
///
/// # Errors
///
/// Returns 404 if the discount or requirement cannot be loaded.
#[instrument(skip(_admin, state))]
pub async fn configure(
    RequireDiscountManager(_admin): RequireDiscountManager,
    State(state): State<AppState>,
    Query(query): Query<ConfigureQuery>,
) -> Result<Html<String>, AppError> {
    let rule = state.shipping_country();

    let discount_id =
        DiscountId::non_zero(query.discount_id).ok_or(ConfigureError::DiscountNotFound)?;
    let requirement_id = query
        .discount_requirement_id
        .and_then(DiscountRequirementId::non_zero);

    let model = rule.configuration(discount_id, requirement_id).await?;
    let save_url = configure_endpoint(state.base_url()).map_err(RuleError::from)?;

    let template = ConfigureTemplate {
        model,
        country_label: rule.text(resources::COUNTRY).await?,
        country_hint: rule.text(resources::COUNTRY_HINT).await?,
        save_label: rule.text(resources::SAVE).await?,
        save_url: save_url.into(),
    };

    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("Template render error: {e}")))?;

    Ok(Html(html))
}

/// Save handler; accepts a URL-encoded form or JSON.
///
/// # Errors
///
/// Returns 400 with the validation messages, 404 if the discount does not
/// exist, or 500 if a store fails. Error bodies are `{ "errors": [...] }`.
#[instrument(skip(admin, state, form), fields(admin_id = %admin.id))]
pub async fn save(
    RequireDiscountManager(admin): RequireDiscountManager,
    State(state): State<AppState>,
    FormOrJson(form): FormOrJson<RequirementForm>,
) -> Result<Json<SaveResponse>, JsonError> {
    let outcome = state.shipping_country().save_configuration(&form).await?;

    Ok(Json(SaveResponse {
        success: true,
        new_requirement_id: outcome.requirement_id.as_i32(),
    }))
}
