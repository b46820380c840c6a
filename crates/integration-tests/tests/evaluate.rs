//! Integration tests for the requirement evaluation API.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use discount_rules_admin::config::RuleOptions;
use discount_rules_core::AdminRole;
use discount_rules_integration_tests::{
    CONFIGURE, EVALUATE, TestApp, body_json, defaults,
};

/// Requirement 7 on discount 5 configured with country 10 through the
/// configuration endpoint, plus addresses 100 (country 10), 101 (country 11)
/// and 102 (no country).
async fn configured_app(app: TestApp) -> TestApp {
    app.host.add_discount(5, "Summer sale").await;
    app.host.add_country(10, "Germany", "DE").await;
    app.host.add_country(11, "France", "FR").await;
    app.host.add_requirement(7, 5, defaults::SYSTEM_NAME).await;
    app.host.add_address(100, Some(10)).await;
    app.host.add_address(101, Some(11)).await;
    app.host.add_address(102, None).await;

    let cookie = app.login(AdminRole::Admin).await;
    let response = app
        .post_json(
            CONFIGURE,
            &json!({"discountId": 5, "discountRequirementId": 7, "countryId": 10}),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    app
}

async fn is_valid(app: &TestApp, request: serde_json::Value) -> bool {
    let response = app.post_json(EVALUATE, &request, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["isValid"].as_bool().unwrap()
}

fn customer_request(requirement_id: i32, address_id: Option<i32>) -> serde_json::Value {
    json!({
        "discountRequirementId": requirement_id,
        "customer": {"id": 1, "shippingAddressId": address_id},
    })
}

#[tokio::test]
async fn test_customer_in_configured_country_is_valid() {
    let app = configured_app(TestApp::new()).await;
    assert!(is_valid(&app, customer_request(7, Some(100))).await);
}

#[tokio::test]
async fn test_customer_in_other_country_is_invalid() {
    let app = configured_app(TestApp::new()).await;
    assert!(!is_valid(&app, customer_request(7, Some(101))).await);
}

#[tokio::test]
async fn test_customer_without_shipping_address_is_invalid() {
    let app = configured_app(TestApp::new()).await;
    assert!(!is_valid(&app, customer_request(7, None)).await);
    assert!(!is_valid(&app, customer_request(7, Some(102))).await);
}

#[tokio::test]
async fn test_unconfigured_requirement_is_invalid() {
    let app = configured_app(TestApp::new()).await;
    app.host.add_requirement(8, 5, defaults::SYSTEM_NAME).await;

    assert!(!is_valid(&app, customer_request(8, Some(100))).await);
}

#[tokio::test]
async fn test_anonymous_or_unknown_requirement_is_invalid() {
    let app = configured_app(TestApp::new()).await;

    assert!(!is_valid(&app, json!({"discountRequirementId": 7})).await);
    assert!(!is_valid(&app, customer_request(404, Some(100))).await);
    assert!(!is_valid(&app, json!({"customer": {"id": 1, "shippingAddressId": 100}})).await);
}

#[tokio::test]
async fn test_verify_country_rejects_country_missing_from_directory() {
    let app = configured_app(TestApp::with_options(RuleOptions {
        verify_country: true,
    }))
    .await;
    app.host.add_address(103, Some(10)).await;
    assert!(is_valid(&app, customer_request(7, Some(103))).await);

    // Country 12 exists on the address but not in the directory
    app.host.add_address(104, Some(12)).await;
    assert!(!is_valid(&app, customer_request(7, Some(104))).await);
}

#[tokio::test]
async fn test_missing_body_is_bad_request() {
    let app = configured_app(TestApp::new()).await;

    let empty = app.post(EVALUATE, "application/json", "", None).await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let null = app.post(EVALUATE, "application/json", "null", None).await;
    assert_eq!(null.status(), StatusCode::BAD_REQUEST);

    let garbage = app.post(EVALUATE, "application/json", "{not json", None).await;
    assert_eq!(garbage.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(garbage).await["errors"].is_array());
}

#[tokio::test]
async fn test_unregistered_rule_is_not_found() {
    let app = configured_app(TestApp::new()).await;
    app.host.add_requirement(9, 5, "DiscountRequirement.HasOneProduct").await;

    let response = app
        .post_json(EVALUATE, &customer_request(9, Some(100)), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rules_listing_links_to_configuration() {
    let app = TestApp::seeded().await;
    let cookie = app.login(AdminRole::Viewer).await;

    let response = app
        .get(
            "/api/discount-requirements/rules?discountId=5&discountRequirementId=7",
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        body_json(response).await,
        json!([{
            "systemName": "DiscountRequirement.ShippingCountryIs",
            "friendlyName": "Must be shipped to country",
            "configurationUrl": "http://admin.test/plugins/discount-rules/shipping-country/configure?discountId=5&discountRequirementId=7",
        }])
    );
}

#[tokio::test]
async fn test_rules_listing_keeps_base_url_prefix() {
    let app = TestApp::with_base_url("https://shop.example.com/admin/", RuleOptions::default());
    let cookie = app.login(AdminRole::Admin).await;

    let response = app
        .get("/api/discount-requirements/rules?discountId=5", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body[0]["configurationUrl"],
        "https://shop.example.com/admin/plugins/discount-rules/shipping-country/configure?discountId=5"
    );
}
