//! Integration tests for install/uninstall hooks and health endpoints.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use discount_rules_admin::rules::RequirementRule;
use discount_rules_core::AdminRole;
use discount_rules_integration_tests::{CONFIGURE, TestApp, body_text, defaults};

#[tokio::test]
async fn test_install_registers_locale_resources() {
    let app = TestApp::new();
    app.state.shipping_country().install().await.unwrap();

    for (name, value) in defaults::resources::ALL {
        assert_eq!(app.host.locale(name).await.as_deref(), Some(*value));
    }
}

#[tokio::test]
async fn test_installed_resources_drive_the_form() {
    let app = TestApp::seeded().await;
    app.state.shipping_country().install().await.unwrap();
    let cookie = app.login(AdminRole::Admin).await;

    let html = body_text(
        app.get(&format!("{CONFIGURE}?discountId=5"), Some(&cookie))
            .await,
    )
    .await;
    assert!(html.contains("Shipping country"));
    assert!(html.contains(r#"title="Select required shipping country.""#));
}

#[tokio::test]
async fn test_uninstall_removes_only_this_rules_data() {
    let app = TestApp::seeded().await;
    let rule = app.state.shipping_country();
    rule.install().await.unwrap();

    let cookie = app.login(AdminRole::Admin).await;
    for country in [10, 11] {
        let response = app
            .post_json(
                CONFIGURE,
                &json!({"discountId": 5, "countryId": country}),
                Some(&cookie),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    app.host.add_requirement(50, 5, "DiscountRequirement.HasOneProduct").await;
    assert_eq!(app.host.requirements().await.len(), 3);

    rule.uninstall().await.unwrap();

    let remaining = app.host.requirements().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].rule_system_name, "DiscountRequirement.HasOneProduct");
    assert_eq!(app.host.setting_count().await, 0);
    assert_eq!(app.host.locale(defaults::resources::COUNTRY).await, None);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let live = app.get("/health", None).await;
    assert_eq!(live.status(), StatusCode::OK);
    assert_eq!(body_text(live).await, "ok");

    // No database behind the in-memory host
    let ready = app.get("/health/ready", None).await;
    assert_eq!(ready.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();
    let response = app.get("/plugins/discount-rules/unknown", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
