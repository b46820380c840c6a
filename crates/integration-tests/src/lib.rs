//! Integration test harness for the discount rules service.
//!
//! Builds the full router over in-memory collaborators and an in-memory
//! session store, then drives it with `tower::ServiceExt::oneshot`. No
//! database or running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p discount-rules-integration-tests
//! ```

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::Path,
    http::{Request, Response, StatusCode, header},
    routing::post,
};
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session};
use url::Url;

use discount_rules_admin::{
    config::RuleOptions,
    middleware::{auth::set_current_admin, create_session_layer},
    models::CurrentAdmin,
    routes,
    services::{HostServices, MemoryHost},
    state::AppState,
};
use discount_rules_core::{AdminRole, AdminUserId};

pub use discount_rules_admin::rules::shipping_country::defaults;

/// Configuration route under test.
pub const CONFIGURE: &str = "/plugins/discount-rules/shipping-country/configure";

/// Evaluation route under test.
pub const EVALUATE: &str = "/api/discount-requirements/evaluate";

/// Public base URL the app is built with.
pub const BASE_URL: &str = "http://admin.test/";

/// The app under test plus direct access to its in-memory host.
pub struct TestApp {
    pub host: Arc<MemoryHost>,
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// App with default rule options over an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(RuleOptions::default())
    }

    #[must_use]
    pub fn with_options(options: RuleOptions) -> Self {
        Self::with_base_url(BASE_URL, options)
    }

    /// App published under another base URL (e.g. one with a path prefix).
    #[must_use]
    pub fn with_base_url(base_url: &str, options: RuleOptions) -> Self {
        let host = Arc::new(MemoryHost::new());
        let base_url = Url::parse(base_url).expect("valid base URL");
        let state = AppState::new(base_url, HostServices::in_memory(host.clone()), options);

        // Stands in for the host admin's login flow
        let login = Router::new().route("/test/login/{role}", post(login));

        let router = routes::app(state.clone())
            .merge(login)
            .layer(create_session_layer(MemoryStore::default(), false));

        Self {
            host,
            state,
            router,
        }
    }

    /// App seeded with discount 5, countries 10 (Germany) and 11 (France).
    pub async fn seeded() -> Self {
        let app = Self::new();
        app.host.add_discount(5, "Summer sale").await;
        app.host.add_country(10, "Germany", "DE").await;
        app.host.add_country(11, "France", "FR").await;
        app
    }

    /// Send a request through the full middleware stack.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Log in with a role and return the session cookie to send back.
    pub async fn login(&self, role: AdminRole) -> String {
        let request = Request::builder()
            .method("POST")
            .uri(format!("/test/login/{role}"))
            .body(Body::empty())
            .expect("valid request");
        let response = self.send(request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        session_cookie(&response).expect("login sets a session cookie")
    }

    /// GET with an optional session cookie.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).expect("valid request"))
            .await
    }

    /// POST a JSON body with an optional session cookie.
    pub async fn post_json(&self, uri: &str, body: &Value, cookie: Option<&str>) -> Response<Body> {
        self.post(uri, "application/json", body.to_string(), cookie)
            .await
    }

    /// POST a raw body with the given content type.
    pub async fn post(
        &self,
        uri: &str,
        content_type: &str,
        body: impl Into<Body>,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(body.into()).expect("valid request"))
            .await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

async fn login(session: Session, Path(role): Path<String>) -> StatusCode {
    let Ok(role) = role.parse::<AdminRole>() else {
        return StatusCode::BAD_REQUEST;
    };

    let admin = CurrentAdmin {
        id: AdminUserId::new(1),
        email: "admin@example.com".to_string(),
        name: "Test Admin".to_string(),
        role,
    };

    match set_current_admin(&session, &admin).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The `name=value` part of the response's session cookie.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("dr_admin_session="))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

/// Read the response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    serde_json::from_slice(&bytes).expect("JSON body")
}

/// Read the response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("UTF-8 body")
}
