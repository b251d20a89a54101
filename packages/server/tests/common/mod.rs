//! Shared test harness: in-memory collaborators wired into ServerDeps and an
//! axum router driven through tower's oneshot.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use server_core::kernel::{
    BaseNotifier, InMemoryProfileStore, InMemoryRegistrationStore, MockNotifier, ServerDeps,
};
use server_core::server::build_app;

pub struct TestHarness {
    pub notifier: Arc<MockNotifier>,
    pub profile_store: Arc<InMemoryProfileStore>,
    pub registration_store: Arc<InMemoryRegistrationStore>,
    pub deps: Arc<ServerDeps>,
    pub app: Router,
}

pub fn harness() -> TestHarness {
    harness_with(MockNotifier::new(), chrono::Duration::minutes(5), false)
}

pub fn harness_with(
    notifier: MockNotifier,
    otp_ttl: chrono::Duration,
    simulate_send: bool,
) -> TestHarness {
    let notifier = Arc::new(notifier);
    let profile_store = Arc::new(InMemoryProfileStore::new());
    let registration_store = Arc::new(InMemoryRegistrationStore::new());

    let deps = Arc::new(ServerDeps::new(
        Arc::clone(&notifier) as Arc<dyn BaseNotifier>,
        Arc::clone(&profile_store) as _,
        Arc::clone(&registration_store) as _,
        "test_otp_secret",
        otp_ttl,
        simulate_send,
    ));
    let app = build_app(Arc::clone(&deps), vec![]);

    TestHarness {
        notifier,
        profile_store,
        registration_store,
        deps,
        app,
    }
}

pub async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Pull the 6-digit code out of a captured verification email.
pub fn extract_code(html: &str) -> String {
    let bytes = html.as_bytes();
    for i in 0..bytes.len().saturating_sub(5) {
        let run = &bytes[i..i + 6];
        if run.iter().all(|b| b.is_ascii_digit()) {
            let before_ok = i == 0 || !bytes[i - 1].is_ascii_digit();
            let after_ok = i + 6 >= bytes.len() || !bytes[i + 6].is_ascii_digit();
            if before_ok && after_ok {
                return html[i..i + 6].to_string();
            }
        }
    }
    panic!("no 6-digit code found in email body");
}
