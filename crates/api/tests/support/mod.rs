//! Shared helpers for `peoplebridge-api` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use peoplebridge_api::{router, AppContext};
use peoplebridge_common::testing::RecordingSleeper;
use peoplebridge_domain::BridgeConfig;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

pub struct TestApp {
    pub router: Router,
    pub sleeper: Arc<RecordingSleeper>,
}

/// Router whose active upstream (`active`) points at `server`
pub fn app(server: &MockServer, active: &str) -> TestApp {
    let mut config = BridgeConfig::default();
    config.client.active_datasource = active.to_string();
    config.upstreams.typicode.base_url = server.uri();
    config.upstreams.dummy.base_url = server.uri();
    config.upstreams.reqres.base_url = format!("{}/api", server.uri());

    let sleeper = Arc::new(RecordingSleeper::new());
    let context = AppContext::with_sleeper(config, sleeper.clone()).expect("context builds");

    TestApp { router: router(Arc::new(context)), sleeper }
}

pub fn rpc(path: &str, body: Value) -> Request<Body> {
    Request::post(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

/// Send `request` and return the response with its JSON body
pub async fn call(router: &Router, request: Request<Body>) -> (Response<Body>, Value) {
    let response = router.clone().oneshot(request).await.expect("router is infallible");
    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.expect("body reads");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is JSON")
    };
    (Response::from_parts(parts, Body::empty()), json)
}
