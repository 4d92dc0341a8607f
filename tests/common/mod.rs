#![allow(dead_code)]

use axum::{
    extract::Form,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

pub const API_KEY: &str = "test-api-key-7f3a";
pub const LOGIN_PASSWORD: &str = "correct horse battery staple";

/// Upstream stand-in. Each path plays one behavior of the registry.
fn upstream_router() -> Router {
    Router::new()
        .route("/individual", post(individual))
        .route("/offtaker", post(offtaker))
        .route("/echo", post(echo))
        .route("/error", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/malformed", post(|| async { "<html>maintenance</html>" }))
        .route("/nested", post(|| async { Json(json!([{"id": {"inner": 1}}])) }))
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!([]))
            }),
        )
}

async fn individual() -> Json<Value> {
    Json(json!([{"id": "A1", "status": "pending"}]))
}

async fn offtaker() -> Json<Value> {
    Json(json!([
        {"application_no": "OT-1", "applicant": "Acme", "filed_on": "2024-01-02"},
        {"application_no": "OT-2", "applicant": "Globex", "filed_on": "2024-01-03"},
        {"application_no": "OT-3", "applicant": "Initech", "filed_on": "2024-01-04"}
    ]))
}

async fn echo(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> Json<Value> {
    let header_text = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    Json(json!([{
        "from_date": form.get("fromDate"),
        "to_date": form.get("toDate"),
        "field_count": form.len(),
        "api_key": header_text("x-api-key"),
        "content_type": header_text(header::CONTENT_TYPE.as_str()),
    }]))
}

/// Serves the fake registry on an ephemeral port and returns its base URL.
pub async fn spawn_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream");
    let addr = listener.local_addr().expect("upstream addr");
    tokio::spawn(async move {
        axum::serve(listener, upstream_router())
            .await
            .expect("upstream server");
    });
    format!("http://{addr}")
}

pub fn config_toml(individual_url: &str, offtaker_url: &str) -> String {
    format!(
        r#"
[endpoint_url]
url_individual = "{individual_url}"
url_offtaker = "{offtaker_url}"

[api_key]
ipr_api_key = "{API_KEY}"

[login]
login_password = "{LOGIN_PASSWORD}"
"#
    )
}
