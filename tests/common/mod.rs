#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use httpmock::prelude::*;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use admin_panel::app::{app, AppState};
use admin_panel::config::AppConfig;
use admin_panel::database::{MemoryScheduleStore, MemoryUserStore, ScheduleStore, UserStore};

pub const SECRET: &str = "integration-secret";

/// App wired against a mock identity provider, an in-memory user store and
/// databases that refuse connections.
pub struct TestApp {
    pub router: Router,
    pub users: MemoryUserStore,
    pub schedules: MemoryScheduleStore,
}

/// Port 9 (discard) refuses connections on test hosts
pub const NO_SCHEDULER: u16 = 9;

pub fn config(login_url: &str, scheduler_port: u16) -> Result<AppConfig> {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("AUTH_API_LOGIN_URL".to_string(), login_url.to_string()),
        ("SUPER_ROLES_NAME".to_string(), "admin, manager".to_string()),
        ("AUTH_API_TIMEOUT_SECS".to_string(), "2".to_string()),
        ("BACKEND_SECRET_KEY".to_string(), SECRET.to_string()),
        ("DATABASE_CONNECTION_TIMEOUT".to_string(), "1".to_string()),
        ("SCHEDULE_HOST".to_string(), "127.0.0.1".to_string()),
        ("SCHEDULE_PORT".to_string(), scheduler_port.to_string()),
    ]);
    for prefix in ["DEFAULT", "AUTH", "MOVIE", "NOTIFICATION", "PROFILE"] {
        vars.insert(format!("{}_DB_HOST", prefix), "127.0.0.1".to_string());
        vars.insert(format!("{}_DB_PORT", prefix), "1".to_string());
    }

    Ok(AppConfig::from_source(|key| vars.get(key).cloned())?)
}

pub fn test_app(login_url: &str) -> Result<TestApp> {
    test_app_with_scheduler(login_url, NO_SCHEDULER)
}

pub fn test_app_with_scheduler(login_url: &str, scheduler_port: u16) -> Result<TestApp> {
    let users = MemoryUserStore::new();
    let schedules = MemoryScheduleStore::new();
    let user_store: Arc<dyn UserStore> = Arc::new(users.clone());
    let schedule_store: Arc<dyn ScheduleStore> = Arc::new(schedules.clone());

    let state = AppState::with_stores(config(login_url, scheduler_port)?, user_store, schedule_store)?;
    Ok(TestApp {
        router: app(state),
        users,
        schedules,
    })
}

/// Provider access token signed with a key this service never sees
pub fn provider_token(claims: Value) -> String {
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"provider-only"))
        .expect("encode provider token")
}

pub fn future_exp() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

/// Provider answering every login with `{"access_token": <token with role>}`
pub async fn provider_with_role(server: &MockServer, role: Option<&str>) {
    let mut claims = json!({ "exp": future_exp(), "sub": "provider-user" });
    if let Some(role) = role {
        claims["role_name"] = json!(role);
    }
    let access = provider_token(claims);

    server
        .mock_async(|when, then| {
            when.method(POST).path("/login");
            then.status(200).json_body(json!({ "access_token": access }));
        })
        .await;
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, json))
}

/// Send a raw body with an optional content type
pub async fn send_raw(
    router: &Router,
    uri: &str,
    content_type: Option<&str>,
    body: &'static str,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    let response = router.clone().oneshot(builder.body(Body::from(body))?).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, json))
}

/// Log in through the API and return the session token
pub async fn login(router: &Router, username: &str) -> Result<String> {
    let (status, body) = send(
        router,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": "secret" })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);

    body["data"]["token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("login response without token: {}", body))
}
