//! Shared harness for HTTP integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use fanevent_api::{router, AppContext};
use fanevent_domain::Config;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "http-test-secret";

/// Router over a fresh temp database, plus token minting.
pub struct TestApp {
    pub ctx: Arc<AppContext>,
    router: Router,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let mut config = Config::default();
        config.auth.jwt_secret = SECRET.into();
        config.database.path = dir.path().join("fanevent.db").display().to_string();
        config.database.pool_size = 4;
        config.reminders.enabled = false;

        let ctx = Arc::new(AppContext::new(config).await.expect("failed to build context"));
        let router = router(Arc::clone(&ctx));
        Self { ctx, router, _dir: dir }
    }

    /// Token for `sub` with the given role names. The `name` claim is the
    /// subject itself.
    pub fn token(&self, sub: &str, roles: &[&str]) -> String {
        let claims = json!({
            "sub": sub,
            "email": format!("{sub}@example.com"),
            "name": sub,
            "roles": roles,
            "exp": (Utc::now() + Duration::minutes(30)).timestamp(),
        });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes()))
            .expect("token encodes")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
            None => builder.body(Body::empty()).expect("request builds"),
        };

        self.router.clone().oneshot(request).await.expect("router is infallible")
    }

    /// Send a request and decode the JSON body (`Null` when empty).
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, uri, token, body).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body reads");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body is JSON")
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.json(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.json(Method::POST, uri, Some(token), Some(body)).await
    }

    /// Sync the caller's profile and return their user id.
    pub async fn user_id(&self, token: &str) -> String {
        let (status, me) = self.get("/api/me", token).await;
        assert_eq!(status, StatusCode::OK);
        me["id"].as_str().expect("profile id").to_string()
    }
}

/// Event payload starting `days` from now.
pub fn event_payload(title: &str, days: i64) -> Value {
    let starts_at = Utc::now() + Duration::days(days);
    json!({
        "title": title,
        "description": "Meetup for fans of the band",
        "location": "Main Hall",
        "category": "music",
        "starts_at": starts_at.to_rfc3339(),
        "ends_at": (starts_at + Duration::hours(2)).to_rfc3339(),
        "capacity": 50,
    })
}
