#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use kuma_common::HeartbeatStatus;
use kuma_server::db::entities::{heartbeat, monitor, user};
use kuma_server::db::schema;
use kuma_server::scheduler::{MonitorScheduler, SchedulerError};
use kuma_server::web::create_axum_router;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerCall {
    Start(i32),
    Stop(i32),
}

/// Scheduler double that records every call in order.
#[derive(Default)]
pub struct RecordingScheduler {
    calls: Mutex<Vec<SchedulerCall>>,
    running: Mutex<HashSet<i32>>,
    fail_starts: Mutex<bool>,
}

impl RecordingScheduler {
    pub fn calls(&self) -> Vec<SchedulerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn fail_starts(&self, fail: bool) {
        *self.fail_starts.lock().unwrap() = fail;
    }
}

#[async_trait]
impl MonitorScheduler for RecordingScheduler {
    async fn start(&self, monitor: &monitor::Model) -> Result<(), SchedulerError> {
        self.calls.lock().unwrap().push(SchedulerCall::Start(monitor.id));
        if *self.fail_starts.lock().unwrap() {
            return Err(SchedulerError::Unavailable("start refused".to_string()));
        }
        self.running.lock().unwrap().insert(monitor.id);
        Ok(())
    }

    async fn stop(&self, monitor_id: i32) {
        self.calls.lock().unwrap().push(SchedulerCall::Stop(monitor_id));
        self.running.lock().unwrap().remove(&monitor_id);
    }

    fn is_running(&self, monitor_id: i32) -> bool {
        self.running.lock().unwrap().contains(&monitor_id)
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub scheduler: Arc<RecordingScheduler>,
}

pub async fn spawn_app() -> TestApp {
    // One connection so every query sees the same in-memory database.
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    schema::ensure_schema(&db).await.unwrap();

    let scheduler = Arc::new(RecordingScheduler::default());
    let router = create_axum_router(db.clone(), scheduler.clone());
    TestApp {
        router,
        db,
        scheduler,
    }
}

pub async fn create_user(db: &DatabaseConnection, username: &str, active: bool) -> i32 {
    let password_hash = bcrypt::hash(PASSWORD, 4).unwrap();
    user::ActiveModel {
        username: Set(username.to_string()),
        password: Set(Some(password_hash)),
        active: Set(active),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn insert_heartbeat(
    db: &DatabaseConnection,
    monitor_id: i32,
    status: HeartbeatStatus,
    time: DateTime<Utc>,
) -> i32 {
    heartbeat::ActiveModel {
        monitor_id: Set(monitor_id),
        status: Set(status.as_i16()),
        msg: Set(Some(status.label().to_string())),
        ping: Set(Some(12.5)),
        time: Set(time),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Sends one request and returns the status with the body parsed as JSON
/// (`Value::Null` when empty, a string when not JSON).
pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(authorization) = authorization {
        builder = builder.header(header::AUTHORIZATION, authorization);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// A user with credentials ready for `send`.
pub struct Caller {
    pub id: i32,
    pub auth: String,
}

pub async fn caller(app: &TestApp, username: &str) -> Caller {
    let id = create_user(&app.db, username, true).await;
    Caller {
        id,
        auth: basic_auth(username, PASSWORD),
    }
}

impl TestApp {
    pub async fn get(&self, caller: &Caller, uri: &str) -> (StatusCode, Value) {
        send(self, Method::GET, uri, Some(caller.auth.as_str()), None).await
    }

    pub async fn post(&self, caller: &Caller, uri: &str, body: Value) -> (StatusCode, Value) {
        send(self, Method::POST, uri, Some(caller.auth.as_str()), Some(body)).await
    }

    pub async fn post_empty(&self, caller: &Caller, uri: &str) -> (StatusCode, Value) {
        send(self, Method::POST, uri, Some(caller.auth.as_str()), None).await
    }

    pub async fn put(&self, caller: &Caller, uri: &str, body: Value) -> (StatusCode, Value) {
        send(self, Method::PUT, uri, Some(caller.auth.as_str()), Some(body)).await
    }

    pub async fn delete(&self, caller: &Caller, uri: &str) -> (StatusCode, Value) {
        send(self, Method::DELETE, uri, Some(caller.auth.as_str()), None).await
    }

    /// Creates a monitor and returns its id.
    pub async fn create_monitor(&self, caller: &Caller, body: Value) -> i32 {
        let (status, created) = self.post(caller, "/api/v2/monitors", body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {created}");
        created["id"].as_i64().unwrap() as i32
    }
}
