mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{caller, insert_heartbeat, spawn_app, SchedulerCall};
use kuma_common::{HeartbeatStatus, MonitorRecord};
use kuma_server::db::entities::{heartbeat, prelude::*};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

fn http_monitor(name: &str) -> serde_json::Value {
    json!({ "name": name, "type": "http", "url": "https://example.com/health" })
}

#[tokio::test]
async fn test_create_then_get_returns_same_fields() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;

    let (status, created) = app
        .post(
            &alice,
            "/api/v2/monitors",
            json!({
                "name": "api",
                "type": "keyword",
                "url": "https://example.com",
                "keyword": "healthy",
                "interval": 30,
                "headers": { "X-Probe": "1" }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: MonitorRecord = serde_json::from_value(created).unwrap();
    assert_eq!(created.user_id, alice.id);
    assert_eq!(created.interval, 30);
    assert_eq!(created.retry_interval, 60);
    assert_eq!(created.weight, 2000);
    assert_eq!(created.method, "GET");
    assert!(created.active);

    let (status, fetched) = app
        .get(&alice, &format!("/api/v2/monitors/{}", created.id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["active"], json!(1));
    assert_eq!(fetched["headers"], json!({ "X-Probe": "1" }));
    assert!(fetched["latestHeartbeat"].is_null());
    let fetched: MonitorRecord = serde_json::from_value(fetched).unwrap();
    assert_eq!(fetched, created);

    assert_eq!(app.scheduler.calls(), vec![SchedulerCall::Start(created.id)]);
}

#[tokio::test]
async fn test_create_inactive_does_not_start() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;

    let mut body = http_monitor("quiet");
    body["active"] = json!(0);
    let id = app.create_monitor(&alice, body).await;

    let (_, fetched) = app.get(&alice, &format!("/api/v2/monitors/{id}")).await;
    assert_eq!(fetched["active"], json!(0));
    assert!(app.scheduler.calls().is_empty());
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;

    let (status, body) = app
        .post(&alice, "/api/v2/monitors", json!({ "name": "x", "type": "http" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: name, type, url");

    let (status, body) = app
        .post(
            &alice,
            "/api/v2/monitors",
            json!({ "name": "x", "type": "smtp", "url": "mail.example.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("unknown monitor type"));

    let mut unknown = http_monitor("x");
    unknown["owner"] = json!("bob");
    let (status, body) = app.post(&alice, "/api/v2/monitors", unknown).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let count = Monitor::find().count(&app.db).await.unwrap();
    assert_eq!(count, 0);
    assert!(app.scheduler.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_body_and_id_are_bad_requests() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;

    let (status, body) = app.get(&alice, "/api/v2/monitors/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app
        .post(&alice, "/api/v2/monitors", json!(["not", "an", "object"]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_tcp_derives_host_and_port() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;

    let id = app
        .create_monitor(
            &alice,
            json!({ "name": "db-check", "type": "tcp", "url": "10.0.0.5:5432", "interval": 60 }),
        )
        .await;
    let (_, fetched) = app.get(&alice, &format!("/api/v2/monitors/{id}")).await;
    assert_eq!(fetched["hostname"], "10.0.0.5");
    assert_eq!(fetched["port"], 5432);

    let (status, bare) = app
        .post(
            &alice,
            "/api/v2/monitors",
            json!({ "name": "db", "type": "tcp", "url": "10.0.0.5", "interval": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(bare["hostname"], "10.0.0.5");
    assert!(bare["port"].is_null());
    assert_eq!(bare["interval"], 10);
}

#[tokio::test]
async fn test_read_only_keys_are_ignored() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;
    let bob = caller(&app, "bob").await;

    let mut body = http_monitor("copied");
    body["id"] = json!(999);
    body["user_id"] = json!(bob.id);
    body["latestHeartbeat"] = json!({ "status": 1 });
    let id = app.create_monitor(&alice, body).await;

    assert_ne!(id, 999);
    let (status, fetched) = app.get(&alice, &format!("/api/v2/monitors/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["user_id"], alice.id);
}

#[tokio::test]
async fn test_list_orders_by_weight_then_name() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;
    let bob = caller(&app, "bob").await;

    for (name, weight) in [("b", 10), ("a", 10), ("z", 500)] {
        let mut body = http_monitor(name);
        body["weight"] = json!(weight);
        app.create_monitor(&alice, body).await;
    }
    app.create_monitor(&bob, http_monitor("bobs")).await;

    let (status, list) = app.get(&alice, "/api/v2/monitors").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["z", "a", "b"]);
}

#[tokio::test]
async fn test_latest_heartbeat_carries_uptime() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;
    let id = app.create_monitor(&alice, http_monitor("api")).await;

    let now = Utc::now();
    insert_heartbeat(&app.db, id, HeartbeatStatus::Up, now - Duration::minutes(3)).await;
    insert_heartbeat(&app.db, id, HeartbeatStatus::Up, now - Duration::minutes(2)).await;
    insert_heartbeat(&app.db, id, HeartbeatStatus::Up, now - Duration::minutes(1)).await;
    let newest = insert_heartbeat(&app.db, id, HeartbeatStatus::Down, now).await;

    let (_, list) = app.get(&alice, "/api/v2/monitors").await;
    let latest = &list[0]["latestHeartbeat"];
    assert_eq!(latest["id"], newest);
    assert_eq!(latest["status"], 0);
    assert_eq!(latest["uptime"], 75.0);
}

#[tokio::test]
async fn test_foreign_monitor_is_not_found() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;
    let bob = caller(&app, "bob").await;
    let id = app.create_monitor(&alice, http_monitor("private")).await;
    app.scheduler.clear();

    let path = format!("/api/v2/monitors/{id}");
    let (status, body) = app.get(&bob, &path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Monitor not found");

    let (status, _) = app.put(&bob, &path, json!({ "name": "stolen" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.delete(&bob, &path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.post_empty(&bob, &format!("{path}/pause")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.post_empty(&bob, &format!("{path}/resume")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&bob, &format!("{path}/heartbeats")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(app.scheduler.calls().is_empty());
    let (_, still_there) = app.get(&alice, &path).await;
    assert_eq!(still_there["name"], "private");
}

#[tokio::test]
async fn test_update_interval_restarts_once() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;
    let id = app.create_monitor(&alice, http_monitor("api")).await;
    app.scheduler.clear();

    let (status, updated) = app
        .put(&alice, &format!("/api/v2/monitors/{id}"), json!({ "interval": 120 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["interval"], 120);
    assert_eq!(updated["name"], "api");
    assert_eq!(
        app.scheduler.calls(),
        vec![SchedulerCall::Stop(id), SchedulerCall::Start(id)]
    );
}

#[tokio::test]
async fn test_update_without_change_skips_scheduler() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;
    let id = app.create_monitor(&alice, http_monitor("api")).await;
    app.scheduler.clear();

    let (status, _) = app
        .put(&alice, &format!("/api/v2/monitors/{id}"), json!({ "name": "api" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.scheduler.calls().is_empty());
}

#[tokio::test]
async fn test_update_active_flag_transitions() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;
    let id = app.create_monitor(&alice, http_monitor("api")).await;
    let path = format!("/api/v2/monitors/{id}");
    app.scheduler.clear();

    let (_, body) = app.put(&alice, &path, json!({ "active": false })).await;
    assert_eq!(body["active"], 0);
    assert_eq!(app.scheduler.calls(), vec![SchedulerCall::Stop(id)]);

    app.scheduler.clear();
    let (_, body) = app.put(&alice, &path, json!({ "active": 1, "interval": 90 })).await;
    assert_eq!(body["active"], 1);
    assert_eq!(app.scheduler.calls(), vec![SchedulerCall::Start(id)]);
}

#[tokio::test]
async fn test_update_rejects_unknown_field_and_keeps_row() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;
    let id = app.create_monitor(&alice, http_monitor("api")).await;
    let path = format!("/api/v2/monitors/{id}");

    let (status, _) = app
        .put(&alice, &path, json!({ "interval": 90, "created_date": "2020-01-01" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, fetched) = app.get(&alice, &path).await;
    assert_eq!(fetched["interval"], 60);
}

#[tokio::test]
async fn test_pause_and_resume_are_idempotent() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;
    let id = app.create_monitor(&alice, http_monitor("api")).await;
    app.scheduler.clear();

    let pause = format!("/api/v2/monitors/{id}/pause");
    let resume = format!("/api/v2/monitors/{id}/resume");

    let (status, body) = app.post_empty(&alice, &resume).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Monitor resumed successfully", "active": 1 }));
    assert!(app.scheduler.calls().is_empty());

    let (_, body) = app.post_empty(&alice, &pause).await;
    assert_eq!(body, json!({ "message": "Monitor paused successfully", "active": 0 }));
    let (_, body) = app.post_empty(&alice, &pause).await;
    assert_eq!(body["active"], 0);
    assert_eq!(app.scheduler.calls(), vec![SchedulerCall::Stop(id)]);

    app.scheduler.clear();
    let (_, body) = app.post_empty(&alice, &resume).await;
    assert_eq!(body["active"], 1);
    assert_eq!(app.scheduler.calls(), vec![SchedulerCall::Start(id)]);
}

#[tokio::test]
async fn test_failed_start_rolls_back_resume() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;
    let mut body = http_monitor("api");
    body["active"] = json!(false);
    let id = app.create_monitor(&alice, body).await;

    app.scheduler.fail_starts(true);
    let (status, body) = app
        .post_empty(&alice, &format!("/api/v2/monitors/{id}/resume"))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");

    app.scheduler.fail_starts(false);
    let (_, fetched) = app.get(&alice, &format!("/api/v2/monitors/{id}")).await;
    assert_eq!(fetched["active"], 0);
}

#[tokio::test]
async fn test_failed_start_rolls_back_create() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;
    app.scheduler.fail_starts(true);

    let (status, _) = app.post(&alice, "/api/v2/monitors", http_monitor("api")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(Monitor::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_stops_and_removes_dependents() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;
    let id = app.create_monitor(&alice, http_monitor("api")).await;
    insert_heartbeat(&app.db, id, HeartbeatStatus::Up, Utc::now()).await;
    let (status, _) = app
        .post(
            &alice,
            "/api/v2/status-pages",
            json!({ "slug": "public", "title": "Public", "monitorIds": [id] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    app.scheduler.clear();

    let path = format!("/api/v2/monitors/{id}");
    let (status, body) = app.delete(&alice, &path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Monitor deleted successfully");
    assert_eq!(app.scheduler.calls(), vec![SchedulerCall::Stop(id)]);

    let (status, _) = app.get(&alice, &path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let heartbeats = Heartbeat::find()
        .filter(heartbeat::Column::MonitorId.eq(id))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(heartbeats, 0);
    assert_eq!(StatusPageMonitor::find().count(&app.db).await.unwrap(), 0);

    let (_, page) = app.get(&alice, "/api/v2/status-pages/public").await;
    assert_eq!(page["monitors"], json!([]));
}

#[tokio::test]
async fn test_heartbeats_paginate_newest_first() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;
    let id = app.create_monitor(&alice, http_monitor("api")).await;

    let start = Utc::now() - Duration::hours(1);
    let mut ids = Vec::new();
    for minute in 0..5 {
        ids.push(insert_heartbeat(&app.db, id, HeartbeatStatus::Up, start + Duration::minutes(minute)).await);
    }

    let (status, all) = app.get(&alice, &format!("/api/v2/monitors/{id}/heartbeats")).await;
    assert_eq!(status, StatusCode::OK);
    let returned: Vec<i64> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|hb| hb["id"].as_i64().unwrap())
        .collect();
    let expected: Vec<i64> = ids.iter().rev().map(|id| i64::from(*id)).collect();
    assert_eq!(returned, expected);
    assert!(all[0].get("uptime").is_none());

    let (_, page) = app
        .get(&alice, &format!("/api/v2/monitors/{id}/heartbeats?limit=2&offset=1"))
        .await;
    let page_ids: Vec<i64> = page
        .as_array()
        .unwrap()
        .iter()
        .map(|hb| hb["id"].as_i64().unwrap())
        .collect();
    assert_eq!(page_ids, expected[1..3].to_vec());

    let (status, fallback) = app
        .get(&alice, &format!("/api/v2/monitors/{id}/heartbeats?limit=abc"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fallback.as_array().unwrap().len(), 5);

    let (status, oversized) = app
        .get(
            &alice,
            &format!("/api/v2/monitors/{id}/heartbeats?limit=18446744073709551615&offset=18446744073709551615"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(oversized.as_array().unwrap().len(), 5);

    let (status, body) = app
        .get(&alice, &format!("/api/v2/monitors/{id}/heartbeats?limit=1&limit=2"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

fn without_server_fields(mut record: serde_json::Value) -> serde_json::Value {
    let fields = record.as_object_mut().unwrap();
    for key in ["id", "user_id", "latestHeartbeat"] {
        fields.remove(key);
    }
    record
}

#[tokio::test]
async fn test_exported_records_reimport_as_equivalent_monitors() {
    let app = spawn_app().await;
    let alice = caller(&app, "alice").await;
    let bob = caller(&app, "bob").await;

    app.create_monitor(
        &alice,
        json!({
            "name": "site",
            "type": "http",
            "url": "https://example.com",
            "method": "post",
            "headers": { "Accept": "application/json" },
            "weight": 10
        }),
    )
    .await;
    let db_id = app
        .create_monitor(
            &alice,
            json!({ "name": "db", "type": "tcp", "url": "10.0.0.5:5432", "active": 0, "maxretries": 3 }),
        )
        .await;
    insert_heartbeat(&app.db, db_id, HeartbeatStatus::Down, Utc::now()).await;

    let (status, exported) = app.get(&alice, "/api/v2/monitors").await;
    assert_eq!(status, StatusCode::OK);
    let exported: Vec<serde_json::Value> = exported
        .as_array()
        .unwrap()
        .iter()
        .cloned()
        .map(without_server_fields)
        .collect();
    assert_eq!(exported.len(), 2);

    for record in &exported {
        app.create_monitor(&bob, record.clone()).await;
    }

    let (_, imported) = app.get(&bob, "/api/v2/monitors").await;
    let imported: Vec<serde_json::Value> = imported
        .as_array()
        .unwrap()
        .iter()
        .cloned()
        .map(without_server_fields)
        .collect();
    assert_eq!(imported, exported);

    let by_name = |name: &str| imported.iter().find(|m| m["name"] == name).unwrap().clone();
    let site = by_name("site");
    assert_eq!(site["hostname"], json!(null));
    assert_eq!(site["authMethod"], json!(null));
    assert_eq!(site["method"], "POST");
    let db = by_name("db");
    assert_eq!(db["active"], json!(0));
    assert_eq!(db["port"], 5432);
}
