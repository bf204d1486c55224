use chrono::{DateTime, Utc};
use kuma_common::{HeartbeatRecord, HeartbeatStatus, MonitorRecord, MonitorType};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, IntoActiveModel};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::db::entities::{heartbeat, monitor};
use crate::web::error::ApiError;

pub const DEFAULT_INTERVAL_SECONDS: i32 = 60;
pub const DEFAULT_RETRY_INTERVAL_SECONDS: i32 = 60;
pub const DEFAULT_MAX_RETRIES: i32 = 0;
pub const DEFAULT_WEIGHT: i32 = 2000;
pub const DEFAULT_METHOD: &str = "GET";

/// Distinguishes an explicit `null` (clear the column) from an absent key.
fn explicit<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Writable monitor fields, shared by create (POST) and update (PUT).
///
/// Unknown keys are rejected. The server-assigned keys of the monitor
/// projection are accepted and dropped so a fetched or exported record can be
/// sent back unchanged.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct MonitorPayload {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub monitor_type: Option<String>,
    pub url: Option<String>,
    #[serde(default, deserialize_with = "explicit")]
    pub hostname: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub port: Option<Option<i32>>,
    pub interval: Option<i32>,
    #[serde(rename = "retryInterval")]
    pub retry_interval: Option<i32>,
    pub maxretries: Option<i32>,
    pub weight: Option<i32>,
    #[serde(default, with = "kuma_common::flag::option")]
    pub active: Option<bool>,
    pub method: Option<String>,
    #[serde(default, deserialize_with = "explicit")]
    pub keyword: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub headers: Option<Option<Value>>,
    #[serde(default, deserialize_with = "explicit")]
    pub body: Option<Option<String>>,
    #[serde(default, rename = "authMethod", deserialize_with = "explicit")]
    pub auth_method: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub basic_auth_user: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub basic_auth_pass: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub description: Option<Option<String>>,

    #[allow(dead_code)]
    #[serde(default, rename = "id")]
    read_only_id: Option<Value>,
    #[allow(dead_code)]
    #[serde(default, rename = "user_id")]
    read_only_user_id: Option<Value>,
    #[allow(dead_code)]
    #[serde(default, rename = "latestHeartbeat")]
    read_only_latest_heartbeat: Option<Value>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// The scheduler ticks every `interval` seconds, so zero and negatives are refused.
fn check_interval(field: &str, value: Option<i32>) -> Result<(), ApiError> {
    match value {
        Some(seconds) if seconds <= 0 => Err(ApiError::Validation(format!(
            "{field} must be a positive number of seconds"
        ))),
        _ => Ok(()),
    }
}

fn headers_to_text(headers: Option<Value>) -> Option<String> {
    headers.map(|value| value.to_string())
}

/// Splits `host:port`, tolerating bracketed IPv6 hosts.
fn split_host_port(target: &str) -> Option<(String, i32)> {
    let (host, port) = target.rsplit_once(':')?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let port: u16 = port.parse().ok()?;
    if host.is_empty() || port == 0 {
        return None;
    }
    Some((host.to_string(), i32::from(port)))
}

/// Fills hostname/port of host-based monitors from `url` when not given. A
/// tcp target without a port keeps the whole url as its hostname.
fn derive_host_fields(model: &mut monitor::Model) {
    match model.monitor_type.parse::<MonitorType>() {
        Ok(MonitorType::Tcp) if model.hostname.is_none() => match split_host_port(&model.url) {
            Some((host, port)) => {
                model.hostname = Some(host);
                if model.port.is_none() {
                    model.port = Some(port);
                }
            }
            None => model.hostname = Some(model.url.clone()),
        },
        Ok(MonitorType::Ping) if model.hostname.is_none() => {
            model.hostname = Some(model.url.clone());
        }
        _ => {}
    }
}

impl MonitorPayload {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(kind) = &self.monitor_type {
            kind.parse::<MonitorType>().map_err(ApiError::Validation)?;
        }
        for (field, value) in [("name", &self.name), ("url", &self.url), ("method", &self.method)] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(ApiError::Validation(format!("{field} must not be empty")));
            }
        }
        check_interval("interval", self.interval)?;
        check_interval("retryInterval", self.retry_interval)?;
        if let Some(Some(port)) = self.port {
            if !(1..=65535).contains(&port) {
                return Err(ApiError::Validation(
                    "port must be between 1 and 65535".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Builds the row for a new monitor, applying defaults to unset fields.
    pub fn into_new_monitor(
        self,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<monitor::ActiveModel, ApiError> {
        let (Some(name), Some(monitor_type), Some(url)) = (
            non_empty(&self.name),
            non_empty(&self.monitor_type),
            non_empty(&self.url),
        ) else {
            return Err(ApiError::Validation(
                "Missing required fields: name, type, url".to_string(),
            ));
        };
        self.validate()?;

        let mut model = monitor::Model {
            id: 0,
            user_id,
            name: name.to_string(),
            monitor_type: monitor_type.to_string(),
            url: url.to_string(),
            hostname: self.hostname.flatten(),
            port: self.port.flatten(),
            interval: self.interval.unwrap_or(DEFAULT_INTERVAL_SECONDS),
            retry_interval: self.retry_interval.unwrap_or(DEFAULT_RETRY_INTERVAL_SECONDS),
            maxretries: self.maxretries.unwrap_or(DEFAULT_MAX_RETRIES),
            weight: self.weight.unwrap_or(DEFAULT_WEIGHT),
            active: self.active.unwrap_or(true),
            method: self
                .method
                .map(|m| m.to_ascii_uppercase())
                .unwrap_or_else(|| DEFAULT_METHOD.to_string()),
            keyword: self.keyword.flatten(),
            headers: headers_to_text(self.headers.flatten()),
            body: self.body.flatten(),
            auth_method: self.auth_method.flatten(),
            basic_auth_user: self.basic_auth_user.flatten(),
            basic_auth_pass: self.basic_auth_pass.flatten(),
            description: self.description.flatten(),
            created_date: now,
        };
        derive_host_fields(&mut model);

        let mut new_monitor = model.into_active_model().reset_all();
        new_monitor.id = NotSet;
        Ok(new_monitor)
    }

    /// Applies a partial update. `id`, `user_id` and `created_date` are never
    /// touched.
    pub fn apply_to(self, model: &mut monitor::Model) -> Result<(), ApiError> {
        self.validate()?;

        let target_changed = self.url.is_some() || self.monitor_type.is_some();
        let hostname_given = self.hostname.is_some();
        let port_given = self.port.is_some();

        if let Some(name) = self.name {
            model.name = name;
        }
        if let Some(monitor_type) = self.monitor_type {
            model.monitor_type = monitor_type;
        }
        if let Some(url) = self.url {
            model.url = url;
        }
        if let Some(hostname) = self.hostname {
            model.hostname = hostname;
        }
        if let Some(port) = self.port {
            model.port = port;
        }
        if let Some(interval) = self.interval {
            model.interval = interval;
        }
        if let Some(retry_interval) = self.retry_interval {
            model.retry_interval = retry_interval;
        }
        if let Some(maxretries) = self.maxretries {
            model.maxretries = maxretries;
        }
        if let Some(weight) = self.weight {
            model.weight = weight;
        }
        if let Some(active) = self.active {
            model.active = active;
        }
        if let Some(method) = self.method {
            model.method = method.to_ascii_uppercase();
        }
        if let Some(keyword) = self.keyword {
            model.keyword = keyword;
        }
        if let Some(headers) = self.headers {
            model.headers = headers_to_text(headers);
        }
        if let Some(body) = self.body {
            model.body = body;
        }
        if let Some(auth_method) = self.auth_method {
            model.auth_method = auth_method;
        }
        if let Some(basic_auth_user) = self.basic_auth_user {
            model.basic_auth_user = basic_auth_user;
        }
        if let Some(basic_auth_pass) = self.basic_auth_pass {
            model.basic_auth_pass = basic_auth_pass;
        }
        if let Some(description) = self.description {
            model.description = description;
        }

        // A new target invalidates host fields that were derived from the old one.
        if target_changed && !hostname_given {
            model.hostname = None;
            if !port_given {
                model.port = None;
            }
        }
        derive_host_fields(model);
        Ok(())
    }
}

pub fn heartbeat_record(
    model: heartbeat::Model,
    uptime: Option<f64>,
) -> Result<HeartbeatRecord, ApiError> {
    let status = HeartbeatStatus::try_from(model.status).map_err(|raw| {
        ApiError::Internal(format!(
            "heartbeat {} has unknown status {raw}",
            model.id
        ))
    })?;
    Ok(HeartbeatRecord {
        id: model.id,
        monitor_id: model.monitor_id,
        status,
        msg: model.msg,
        ping: model.ping,
        time: model.time,
        uptime,
    })
}

pub fn monitor_record(model: monitor::Model, latest_heartbeat: Option<HeartbeatRecord>) -> MonitorRecord {
    let headers = model
        .headers
        .as_deref()
        .and_then(|text| serde_json::from_str(text).ok());
    MonitorRecord {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        monitor_type: model.monitor_type,
        url: model.url,
        hostname: model.hostname,
        port: model.port,
        interval: model.interval,
        retry_interval: model.retry_interval,
        maxretries: model.maxretries,
        weight: model.weight,
        active: model.active,
        method: model.method,
        keyword: model.keyword,
        headers,
        body: model.body,
        auth_method: model.auth_method,
        basic_auth_user: model.basic_auth_user,
        basic_auth_pass: model.basic_auth_pass,
        description: model.description,
        latest_heartbeat,
    }
}
