use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::heartbeat::HeartbeatRecord;

/// Kinds of checks the host scheduler knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MonitorType {
    Http,
    Keyword,
    JsonQuery,
    Ping,
    Tcp,
    Dns,
    Push,
    Docker,
}

impl MonitorType {
    pub const ALL: [MonitorType; 8] = [
        MonitorType::Http,
        MonitorType::Keyword,
        MonitorType::JsonQuery,
        MonitorType::Ping,
        MonitorType::Tcp,
        MonitorType::Dns,
        MonitorType::Push,
        MonitorType::Docker,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MonitorType::Http => "http",
            MonitorType::Keyword => "keyword",
            MonitorType::JsonQuery => "json-query",
            MonitorType::Ping => "ping",
            MonitorType::Tcp => "tcp",
            MonitorType::Dns => "dns",
            MonitorType::Push => "push",
            MonitorType::Docker => "docker",
        }
    }
}

impl fmt::Display for MonitorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonitorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonitorType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = MonitorType::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown monitor type '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// JSON projection of a monitor.
///
/// Apart from `id`, `user_id` and `latestHeartbeat`, every field is writable
/// through the create/update endpoints, so a record with those three removed
/// is a valid create body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorRecord {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub monitor_type: String,
    pub url: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub port: Option<i32>,
    pub interval: i32,
    #[serde(rename = "retryInterval")]
    pub retry_interval: i32,
    pub maxretries: i32,
    pub weight: i32,
    #[serde(with = "crate::flag")]
    pub active: bool,
    pub method: String,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub headers: Option<Value>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, rename = "authMethod")]
    pub auth_method: Option<String>,
    #[serde(default)]
    pub basic_auth_user: Option<String>,
    #[serde(default)]
    pub basic_auth_pass: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "latestHeartbeat")]
    pub latest_heartbeat: Option<HeartbeatRecord>,
}

impl MonitorRecord {
    /// Address shown to humans: the url, or the hostname for host-based checks.
    pub fn target(&self) -> &str {
        if !self.url.is_empty() {
            &self.url
        } else {
            self.hostname.as_deref().unwrap_or("-")
        }
    }
}
