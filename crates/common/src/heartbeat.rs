use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Result of a single check, stored as a small integer by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeartbeatStatus {
    Down = 0,
    Up = 1,
    Pending = 2,
    Maintenance = 3,
}

impl HeartbeatStatus {
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    pub fn label(self) -> &'static str {
        match self {
            HeartbeatStatus::Down => "DOWN",
            HeartbeatStatus::Up => "UP",
            HeartbeatStatus::Pending => "PENDING",
            HeartbeatStatus::Maintenance => "MAINTENANCE",
        }
    }
}

impl TryFrom<i16> for HeartbeatStatus {
    type Error = i16;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HeartbeatStatus::Down),
            1 => Ok(HeartbeatStatus::Up),
            2 => Ok(HeartbeatStatus::Pending),
            3 => Ok(HeartbeatStatus::Maintenance),
            other => Err(other),
        }
    }
}

impl fmt::Display for HeartbeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for HeartbeatStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i16(self.as_i16())
    }
}

impl<'de> Deserialize<'de> for HeartbeatStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i16::deserialize(deserializer)?;
        HeartbeatStatus::try_from(raw)
            .map_err(|value| de::Error::custom(format!("unknown heartbeat status {value}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatRecord {
    pub id: i32,
    pub monitor_id: i32,
    pub status: HeartbeatStatus,
    #[serde(default)]
    pub msg: Option<String>,
    /// Response time in milliseconds.
    #[serde(default)]
    pub ping: Option<f64>,
    pub time: DateTime<Utc>,
    /// Share of UP checks over the last 24 hours, only set on `latestHeartbeat`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_is_numeric_on_the_wire() {
        assert_eq!(serde_json::to_value(HeartbeatStatus::Maintenance).unwrap(), json!(3));
        let status: HeartbeatStatus = serde_json::from_value(json!(0)).unwrap();
        assert_eq!(status, HeartbeatStatus::Down);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(serde_json::from_value::<HeartbeatStatus>(json!(9)).is_err());
        assert_eq!(HeartbeatStatus::try_from(-1), Err(-1));
    }

    #[test]
    fn test_uptime_only_serialized_when_present() {
        let record = HeartbeatRecord {
            id: 1,
            monitor_id: 2,
            status: HeartbeatStatus::Up,
            msg: Some("200 - OK".to_string()),
            ping: Some(42.0),
            time: "2024-05-01T10:00:00Z".parse().unwrap(),
            uptime: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("uptime").is_none());
        assert_eq!(value["status"], json!(1));
    }
}
