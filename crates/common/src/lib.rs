//! Wire types shared by the API server and the command-line client.
//!
//! Everything in here is the JSON projection of the host application's
//! records; nothing in this crate touches storage or HTTP.

pub mod flag;
pub mod heartbeat;
pub mod monitor;
pub mod responses;

pub use heartbeat::{HeartbeatRecord, HeartbeatStatus};
pub use monitor::{MonitorRecord, MonitorType};
pub use responses::{ErrorBody, MessageResponse, MonitorStateResponse, SystemInfo};

/// Versioned prefix the API router is mounted under.
pub const API_PREFIX: &str = "/api/v2";
