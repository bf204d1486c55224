use chrono::{DateTime, Duration, Utc};
use kuma_common::HeartbeatStatus;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::db::entities::{heartbeat, prelude::*};

pub const DEFAULT_HEARTBEAT_LIMIT: u64 = 100;

/// The most recent heartbeat recorded for a monitor.
pub async fn get_previous_heartbeat<C: ConnectionTrait>(
    db: &C,
    monitor_id: i32,
) -> Result<Option<heartbeat::Model>, DbErr> {
    Heartbeat::find()
        .filter(heartbeat::Column::MonitorId.eq(monitor_id))
        .order_by_desc(heartbeat::Column::Time)
        .order_by_desc(heartbeat::Column::Id)
        .one(db)
        .await
}

/// Newest first.
pub async fn list_heartbeats<C: ConnectionTrait>(
    db: &C,
    monitor_id: i32,
    limit: u64,
    offset: u64,
) -> Result<Vec<heartbeat::Model>, DbErr> {
    Heartbeat::find()
        .filter(heartbeat::Column::MonitorId.eq(monitor_id))
        .order_by_desc(heartbeat::Column::Time)
        .order_by_desc(heartbeat::Column::Id)
        .limit(limit)
        .offset(offset)
        .all(db)
        .await
}

/// Percentage of UP heartbeats recorded since `since`, rounded to two
/// decimals. `None` when there are no heartbeats in the window.
pub async fn get_uptime_since<C: ConnectionTrait>(
    db: &C,
    monitor_id: i32,
    since: DateTime<Utc>,
) -> Result<Option<f64>, DbErr> {
    let window = Heartbeat::find()
        .filter(heartbeat::Column::MonitorId.eq(monitor_id))
        .filter(heartbeat::Column::Time.gte(since));

    let total = window.clone().count(db).await?;
    if total == 0 {
        return Ok(None);
    }
    let up = window
        .filter(heartbeat::Column::Status.eq(HeartbeatStatus::Up.as_i16()))
        .count(db)
        .await?;

    Ok(Some(uptime_percentage(up, total)))
}

pub async fn get_uptime_24h<C: ConnectionTrait>(
    db: &C,
    monitor_id: i32,
) -> Result<Option<f64>, DbErr> {
    get_uptime_since(db, monitor_id, Utc::now() - Duration::hours(24)).await
}

fn uptime_percentage(up: u64, total: u64) -> f64 {
    let ratio = up as f64 / total as f64 * 100.0;
    (ratio * 100.0).round() / 100.0
}
