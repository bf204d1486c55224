//! CRUD on monitor rows. Scheduler side effects live in the route handlers.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::db::entities::{
    heartbeat, monitor, monitor_tag, prelude::*, status_page_monitor,
};

pub async fn list_monitors_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<monitor::Model>, DbErr> {
    Monitor::find()
        .filter(monitor::Column::UserId.eq(user_id))
        .order_by_desc(monitor::Column::Weight)
        .order_by_asc(monitor::Column::Name)
        .all(db)
        .await
}

/// Owner-scoped lookup; a monitor owned by someone else is reported as missing.
pub async fn find_monitor_for_user<C: ConnectionTrait>(
    db: &C,
    monitor_id: i32,
    user_id: i32,
) -> Result<Option<monitor::Model>, DbErr> {
    Monitor::find_by_id(monitor_id)
        .filter(monitor::Column::UserId.eq(user_id))
        .one(db)
        .await
}

pub async fn count_monitors_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<u64, DbErr> {
    Monitor::find()
        .filter(monitor::Column::UserId.eq(user_id))
        .count(db)
        .await
}

/// All active monitors regardless of owner, used to bring the scheduler in
/// line with persisted state at startup.
pub async fn list_active_monitors<C: ConnectionTrait>(db: &C) -> Result<Vec<monitor::Model>, DbErr> {
    Monitor::find()
        .filter(monitor::Column::Active.eq(true))
        .all(db)
        .await
}

/// Returns the subset of `monitor_ids` that belongs to `user_id`.
pub async fn filter_owned_monitor_ids<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    monitor_ids: &[i32],
) -> Result<Vec<i32>, DbErr> {
    if monitor_ids.is_empty() {
        return Ok(Vec::new());
    }
    Monitor::find()
        .select_only()
        .column(monitor::Column::Id)
        .filter(monitor::Column::UserId.eq(user_id))
        .filter(monitor::Column::Id.is_in(monitor_ids.iter().copied()))
        .into_tuple::<i32>()
        .all(db)
        .await
}

pub async fn insert_monitor<C: ConnectionTrait>(
    db: &C,
    new_monitor: monitor::ActiveModel,
) -> Result<monitor::Model, DbErr> {
    new_monitor.insert(db).await
}

/// Writes every column of `updated` back to its row.
pub async fn save_monitor<C: ConnectionTrait>(
    db: &C,
    updated: monitor::Model,
) -> Result<monitor::Model, DbErr> {
    updated.into_active_model().reset_all().update(db).await
}

/// Removes a monitor together with its heartbeats and join rows.
pub async fn delete_monitor_with_dependents<C: ConnectionTrait>(
    db: &C,
    monitor_id: i32,
) -> Result<DeleteResult, DbErr> {
    Heartbeat::delete_many()
        .filter(heartbeat::Column::MonitorId.eq(monitor_id))
        .exec(db)
        .await?;
    MonitorTag::delete_many()
        .filter(monitor_tag::Column::MonitorId.eq(monitor_id))
        .exec(db)
        .await?;
    StatusPageMonitor::delete_many()
        .filter(status_page_monitor::Column::MonitorId.eq(monitor_id))
        .exec(db)
        .await?;
    Monitor::delete_by_id(monitor_id).exec(db).await
}
