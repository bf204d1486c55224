use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::db::entities::{maintenance, prelude::*};

#[derive(Debug)]
pub struct NewMaintenance {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Inserts a maintenance window; `created_date` is always the server clock.
pub async fn create_maintenance<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    window: NewMaintenance,
) -> Result<maintenance::Model, DbErr> {
    maintenance::ActiveModel {
        user_id: Set(user_id),
        title: Set(window.title),
        description: Set(window.description),
        start_date: Set(window.start_date),
        end_date: Set(window.end_date),
        created_date: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Newest first by creation time.
pub async fn get_maintenance_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<maintenance::Model>, DbErr> {
    Maintenance::find()
        .filter(maintenance::Column::UserId.eq(user_id))
        .order_by_desc(maintenance::Column::CreatedDate)
        .order_by_desc(maintenance::Column::Id)
        .all(db)
        .await
}
