use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::db::entities::{prelude::*, tag};

/// Creates a new tag for a user.
pub async fn create_tag<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    name: &str,
    color: &str,
) -> Result<tag::Model, DbErr> {
    tag::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_string()),
        color: Set(color.to_string()),
        created_date: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Retrieves all tags for a user, ordered by name.
pub async fn get_tags_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<tag::Model>, DbErr> {
    Tag::find()
        .filter(tag::Column::UserId.eq(user_id))
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await
}
