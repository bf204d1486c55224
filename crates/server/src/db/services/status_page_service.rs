use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::db::entities::{monitor, prelude::*, status_page, status_page_monitor};

#[derive(Debug)]
pub struct NewStatusPage {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub monitor_ids: Vec<i32>,
}

pub async fn get_status_pages_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<status_page::Model>, DbErr> {
    StatusPage::find()
        .filter(status_page::Column::UserId.eq(user_id))
        .order_by_asc(status_page::Column::Title)
        .all(db)
        .await
}

pub async fn find_status_page_for_user<C: ConnectionTrait>(
    db: &C,
    slug: &str,
    user_id: i32,
) -> Result<Option<status_page::Model>, DbErr> {
    StatusPage::find()
        .filter(status_page::Column::Slug.eq(slug))
        .filter(status_page::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Slugs are unique across all owners.
pub async fn slug_exists<C: ConnectionTrait>(db: &C, slug: &str) -> Result<bool, DbErr> {
    let count = StatusPage::find()
        .filter(status_page::Column::Slug.eq(slug))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Monitors shown on a status page, ordered by name.
pub async fn get_monitors_for_status_page<C: ConnectionTrait>(
    db: &C,
    status_page_id: i32,
) -> Result<Vec<monitor::Model>, DbErr> {
    Monitor::find()
        .inner_join(StatusPageMonitor)
        .filter(status_page_monitor::Column::StatusPageId.eq(status_page_id))
        .order_by_asc(monitor::Column::Name)
        .all(db)
        .await
}

/// Inserts the page and its monitor links in one transaction.
pub async fn create_status_page<C: TransactionTrait>(
    db: &C,
    user_id: i32,
    page: NewStatusPage,
) -> Result<status_page::Model, DbErr> {
    let txn = db.begin().await?;

    let saved_page = status_page::ActiveModel {
        user_id: Set(user_id),
        slug: Set(page.slug),
        title: Set(page.title),
        description: Set(page.description),
        created_date: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if !page.monitor_ids.is_empty() {
        let links = page
            .monitor_ids
            .into_iter()
            .map(|monitor_id| status_page_monitor::ActiveModel {
                status_page_id: Set(saved_page.id),
                monitor_id: Set(monitor_id),
            });
        StatusPageMonitor::insert_many(links).exec(&txn).await?;
    }

    txn.commit().await?;
    Ok(saved_page)
}
