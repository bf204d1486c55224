use kuma_common::MonitorRecord;
use serde::{Deserialize, Serialize};

use crate::db::entities::status_page;
use crate::db::services::status_page_service::NewStatusPage;
use crate::web::error::ApiError;

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct CreateStatusPageRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, rename = "monitorIds")]
    pub monitor_ids: Vec<i32>,
}

/// Lowercase ASCII letters, digits and single dashes, not at either end.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

impl CreateStatusPageRequest {
    pub fn into_new_status_page(self) -> Result<NewStatusPage, ApiError> {
        let (Some(slug), Some(title)) = (self.slug, self.title) else {
            return Err(ApiError::Validation(
                "Missing required fields: slug, title".to_string(),
            ));
        };
        if slug.is_empty() || title.trim().is_empty() {
            return Err(ApiError::Validation(
                "Missing required fields: slug, title".to_string(),
            ));
        }
        if !is_valid_slug(&slug) {
            return Err(ApiError::Validation(
                "slug may only contain lowercase letters, digits and dashes".to_string(),
            ));
        }

        let mut monitor_ids = self.monitor_ids;
        monitor_ids.sort_unstable();
        monitor_ids.dedup();

        Ok(NewStatusPage {
            slug,
            title,
            description: self.description,
            monitor_ids,
        })
    }
}

#[derive(Serialize, Debug)]
pub struct StatusPageDetails {
    #[serde(flatten)]
    pub page: status_page::Model,
    pub monitors: Vec<MonitorRecord>,
}
