use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::db::services::maintenance_service::NewMaintenance;
use crate::web::error::ApiError;

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct CreateMaintenanceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Accepts RFC 3339 or a bare `YYYY-MM-DD HH:MM:SS`, which is read as UTC.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, ApiError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            ApiError::Validation(format!(
                "{field} must be an RFC 3339 timestamp or 'YYYY-MM-DD HH:MM:SS'"
            ))
        })
}

impl CreateMaintenanceRequest {
    pub fn into_new_maintenance(self) -> Result<NewMaintenance, ApiError> {
        let (Some(title), Some(start), Some(end)) = (self.title, self.start_date, self.end_date)
        else {
            return Err(ApiError::Validation(
                "Missing required fields: title, start_date, end_date".to_string(),
            ));
        };
        if title.trim().is_empty() || start.trim().is_empty() || end.trim().is_empty() {
            return Err(ApiError::Validation(
                "Missing required fields: title, start_date, end_date".to_string(),
            ));
        }

        let start_date = parse_timestamp("start_date", &start)?;
        let end_date = parse_timestamp("end_date", &end)?;
        if end_date < start_date {
            return Err(ApiError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }

        Ok(NewMaintenance {
            title,
            description: self.description,
            start_date,
            end_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_both_formats() {
        let rfc = parse_timestamp("start_date", "2024-06-01T02:00:00+02:00").unwrap();
        let plain = parse_timestamp("start_date", "2024-06-01 00:00:00").unwrap();
        assert_eq!(rfc, plain);
        assert!(parse_timestamp("start_date", "tomorrow").is_err());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let request: CreateMaintenanceRequest = serde_json::from_value(json!({
            "title": "DB upgrade",
            "start_date": "2024-06-02 00:00:00",
            "end_date": "2024-06-01 00:00:00"
        }))
        .unwrap();
        assert!(matches!(
            request.into_new_maintenance(),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_fields() {
        let request: CreateMaintenanceRequest =
            serde_json::from_value(json!({ "title": "DB upgrade" })).unwrap();
        let err = request.into_new_maintenance().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: title, start_date, end_date"
        );
    }
}
