use serde::Deserialize;

use crate::web::error::ApiError;

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct CreateTagRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl CreateTagRequest {
    /// Returns `(name, color)` once both are present and non-empty.
    pub fn into_parts(self) -> Result<(String, String), ApiError> {
        match (self.name, self.color) {
            (Some(name), Some(color)) if !name.trim().is_empty() && !color.trim().is_empty() => {
                Ok((name, color))
            }
            _ => Err(ApiError::Validation(
                "Missing required fields: name, color".to_string(),
            )),
        }
    }
}
