use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Community group card. Purely presentational: membership is a display count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub members: i64,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub members: i64,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub members: Option<i64>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub image: Option<Option<String>>,
}

impl NewGroup {
    pub fn validate(&self) -> AppResult<()> {
        validate_group(Some(&self.name), Some(self.members))
    }
}

impl GroupUpdate {
    pub fn validate(&self) -> AppResult<()> {
        validate_group(self.name.as_deref(), self.members)
    }
}

fn validate_group(name: Option<&str>, members: Option<i64>) -> AppResult<()> {
    if matches!(name, Some(n) if n.trim().is_empty()) {
        return Err(AppError::Validation("group name is required".to_string()));
    }
    if matches!(members, Some(m) if m < 0) {
        return Err(AppError::Validation("members cannot be negative".to_string()));
    }
    Ok(())
}
