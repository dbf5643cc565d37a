use serde::{Deserialize, Serialize};
use std::fmt;

/// サーバーで確定済みのチェックリスト項目ID。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChecklistItemId(String);

impl ChecklistItemId {
    pub fn new(value: String) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err("Checklist item ID cannot be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for ChecklistItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ChecklistItemId> for String {
    fn from(value: ChecklistItemId) -> Self {
        value.0
    }
}
