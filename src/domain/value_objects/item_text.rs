use crate::domain::constants::MAX_ITEM_TEXT_LENGTH;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 前後の空白を除去済みの項目テキスト。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemText(String);

impl ItemText {
    pub fn new(value: &str) -> Result<Self, String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("Item text cannot be empty".to_string());
        }
        if trimmed.chars().count() > MAX_ITEM_TEXT_LENGTH {
            return Err(format!(
                "Item text must be at most {MAX_ITEM_TEXT_LENGTH} characters"
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ItemText> for String {
    fn from(value: ItemText) -> Self {
        value.0
    }
}
