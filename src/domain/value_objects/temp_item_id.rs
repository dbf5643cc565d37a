use crate::domain::constants::TEMP_ID_PREFIX;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 楽観的追加のためにクライアント側で採番する一時ID。
/// サーバーのIDと衝突しないよう `temp-` 接頭辞を持つ。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TempItemId(String);

impl TempItemId {
    pub fn generate() -> Self {
        Self(format!("{TEMP_ID_PREFIX}{}", uuid::Uuid::new_v4()))
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        if !value.starts_with(TEMP_ID_PREFIX) || value.len() == TEMP_ID_PREFIX.len() {
            return Err(format!("Temporary ID must start with '{TEMP_ID_PREFIX}'"));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TempItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
