use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// チェックリストを識別するキー（ページやセッション単位で共有される）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChecklistKey(String);

impl ChecklistKey {
    pub fn new(value: String) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        Self::validate(value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err("Checklist key cannot be empty".to_string());
        }
        if value.len() > 128 {
            return Err("Checklist key is too long".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for ChecklistKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ChecklistKey> for String {
    fn from(key: ChecklistKey) -> Self {
        key.0
    }
}

impl FromStr for ChecklistKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
