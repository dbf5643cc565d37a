use crate::domain::constants::MAX_ATTENDEE_NAME_LENGTH;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttendeeName(String);

impl AttendeeName {
    pub fn new(value: &str) -> Result<Self, String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("Attendee name cannot be empty".to_string());
        }
        if trimmed.chars().count() > MAX_ATTENDEE_NAME_LENGTH {
            return Err(format!(
                "Attendee name must be at most {MAX_ATTENDEE_NAME_LENGTH} characters"
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 同一人物判定用のキー（大文字小文字と連続空白を無視）
    pub fn normalized(&self) -> String {
        self.0
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

impl fmt::Display for AttendeeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_ignores_case_and_spacing() {
        let a = AttendeeName::new("Ada  Lovelace").unwrap();
        let b = AttendeeName::new(" ada lovelace ").unwrap();
        assert_eq!(a.normalized(), b.normalized());
        assert_eq!(b.as_str(), "ada lovelace");
    }

    #[test]
    fn rejects_blank_names() {
        assert!(AttendeeName::new("   ").is_err());
    }
}
