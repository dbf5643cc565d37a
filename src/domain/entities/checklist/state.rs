use super::ChecklistItem;
use crate::domain::value_objects::ChecklistKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `get_checklist_state` の結果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistState {
    pub key: ChecklistKey,
    pub exists: bool,
    pub is_active: bool,
    pub title: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub concluded_at: Option<DateTime<Utc>>,
}

impl ChecklistState {
    pub fn missing(key: ChecklistKey) -> Self {
        Self {
            key,
            exists: false,
            is_active: false,
            title: None,
            created_at: None,
            concluded_at: None,
        }
    }

    pub fn lifecycle(&self) -> ChecklistLifecycle {
        ChecklistLifecycle::from_flags(self.exists, self.is_active)
    }
}

/// nonexistent → active ⇄ concluded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistLifecycle {
    Nonexistent,
    Active,
    Concluded,
}

impl ChecklistLifecycle {
    pub fn from_flags(exists: bool, is_active: bool) -> Self {
        match (exists, is_active) {
            (false, _) => Self::Nonexistent,
            (true, true) => Self::Active,
            (true, false) => Self::Concluded,
        }
    }

    pub fn can_transition_to(self, next: ChecklistLifecycle) -> bool {
        matches!(
            (self, next),
            (Self::Nonexistent, Self::Active)
                | (Self::Active, Self::Concluded)
                | (Self::Concluded, Self::Active)
        )
    }

    pub fn accepts_item_changes(self) -> bool {
        self == Self::Active
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nonexistent => "nonexistent",
            Self::Active => "active",
            Self::Concluded => "concluded",
        }
    }
}

/// サーバーから押し込まれる1キー分のスナップショット
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistSnapshot {
    pub state: ChecklistState,
    pub items: Vec<ChecklistItem>,
}
