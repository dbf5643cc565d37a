use crate::domain::value_objects::ChecklistKey;
use serde::Serialize;

/// ビューの再計算が必要になった理由
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCause {
    SnapshotApplied,
    InsertStarted,
    InsertSettled,
    ToggleStarted,
    ToggleSettled,
    DeleteStarted,
    DeleteSettled,
    FailedTextCleared,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChecklistChange {
    pub key: ChecklistKey,
    pub cause: ChangeCause,
}
