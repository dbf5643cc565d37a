use super::{ChecklistItem, OptimisticChecklistItem};
use crate::domain::value_objects::{ChecklistItemId, TempItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 表示用ビュー内の識別子。確定済みか楽観的かを型で区別する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum EntryId {
    Confirmed(ChecklistItemId),
    Optimistic(TempItemId),
}

impl EntryId {
    pub fn as_confirmed(&self) -> Option<&ChecklistItemId> {
        match self {
            EntryId::Confirmed(id) => Some(id),
            EntryId::Optimistic(_) => None,
        }
    }

    pub fn is_optimistic(&self) -> bool {
        matches!(self, EntryId::Optimistic(_))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Confirmed(id) => write!(f, "{id}"),
            EntryId::Optimistic(id) => write!(f, "{id}"),
        }
    }
}

impl From<ChecklistItemId> for EntryId {
    fn from(id: ChecklistItemId) -> Self {
        EntryId::Confirmed(id)
    }
}

/// マージ済みビューの1行
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistEntry {
    pub id: EntryId,
    pub text: String,
    pub completed: bool,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub completed_by: Option<String>,
    pub is_optimistic: bool,
    pub is_pending: bool,
}

impl ChecklistEntry {
    pub(crate) fn confirmed(item: &ChecklistItem, completed: bool, is_pending: bool) -> Self {
        Self {
            id: EntryId::Confirmed(item.id.clone()),
            text: item.text.clone(),
            completed,
            order: item.order,
            created_at: item.created_at,
            completed_at: item.completed_at,
            created_by: item.created_by.clone(),
            completed_by: item.completed_by.clone(),
            is_optimistic: false,
            is_pending,
        }
    }

    pub(crate) fn optimistic(item: &OptimisticChecklistItem) -> Self {
        Self {
            id: EntryId::Optimistic(item.temp_id.clone()),
            text: item.text.clone(),
            completed: item.completed,
            order: item.order,
            created_at: item.created_at,
            completed_at: None,
            created_by: item.created_by.clone(),
            completed_by: None,
            is_optimistic: item.is_optimistic,
            is_pending: item.is_pending,
        }
    }
}
