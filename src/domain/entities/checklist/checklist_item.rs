use crate::domain::value_objects::{ChecklistItemId, ChecklistKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// サーバーで確定済みのチェックリスト項目。
/// クライアントは直接変更せず、必ずゲートウェイ経由の往復で更新する。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub checklist_key: ChecklistKey,
    pub text: String,
    pub completed: bool,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub completed_by: Option<String>,
}

impl ChecklistItem {
    pub fn new(
        checklist_key: ChecklistKey,
        text: String,
        order: i64,
        created_by: Option<String>,
    ) -> Self {
        Self {
            id: ChecklistItemId::generate(),
            checklist_key,
            text,
            completed: false,
            order,
            created_at: Utc::now(),
            completed_at: None,
            created_by,
            completed_by: None,
        }
    }
}

/// 並び替え要求の1要素
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemOrder {
    pub item_id: ChecklistItemId,
    pub new_order: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClearCompletedResult {
    pub deleted_count: u32,
}
