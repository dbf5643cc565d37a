use crate::domain::value_objects::{ChecklistKey, ItemText, TempItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// サーバー確認前の追加項目の影。
/// 元の呼び出しが成功・失敗のどちらで終わってもオーバーレイから取り除かれる。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OptimisticChecklistItem {
    pub temp_id: TempItemId,
    pub checklist_key: ChecklistKey,
    pub text: String,
    pub completed: bool,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub is_optimistic: bool,
    pub is_pending: bool,
}

impl OptimisticChecklistItem {
    pub fn new(
        checklist_key: ChecklistKey,
        text: &ItemText,
        order: i64,
        created_by: Option<String>,
    ) -> Self {
        Self {
            temp_id: TempItemId::generate(),
            checklist_key,
            text: text.as_str().to_string(),
            completed: false,
            order,
            created_at: Utc::now(),
            created_by,
            is_optimistic: true,
            is_pending: true,
        }
    }
}
