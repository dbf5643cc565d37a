use super::ChecklistEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistStats {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    /// サーバー未確認の追加項目数
    pub pending: usize,
    pub completion_percent: u8,
}

impl ChecklistStats {
    pub fn from_entries(entries: &[ChecklistEntry]) -> Self {
        let total = entries.len();
        let pending = entries.iter().filter(|e| e.is_optimistic).count();
        let completed = entries
            .iter()
            .filter(|e| !e.is_optimistic && e.completed)
            .count();
        let completion_percent = if total == 0 {
            0
        } else {
            ((completed * 100) / total) as u8
        };

        Self {
            total,
            completed,
            remaining: total - completed,
            pending,
            completion_percent,
        }
    }

    pub fn is_all_done(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}
