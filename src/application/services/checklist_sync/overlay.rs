use super::merge::merge_checklist_view;
use crate::domain::entities::{ChecklistEntry, ChecklistItem, OptimisticChecklistItem};
use crate::domain::value_objects::{ChecklistItemId, TempItemId};
use std::collections::{HashMap, HashSet};

/// 完了状態の上書き。`generation` は同じ項目への後続トグルを見分けるために使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOverride {
    pub completed: bool,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub dropped_overrides: usize,
    pub pruned_deletions: usize,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.dropped_overrides == 0 && self.pruned_deletions == 0
    }
}

/// サーバー未確認の変更を保持するオーバーレイ。
///
/// 1チェックリストにつき1つ、`ChecklistSyncService` だけが所有する。
/// ここでのメソッドはすべて同期的で、ネットワーク待ちの間にロックを保持しない前提。
#[derive(Debug, Clone, Default)]
pub struct ChecklistOverlay {
    optimistic_inserts: Vec<OptimisticChecklistItem>,
    deleting_ids: HashSet<ChecklistItemId>,
    toggle_overrides: HashMap<ChecklistItemId, ToggleOverride>,
    next_generation: u64,
    last_failed_text: Option<String>,
}

impl ChecklistOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&self, server_items: &[ChecklistItem]) -> Vec<ChecklistEntry> {
        merge_checklist_view(
            server_items,
            &self.deleting_ids,
            &self.toggle_overrides,
            &self.optimistic_inserts,
        )
    }

    /// 確定済み・楽観的追加の両方を見た最大 order + 1（空なら 0）
    pub fn next_order(&self, server_items: &[ChecklistItem]) -> i64 {
        server_items
            .iter()
            .map(|item| item.order)
            .chain(self.optimistic_inserts.iter().map(|item| item.order))
            .max()
            .map_or(0, |max| max + 1)
    }

    pub fn begin_insert(&mut self, item: OptimisticChecklistItem) {
        self.optimistic_inserts.push(item);
    }

    /// 成功・失敗どちらの場合も呼ぶ。取り除いた場合は true
    pub fn settle_insert(&mut self, temp_id: &TempItemId) -> bool {
        let before = self.optimistic_inserts.len();
        self.optimistic_inserts.retain(|item| &item.temp_id != temp_id);
        before != self.optimistic_inserts.len()
    }

    pub fn record_failed_text(&mut self, text: &str) {
        self.last_failed_text = Some(text.to_string());
    }

    pub fn clear_failed_text(&mut self) {
        self.last_failed_text = None;
    }

    pub fn last_failed_text(&self) -> Option<&str> {
        self.last_failed_text.as_deref()
    }

    pub fn take_failed_text(&mut self) -> Option<String> {
        self.last_failed_text.take()
    }

    pub fn begin_toggle(&mut self, item_id: ChecklistItemId, completed: bool) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.toggle_overrides.insert(
            item_id,
            ToggleOverride {
                completed,
                generation,
            },
        );
        generation
    }

    /// 後から別のトグルが上書きしていれば何もしない
    pub fn settle_toggle(&mut self, item_id: &ChecklistItemId, generation: u64) -> bool {
        match self.toggle_overrides.get(item_id) {
            Some(current) if current.generation == generation => {
                self.toggle_overrides.remove(item_id);
                true
            }
            _ => false,
        }
    }

    pub fn is_deleting(&self, item_id: &ChecklistItemId) -> bool {
        self.deleting_ids.contains(item_id)
    }

    /// 新たに削除中になったIDだけを返す
    pub fn begin_delete<I>(&mut self, item_ids: I) -> Vec<ChecklistItemId>
    where
        I: IntoIterator<Item = ChecklistItemId>,
    {
        item_ids
            .into_iter()
            .filter(|id| self.deleting_ids.insert(id.clone()))
            .collect()
    }

    pub fn rollback_delete(&mut self, item_ids: &[ChecklistItemId]) {
        for id in item_ids {
            self.deleting_ids.remove(id);
        }
    }

    /// 新しいスナップショット到着時の整合処理。
    ///
    /// - サーバーの値と一致した、または項目が消えた上書きを捨てる
    /// - スナップショットに存在しなくなった削除中IDを捨てる
    pub fn reconcile(&mut self, server_items: &[ChecklistItem]) -> ReconcileReport {
        let server_state: HashMap<&ChecklistItemId, bool> = server_items
            .iter()
            .map(|item| (&item.id, item.completed))
            .collect();

        let overrides_before = self.toggle_overrides.len();
        self.toggle_overrides.retain(|id, over| {
            matches!(server_state.get(id), Some(&completed) if completed != over.completed)
        });

        let deletions_before = self.deleting_ids.len();
        self.deleting_ids.retain(|id| server_state.contains_key(id));

        ReconcileReport {
            dropped_overrides: overrides_before - self.toggle_overrides.len(),
            pruned_deletions: deletions_before - self.deleting_ids.len(),
        }
    }

    pub fn optimistic_inserts(&self) -> &[OptimisticChecklistItem] {
        &self.optimistic_inserts
    }

    pub fn deleting_ids(&self) -> &HashSet<ChecklistItemId> {
        &self.deleting_ids
    }

    pub fn toggle_overrides(&self) -> &HashMap<ChecklistItemId, ToggleOverride> {
        &self.toggle_overrides
    }

    pub fn is_empty(&self) -> bool {
        self.optimistic_inserts.is_empty()
            && self.deleting_ids.is_empty()
            && self.toggle_overrides.is_empty()
    }
}
