use crate::domain::entities::{ChecklistEntry, ChecklistItem, ItemOrder, OptimisticChecklistItem};
use crate::domain::value_objects::ChecklistItemId;
use std::collections::{HashMap, HashSet};

use super::overlay::ToggleOverride;

/// サーバースナップショットとオーバーレイから表示用の一覧を組み立てる。
///
/// 純粋関数で、同じ入力には同じ出力を返す。`order` が同値の行は安定ソートにより
/// 確定済み項目（スナップショット順）→ 楽観的追加（作成順）の順に並ぶ。
/// 削除中の項目は除外し、スナップショット内で重複したIDは最初の1件だけを残す。
pub fn merge_checklist_view(
    server_items: &[ChecklistItem],
    deleting_ids: &HashSet<ChecklistItemId>,
    toggle_overrides: &HashMap<ChecklistItemId, ToggleOverride>,
    optimistic_inserts: &[OptimisticChecklistItem],
) -> Vec<ChecklistEntry> {
    let mut seen: HashSet<&ChecklistItemId> = HashSet::with_capacity(server_items.len());
    let mut entries: Vec<ChecklistEntry> =
        Vec::with_capacity(server_items.len() + optimistic_inserts.len());

    for item in server_items {
        if deleting_ids.contains(&item.id) || !seen.insert(&item.id) {
            continue;
        }
        let entry = match toggle_overrides.get(&item.id) {
            Some(over) => ChecklistEntry::confirmed(item, over.completed, true),
            None => ChecklistEntry::confirmed(item, item.completed, false),
        };
        entries.push(entry);
    }

    entries.extend(optimistic_inserts.iter().map(ChecklistEntry::optimistic));
    entries.sort_by_key(|entry| entry.order);
    entries
}

/// ドラッグ後の全確定項目の並びを 0..n-1 で振り直す。
/// `dragged` が `confirmed_ids` に無ければ `None`。
pub fn compute_reorder(
    confirmed_ids: &[ChecklistItemId],
    dragged: &ChecklistItemId,
    target_index: usize,
) -> Option<Vec<ItemOrder>> {
    let from = confirmed_ids.iter().position(|id| id == dragged)?;

    let mut ids: Vec<ChecklistItemId> = confirmed_ids.to_vec();
    let moved = ids.remove(from);
    let target = target_index.min(ids.len());
    ids.insert(target, moved);

    Some(
        ids.into_iter()
            .enumerate()
            .map(|(index, item_id)| ItemOrder {
                item_id,
                new_order: index as i64,
            })
            .collect(),
    )
}
