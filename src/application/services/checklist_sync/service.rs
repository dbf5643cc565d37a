use super::events::{ChangeCause, ChecklistChange};
use super::merge::compute_reorder;
use super::overlay::{ChecklistOverlay, ReconcileReport};
use crate::application::ports::{ChecklistGateway, SyncNotification, SyncNotifier};
use crate::application::services::sync_error::{SyncError, SyncResult};
use crate::domain::constants::DEFAULT_CHECKLIST_TITLE;
use crate::domain::entities::{
    ChecklistEntry, ChecklistItem, ChecklistLifecycle, ChecklistSnapshot, ChecklistState,
    ChecklistStats, EntryId, OptimisticChecklistItem,
};
use crate::domain::value_objects::{ChecklistItemId, ChecklistKey, ItemText};
use crate::shared::config::SyncConfig;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// 完了済み項目が無く、リモート呼び出しもしなかった
    NothingToClear,
    Cleared { deleted_count: u32 },
}

#[derive(Debug, Default)]
struct SyncState {
    /// 最初のスナップショットを受け取るまでは None
    checklist: Option<ChecklistState>,
    server_items: Vec<ChecklistItem>,
    overlay: ChecklistOverlay,
    /// スナップショットを適用するたびに増える。取得中に追い越されたかの判定に使う
    snapshot_epoch: u64,
}

impl SyncState {
    fn install(&mut self, snapshot: ChecklistSnapshot) -> ReconcileReport {
        self.checklist = Some(snapshot.state);
        self.server_items = snapshot.items;
        self.snapshot_epoch += 1;
        self.overlay.reconcile(&self.server_items)
    }
}

/// 取得中に別のスナップショットが届き続けた場合の再取得回数
const MAX_REFRESH_ATTEMPTS: usize = 3;

/// 1チェックリスト分の楽観的同期サービス。
///
/// オーバーレイの変更 → 変更イベント送出 → 購読側が `view()` を再計算、という流れで動く。
/// 状態ロックはリモート呼び出しの `.await` をまたいで保持しない。
pub struct ChecklistSyncService {
    key: ChecklistKey,
    gateway: Arc<dyn ChecklistGateway>,
    notifier: Arc<dyn SyncNotifier>,
    actor: Option<String>,
    state: RwLock<SyncState>,
    changes: broadcast::Sender<ChecklistChange>,
}

impl ChecklistSyncService {
    pub fn new(
        key: ChecklistKey,
        gateway: Arc<dyn ChecklistGateway>,
        notifier: Arc<dyn SyncNotifier>,
        config: &SyncConfig,
    ) -> Self {
        let (changes, _) = broadcast::channel(config.change_channel_capacity.max(1));
        Self {
            key,
            gateway,
            notifier,
            actor: config.actor.clone(),
            state: RwLock::new(SyncState::default()),
            changes,
        }
    }

    pub fn key(&self) -> &ChecklistKey {
        &self.key
    }

    pub fn subscribe_changes(&self) -> broadcast::Receiver<ChecklistChange> {
        self.changes.subscribe()
    }

    /// 表示用のマージ済み一覧
    pub async fn view(&self) -> Vec<ChecklistEntry> {
        let state = self.state.read().await;
        state.overlay.merge(&state.server_items)
    }

    pub async fn stats(&self) -> ChecklistStats {
        ChecklistStats::from_entries(&self.view().await)
    }

    pub async fn checklist_state(&self) -> Option<ChecklistState> {
        self.state.read().await.checklist.clone()
    }

    pub async fn lifecycle(&self) -> Option<ChecklistLifecycle> {
        self.state
            .read()
            .await
            .checklist
            .as_ref()
            .map(ChecklistState::lifecycle)
    }

    pub async fn overlay(&self) -> ChecklistOverlay {
        self.state.read().await.overlay.clone()
    }

    pub async fn last_failed_text(&self) -> Option<String> {
        self.state
            .read()
            .await
            .overlay
            .last_failed_text()
            .map(str::to_string)
    }

    /// 再送用に保持していた入力を取り出す
    pub async fn take_failed_text(&self) -> Option<String> {
        let taken = self.state.write().await.overlay.take_failed_text();
        if taken.is_some() {
            self.emit(ChangeCause::FailedTextCleared);
        }
        taken
    }

    /// 状態と項目をまとめて取得し直し、スナップショットとして適用する。
    ///
    /// 取得中に新しいスナップショットが適用されていた場合、読み取った結果は古い可能性が
    /// あるので捨てて取り直す。
    pub async fn refresh(&self) -> SyncResult<ReconcileReport> {
        for _ in 0..MAX_REFRESH_ATTEMPTS {
            let epoch = self.state.read().await.snapshot_epoch;
            let state = self.gateway.get_checklist_state(&self.key).await?;
            let items = self.gateway.get_checklist_items(&self.key).await?;

            let report = {
                let mut guard = self.state.write().await;
                if guard.snapshot_epoch != epoch {
                    None
                } else {
                    Some(guard.install(ChecklistSnapshot { state, items }))
                }
            };

            match report {
                Some(report) => {
                    self.after_install(&report);
                    return Ok(report);
                }
                None => debug!(
                    "Discarded stale read of checklist {}, newer snapshot arrived",
                    self.key
                ),
            }
        }

        // 追い越したスナップショットの方が新しいので、そのまま採用する
        Ok(ReconcileReport::default())
    }

    /// 受信したスナップショットを正として置き換え、オーバーレイを整合させる
    pub async fn apply_snapshot(&self, snapshot: ChecklistSnapshot) -> ReconcileReport {
        if snapshot.state.key != self.key {
            warn!(
                "Ignoring snapshot for {} delivered to checklist {}",
                snapshot.state.key, self.key
            );
            return ReconcileReport::default();
        }

        let report = self.state.write().await.install(snapshot);
        self.after_install(&report);
        report
    }

    fn after_install(&self, report: &ReconcileReport) {
        if !report.is_empty() {
            debug!(
                key = %self.key,
                dropped_overrides = report.dropped_overrides,
                pruned_deletions = report.pruned_deletions,
                "Reconciled checklist overlay"
            );
        }
        self.emit(ChangeCause::SnapshotApplied);
    }

    /// スナップショット購読タスクを起動する。受信が遅れた場合は全量取得で追いつく
    pub fn spawn_snapshot_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        let mut rx = self.gateway.subscribe(&self.key);

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(snapshot) => {
                        service.apply_snapshot(snapshot).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(
                            "Checklist {} snapshot listener lagged by {} messages, resyncing",
                            service.key, skipped
                        );
                        if let Err(e) = service.refresh().await {
                            warn!("Failed to resync checklist {}: {}", service.key, e);
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            info!("Checklist {} snapshot listener terminated", service.key);
        })
    }

    pub async fn add_item(&self, text: &str) -> SyncResult<ChecklistItem> {
        let item_text = match ItemText::new(text) {
            Ok(item_text) => item_text,
            Err(msg) => return Err(self.reject(SyncError::Validation(msg))),
        };

        let temp_id = {
            let mut guard = self.state.write().await;
            let state = &mut *guard;
            if let Err(err) = self.ensure_active(state) {
                drop(guard);
                return Err(self.reject(err));
            }
            let order = state.overlay.next_order(&state.server_items);
            let optimistic =
                OptimisticChecklistItem::new(self.key.clone(), &item_text, order, self.actor.clone());
            let temp_id = optimistic.temp_id.clone();
            state.overlay.begin_insert(optimistic);
            temp_id
        };
        self.emit(ChangeCause::InsertStarted);

        let result = self
            .gateway
            .add_item(&self.key, &item_text, self.actor.clone())
            .await;

        {
            let mut state = self.state.write().await;
            state.overlay.settle_insert(&temp_id);
            match &result {
                Ok(_) => state.overlay.clear_failed_text(),
                Err(_) => state.overlay.record_failed_text(text),
            }
        }
        self.emit(ChangeCause::InsertSettled);

        match result {
            Ok(item) => {
                info!("Added item {} to checklist {}", item.id, self.key);
                self.notifier
                    .notify(SyncNotification::success("Item added"));
                Ok(item)
            }
            Err(e) => {
                warn!("Rolled back optimistic add on checklist {}: {}", self.key, e);
                Err(self.reject(SyncError::Remote(e)))
            }
        }
    }

    pub async fn toggle_item(&self, entry_id: &EntryId) -> SyncResult<()> {
        let item_id = self.confirmed_id(entry_id)?;

        let generation = {
            let mut guard = self.state.write().await;
            let state = &mut *guard;
            if let Err(err) = self.ensure_active(state) {
                drop(guard);
                return Err(self.reject(err));
            }
            let current = state
                .server_items
                .iter()
                .find(|item| item.id == item_id && !state.overlay.is_deleting(&item.id))
                .map(|item| item.completed);
            let Some(current) = current else {
                drop(guard);
                return Err(self.reject(SyncError::ItemNotFound(item_id.to_string())));
            };
            state.overlay.begin_toggle(item_id.clone(), !current)
        };
        self.emit(ChangeCause::ToggleStarted);

        let result = self
            .gateway
            .toggle_item(&item_id, self.actor.clone())
            .await;

        self.state
            .write()
            .await
            .overlay
            .settle_toggle(&item_id, generation);
        self.emit(ChangeCause::ToggleSettled);

        match result {
            Ok(()) => {
                debug!("Toggled item {} on checklist {}", item_id, self.key);
                Ok(())
            }
            Err(e) => {
                warn!("Rolled back toggle of item {}: {}", item_id, e);
                Err(self.reject(SyncError::Remote(e)))
            }
        }
    }

    pub async fn delete_item(&self, entry_id: &EntryId) -> SyncResult<()> {
        let item_id = self.confirmed_id(entry_id)?;

        {
            let mut guard = self.state.write().await;
            let state = &mut *guard;
            if let Err(err) = self.ensure_active(state) {
                drop(guard);
                return Err(self.reject(err));
            }
            if state.overlay.is_deleting(&item_id) {
                drop(guard);
                debug!("Item {} is already being deleted", item_id);
                self.notifier
                    .notify(SyncNotification::info("Item is already being deleted"));
                return Ok(());
            }
            if !state.server_items.iter().any(|item| item.id == item_id) {
                drop(guard);
                return Err(self.reject(SyncError::ItemNotFound(item_id.to_string())));
            }
            state.overlay.begin_delete([item_id.clone()]);
        }
        self.emit(ChangeCause::DeleteStarted);

        match self.gateway.delete_item(&item_id).await {
            Ok(()) => {
                // 次のスナップショットで項目が消えた時点で削除中IDも片付く
                info!("Deleted item {} from checklist {}", item_id, self.key);
                self.emit(ChangeCause::DeleteSettled);
                self.notifier
                    .notify(SyncNotification::success("Item deleted"));
                Ok(())
            }
            Err(e) => {
                self.state
                    .write()
                    .await
                    .overlay
                    .rollback_delete(std::slice::from_ref(&item_id));
                self.emit(ChangeCause::DeleteSettled);
                warn!("Rolled back delete of item {}: {}", item_id, e);
                Err(self.reject(SyncError::Remote(e)))
            }
        }
    }

    pub async fn clear_completed(&self) -> SyncResult<ClearOutcome> {
        let batch = {
            let mut guard = self.state.write().await;
            let state = &mut *guard;
            if let Err(err) = self.ensure_active(state) {
                drop(guard);
                return Err(self.reject(err));
            }
            let candidates: Vec<ChecklistItemId> = state
                .server_items
                .iter()
                .filter(|item| item.completed)
                .map(|item| item.id.clone())
                .collect();
            state.overlay.begin_delete(candidates)
        };

        if batch.is_empty() {
            self.notifier
                .notify(SyncNotification::info("No completed items to clear"));
            return Ok(ClearOutcome::NothingToClear);
        }
        self.emit(ChangeCause::DeleteStarted);

        match self.gateway.clear_completed(&self.key).await {
            Ok(result) => {
                info!(
                    "Cleared {} completed items from checklist {}",
                    result.deleted_count, self.key
                );
                self.emit(ChangeCause::DeleteSettled);
                self.notifier.notify(SyncNotification::success(format!(
                    "Cleared {} completed items",
                    result.deleted_count
                )));
                Ok(ClearOutcome::Cleared {
                    deleted_count: result.deleted_count,
                })
            }
            Err(e) => {
                self.state.write().await.overlay.rollback_delete(&batch);
                self.emit(ChangeCause::DeleteSettled);
                warn!("Rolled back clear-completed on checklist {}: {}", self.key, e);
                Err(self.reject(SyncError::Remote(e)))
            }
        }
    }

    /// 並び替えは楽観的に反映せず、サーバーの応答後のスナップショットを待つ
    pub async fn reorder(&self, entry_id: &EntryId, target_index: usize) -> SyncResult<()> {
        let orders = {
            let state = self.state.read().await;
            if let Err(err) = self.ensure_active(&state) {
                drop(state);
                return Err(self.reject(err));
            }
            let dragged = match entry_id {
                EntryId::Confirmed(id) => id.clone(),
                EntryId::Optimistic(temp_id) => {
                    drop(state);
                    return Err(self.reject(SyncError::PendingItem(temp_id.to_string())));
                }
            };
            let confirmed: Vec<ChecklistItemId> = state
                .overlay
                .merge(&state.server_items)
                .into_iter()
                .filter_map(|entry| match entry.id {
                    EntryId::Confirmed(id) => Some(id),
                    EntryId::Optimistic(_) => None,
                })
                .collect();
            match compute_reorder(&confirmed, &dragged, target_index) {
                Some(orders) => orders,
                None => {
                    drop(state);
                    return Err(self.reject(SyncError::ItemNotFound(dragged.to_string())));
                }
            }
        };

        match self.gateway.reorder_items(&self.key, &orders).await {
            Ok(()) => {
                debug!("Reordered {} items on checklist {}", orders.len(), self.key);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to reorder checklist {}: {}", self.key, e);
                Err(self.reject(SyncError::Remote(e)))
            }
        }
    }

    /// 存在しない場合のみ作成する。作成した場合は true
    pub async fn initialize(&self, title: Option<&str>) -> SyncResult<bool> {
        let current = self
            .gateway
            .get_checklist_state(&self.key)
            .await
            .map_err(|e| self.reject(SyncError::Remote(e)))?;
        if current.exists {
            debug!("Checklist {} already exists", self.key);
            return Ok(false);
        }

        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_CHECKLIST_TITLE);
        self.gateway
            .create_checklist(&self.key, title)
            .await
            .map_err(|e| self.reject(SyncError::Remote(e)))?;

        info!("Created checklist {} ({})", self.key, title);
        Ok(true)
    }

    pub async fn conclude(&self) -> SyncResult<()> {
        match self.lifecycle().await {
            None | Some(ChecklistLifecycle::Nonexistent) => {
                return Err(self.reject(SyncError::ChecklistMissing(self.key.clone())));
            }
            Some(ChecklistLifecycle::Concluded) => {
                debug!("Checklist {} is already concluded", self.key);
                return Ok(());
            }
            Some(ChecklistLifecycle::Active) => {}
        }

        self.gateway
            .conclude(&self.key)
            .await
            .map_err(|e| self.reject(SyncError::Remote(e)))?;
        info!("Concluded checklist {}", self.key);
        self.notifier
            .notify(SyncNotification::success("Checklist concluded"));
        Ok(())
    }

    pub async fn reopen(&self) -> SyncResult<()> {
        self.gateway
            .reopen(&self.key)
            .await
            .map_err(|e| self.reject(SyncError::Remote(e)))?;
        info!("Reopened checklist {}", self.key);
        self.notifier
            .notify(SyncNotification::success("Checklist reopened"));
        Ok(())
    }

    fn ensure_active(&self, state: &SyncState) -> SyncResult<()> {
        match state.checklist.as_ref().map(ChecklistState::lifecycle) {
            Some(lifecycle) if lifecycle.accepts_item_changes() => Ok(()),
            Some(ChecklistLifecycle::Concluded) => {
                Err(SyncError::ChecklistInactive(self.key.clone()))
            }
            _ => Err(SyncError::ChecklistMissing(self.key.clone())),
        }
    }

    fn confirmed_id(&self, entry_id: &EntryId) -> SyncResult<ChecklistItemId> {
        entry_id
            .as_confirmed()
            .cloned()
            .ok_or_else(|| self.reject(SyncError::PendingItem(entry_id.to_string())))
    }

    /// 失敗を通知してそのまま返す
    fn reject(&self, err: SyncError) -> SyncError {
        self.notifier
            .notify(SyncNotification::error(err.to_string()));
        err
    }

    fn emit(&self, cause: ChangeCause) {
        // 購読者がいない場合の送信失敗は無視してよい
        let _ = self.changes.send(ChecklistChange {
            key: self.key.clone(),
            cause,
        });
    }
}
