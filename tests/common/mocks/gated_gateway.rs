use async_trait::async_trait;
use checklist_sync::test_support::application::ports::ChecklistGateway;
use checklist_sync::test_support::domain::entities::{
    ChecklistItem, ChecklistSnapshot, ChecklistState, ClearCompletedResult, ItemOrder,
};
use checklist_sync::test_support::domain::value_objects::{ChecklistItemId, ChecklistKey, ItemText};
use checklist_sync::test_support::shared::error::AppError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Notify, broadcast};

/// 実ゲートウェイを包み、ミューテーションを途中で止めたり失敗させたりする
pub struct GatedGateway {
    inner: Arc<dyn ChecklistGateway>,
    holding: AtomicBool,
    holding_read: AtomicBool,
    fail_next: AtomicBool,
    entered: Notify,
    released: Notify,
    mutation_calls: AtomicUsize,
}

#[allow(dead_code)]
impl GatedGateway {
    pub fn new(inner: Arc<dyn ChecklistGateway>) -> Self {
        Self {
            inner,
            holding: AtomicBool::new(false),
            holding_read: AtomicBool::new(false),
            fail_next: AtomicBool::new(false),
            entered: Notify::new(),
            released: Notify::new(),
            mutation_calls: AtomicUsize::new(0),
        }
    }

    /// 次のミューテーションを release() まで止める
    pub fn hold_next(&self) {
        self.holding.store(true, Ordering::SeqCst);
    }

    /// 次の項目取得を、内側から読み終えた後 release() まで止める。
    /// 止めている間に書き込みがあれば、返る結果は古いものになる
    pub fn hold_next_items_read(&self) {
        self.holding_read.store(true, Ordering::SeqCst);
    }

    /// 次のミューテーションを内側へ渡さずに失敗させる
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub async fn wait_until_entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.released.notify_one();
    }

    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    async fn pass(&self) -> Result<(), AppError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.holding.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.released.notified().await;
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AppError::Network("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChecklistGateway for GatedGateway {
    async fn get_checklist_state(&self, key: &ChecklistKey) -> Result<ChecklistState, AppError> {
        self.inner.get_checklist_state(key).await
    }

    async fn get_checklist_items(
        &self,
        key: &ChecklistKey,
    ) -> Result<Vec<ChecklistItem>, AppError> {
        let items = self.inner.get_checklist_items(key).await;
        if self.holding_read.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.released.notified().await;
        }
        items
    }

    fn subscribe(&self, key: &ChecklistKey) -> broadcast::Receiver<ChecklistSnapshot> {
        self.inner.subscribe(key)
    }

    async fn create_checklist(&self, key: &ChecklistKey, title: &str) -> Result<(), AppError> {
        self.pass().await?;
        self.inner.create_checklist(key, title).await
    }

    async fn add_item(
        &self,
        key: &ChecklistKey,
        text: &ItemText,
        actor: Option<String>,
    ) -> Result<ChecklistItem, AppError> {
        self.pass().await?;
        self.inner.add_item(key, text, actor).await
    }

    async fn toggle_item(
        &self,
        item_id: &ChecklistItemId,
        actor: Option<String>,
    ) -> Result<(), AppError> {
        self.pass().await?;
        self.inner.toggle_item(item_id, actor).await
    }

    async fn delete_item(&self, item_id: &ChecklistItemId) -> Result<(), AppError> {
        self.pass().await?;
        self.inner.delete_item(item_id).await
    }

    async fn clear_completed(&self, key: &ChecklistKey) -> Result<ClearCompletedResult, AppError> {
        self.pass().await?;
        self.inner.clear_completed(key).await
    }

    async fn reorder_items(&self, key: &ChecklistKey, orders: &[ItemOrder]) -> Result<(), AppError> {
        self.pass().await?;
        self.inner.reorder_items(key, orders).await
    }

    async fn conclude(&self, key: &ChecklistKey) -> Result<(), AppError> {
        self.pass().await?;
        self.inner.conclude(key).await
    }

    async fn reopen(&self, key: &ChecklistKey) -> Result<(), AppError> {
        self.pass().await?;
        self.inner.reopen(key).await
    }
}
