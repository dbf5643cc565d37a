use crate::domain::entities::{
    ChecklistItem, ChecklistSnapshot, ChecklistState, ClearCompletedResult, ItemOrder,
};
use crate::domain::value_objects::{ChecklistItemId, ChecklistKey, ItemText};
use crate::shared::error::AppError;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// リモートのデータソース境界。
/// 各ミューテーションは成功か失敗のどちらかで、部分的な成功は扱わない。
#[async_trait]
pub trait ChecklistGateway: Send + Sync {
    async fn get_checklist_state(&self, key: &ChecklistKey) -> Result<ChecklistState, AppError>;
    async fn get_checklist_items(&self, key: &ChecklistKey)
    -> Result<Vec<ChecklistItem>, AppError>;

    /// データ変更のたびにスナップショットが再配信される購読
    fn subscribe(&self, key: &ChecklistKey) -> broadcast::Receiver<ChecklistSnapshot>;

    async fn create_checklist(&self, key: &ChecklistKey, title: &str) -> Result<(), AppError>;
    async fn add_item(
        &self,
        key: &ChecklistKey,
        text: &ItemText,
        actor: Option<String>,
    ) -> Result<ChecklistItem, AppError>;
    async fn toggle_item(
        &self,
        item_id: &ChecklistItemId,
        actor: Option<String>,
    ) -> Result<(), AppError>;
    async fn delete_item(&self, item_id: &ChecklistItemId) -> Result<(), AppError>;
    async fn clear_completed(&self, key: &ChecklistKey) -> Result<ClearCompletedResult, AppError>;
    async fn reorder_items(&self, key: &ChecklistKey, orders: &[ItemOrder])
    -> Result<(), AppError>;
    async fn conclude(&self, key: &ChecklistKey) -> Result<(), AppError>;
    async fn reopen(&self, key: &ChecklistKey) -> Result<(), AppError>;
}
