use super::SqliteRepository;
use super::mapper::{map_checklist_state_row, map_item_row};
use super::queries::{
    CONCLUDE_CHECKLIST, DELETE_COMPLETED_ITEMS, DELETE_ITEM, INSERT_CHECKLIST, INSERT_ITEM,
    REOPEN_CHECKLIST, SELECT_CHECKLIST_BY_KEY, SELECT_ITEM_BY_ID, SELECT_ITEMS_BY_CHECKLIST,
    SELECT_NEXT_SORT_ORDER, UPDATE_ITEM_COMPLETION, UPDATE_ITEM_ORDER,
};
use crate::application::ports::ChecklistGateway;
use crate::domain::entities::{
    ChecklistItem, ChecklistSnapshot, ChecklistState, ClearCompletedResult, ItemOrder,
};
use crate::domain::value_objects::{ChecklistItemId, ChecklistKey, ItemText};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tokio::sync::broadcast;
use tracing::{debug, warn};

impl SqliteRepository {
    /// 項目の変更はアクティブなチェックリストに対してのみ許可する
    async fn require_active(&self, key: &ChecklistKey) -> Result<(), AppError> {
        let state = self.get_checklist_state(key).await?;
        if !state.exists {
            return Err(AppError::NotFound(format!("Checklist {key} does not exist")));
        }
        if !state.is_active {
            return Err(AppError::ValidationError(format!(
                "Checklist {key} has been concluded"
            )));
        }
        Ok(())
    }

    async fn find_item(&self, item_id: &ChecklistItemId) -> Result<ChecklistItem, AppError> {
        let row = sqlx::query(SELECT_ITEM_BY_ID)
            .bind(item_id.as_str())
            .fetch_optional(self.pool.get_pool())
            .await?;

        match row {
            Some(row) => map_item_row(&row),
            None => Err(AppError::NotFound(format!("Checklist item {item_id}"))),
        }
    }

    async fn publish_checklist(&self, key: &ChecklistKey) {
        if self.checklist_hub.subscriber_count(key.as_str()) == 0 {
            return;
        }

        let snapshot = async {
            Ok::<_, AppError>(ChecklistSnapshot {
                state: self.get_checklist_state(key).await?,
                items: self.get_checklist_items(key).await?,
            })
        }
        .await;

        match snapshot {
            Ok(snapshot) => {
                let delivered = self.checklist_hub.publish(key.as_str(), snapshot);
                debug!("Published checklist {} to {} subscribers", key, delivered);
            }
            Err(e) => warn!("Failed to build snapshot for checklist {}: {}", key, e),
        }
    }
}

#[async_trait]
impl ChecklistGateway for SqliteRepository {
    async fn get_checklist_state(&self, key: &ChecklistKey) -> Result<ChecklistState, AppError> {
        let row = sqlx::query(SELECT_CHECKLIST_BY_KEY)
            .bind(key.as_str())
            .fetch_optional(self.pool.get_pool())
            .await?;

        match row {
            Some(row) => map_checklist_state_row(&row),
            None => Ok(ChecklistState::missing(key.clone())),
        }
    }

    async fn get_checklist_items(
        &self,
        key: &ChecklistKey,
    ) -> Result<Vec<ChecklistItem>, AppError> {
        let rows = sqlx::query(SELECT_ITEMS_BY_CHECKLIST)
            .bind(key.as_str())
            .fetch_all(self.pool.get_pool())
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(map_item_row(&row)?);
        }

        Ok(items)
    }

    fn subscribe(&self, key: &ChecklistKey) -> broadcast::Receiver<ChecklistSnapshot> {
        self.checklist_hub.subscribe(key.as_str())
    }

    async fn create_checklist(&self, key: &ChecklistKey, title: &str) -> Result<(), AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::ValidationError(
                "Checklist title cannot be empty".to_string(),
            ));
        }

        sqlx::query(INSERT_CHECKLIST)
            .bind(key.as_str())
            .bind(title)
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;

        self.publish_checklist(key).await;
        Ok(())
    }

    async fn add_item(
        &self,
        key: &ChecklistKey,
        text: &ItemText,
        actor: Option<String>,
    ) -> Result<ChecklistItem, AppError> {
        self.require_active(key).await?;

        let next_order: i64 = sqlx::query(SELECT_NEXT_SORT_ORDER)
            .bind(key.as_str())
            .fetch_one(self.pool.get_pool())
            .await?
            .try_get("next_order")?;

        let item = ChecklistItem::new(key.clone(), text.as_str().to_string(), next_order, actor);
        sqlx::query(INSERT_ITEM)
            .bind(item.id.as_str())
            .bind(key.as_str())
            .bind(&item.text)
            .bind(item.order)
            .bind(item.created_at.timestamp_millis())
            .bind(&item.created_by)
            .execute(self.pool.get_pool())
            .await?;

        self.publish_checklist(key).await;
        Ok(item)
    }

    async fn toggle_item(
        &self,
        item_id: &ChecklistItemId,
        actor: Option<String>,
    ) -> Result<(), AppError> {
        let item = self.find_item(item_id).await?;
        self.require_active(&item.checklist_key).await?;

        let completed = !item.completed;
        let (completed_at, completed_by) = if completed {
            (Some(Utc::now().timestamp_millis()), actor)
        } else {
            (None, None)
        };

        sqlx::query(UPDATE_ITEM_COMPLETION)
            .bind(item_id.as_str())
            .bind(completed)
            .bind(completed_at)
            .bind(completed_by)
            .execute(self.pool.get_pool())
            .await?;

        self.publish_checklist(&item.checklist_key).await;
        Ok(())
    }

    async fn delete_item(&self, item_id: &ChecklistItemId) -> Result<(), AppError> {
        let item = self.find_item(item_id).await?;
        self.require_active(&item.checklist_key).await?;

        sqlx::query(DELETE_ITEM)
            .bind(item_id.as_str())
            .execute(self.pool.get_pool())
            .await?;

        self.publish_checklist(&item.checklist_key).await;
        Ok(())
    }

    async fn clear_completed(&self, key: &ChecklistKey) -> Result<ClearCompletedResult, AppError> {
        self.require_active(key).await?;

        let result = sqlx::query(DELETE_COMPLETED_ITEMS)
            .bind(key.as_str())
            .execute(self.pool.get_pool())
            .await?;

        self.publish_checklist(key).await;
        Ok(ClearCompletedResult {
            deleted_count: u32::try_from(result.rows_affected()).unwrap_or(u32::MAX),
        })
    }

    async fn reorder_items(&self, key: &ChecklistKey, orders: &[ItemOrder]) -> Result<(), AppError> {
        self.require_active(key).await?;

        let mut tx = self.pool.get_pool().begin().await?;
        for order in orders {
            let result = sqlx::query(UPDATE_ITEM_ORDER)
                .bind(order.item_id.as_str())
                .bind(key.as_str())
                .bind(order.new_order)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 0 {
                // tx はドロップ時にロールバックされる
                return Err(AppError::NotFound(format!(
                    "Checklist item {} in {}",
                    order.item_id, key
                )));
            }
        }
        tx.commit().await?;

        self.publish_checklist(key).await;
        Ok(())
    }

    async fn conclude(&self, key: &ChecklistKey) -> Result<(), AppError> {
        let result = sqlx::query(CONCLUDE_CHECKLIST)
            .bind(key.as_str())
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Checklist {key} does not exist")));
        }

        self.publish_checklist(key).await;
        Ok(())
    }

    async fn reopen(&self, key: &ChecklistKey) -> Result<(), AppError> {
        let result = sqlx::query(REOPEN_CHECKLIST)
            .bind(key.as_str())
            .execute(self.pool.get_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Checklist {key} does not exist")));
        }

        self.publish_checklist(key).await;
        Ok(())
    }
}
