use super::ConnectionPool;
use crate::domain::entities::{AttendanceRecord, ChecklistSnapshot};
use crate::infrastructure::realtime::SnapshotHub;
use crate::shared::error::AppError;

mod attendance;
mod checklists;
mod mapper;
mod queries;


/// リモートのデータストアを SQLite で代替する実装。
/// 変更が成功するたびに、そのキーの最新スナップショットを購読者へ配信する。
pub struct SqliteRepository {
    pool: ConnectionPool,
    checklist_hub: SnapshotHub<ChecklistSnapshot>,
    attendance_hub: SnapshotHub<Vec<AttendanceRecord>>,
}

impl SqliteRepository {
    pub fn new(pool: ConnectionPool, snapshot_capacity: usize) -> Self {
        Self {
            pool,
            checklist_hub: SnapshotHub::new(snapshot_capacity),
            attendance_hub: SnapshotHub::new(snapshot_capacity),
        }
    }

    pub async fn initialize(&self) -> Result<(), AppError> {
        self.pool.migrate().await?;
        Ok(())
    }

    pub async fn health_check(&self) -> Result<bool, AppError> {
        let result = sqlx::query("SELECT 1")
            .fetch_one(self.pool.get_pool())
            .await;
        Ok(result.is_ok())
    }
}
