use crate::domain::entities::{AttendanceRecord, AttendanceStatus};
use crate::domain::value_objects::{AttendanceRecordId, AttendeeName, ChecklistKey};
use crate::shared::error::AppError;
use async_trait::async_trait;
use tokio::sync::broadcast;

#[async_trait]
pub trait AttendanceGateway: Send + Sync {
    async fn get_attendance(
        &self,
        session_key: &ChecklistKey,
    ) -> Result<Vec<AttendanceRecord>, AppError>;
    fn subscribe_attendance(
        &self,
        session_key: &ChecklistKey,
    ) -> broadcast::Receiver<Vec<AttendanceRecord>>;
    /// 同じ出席者の既存レコードがあれば状態を上書きする
    async fn mark_attendance(
        &self,
        session_key: &ChecklistKey,
        attendee: &AttendeeName,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord, AppError>;
    async fn remove_attendance(&self, record_id: &AttendanceRecordId) -> Result<(), AppError>;
}
