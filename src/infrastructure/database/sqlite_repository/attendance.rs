use super::SqliteRepository;
use super::mapper::map_attendance_row;
use super::queries::{
    DELETE_ATTENDANCE, SELECT_ATTENDANCE_BY_ATTENDEE, SELECT_ATTENDANCE_BY_SESSION,
    SELECT_ATTENDANCE_SESSION, UPSERT_ATTENDANCE,
};
use crate::application::ports::AttendanceGateway;
use crate::domain::entities::{AttendanceRecord, AttendanceStatus};
use crate::domain::value_objects::{AttendanceRecordId, AttendeeName, ChecklistKey};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tokio::sync::broadcast;
use tracing::warn;

impl SqliteRepository {
    async fn publish_attendance(&self, session_key: &ChecklistKey) {
        if self.attendance_hub.subscriber_count(session_key.as_str()) == 0 {
            return;
        }

        match self.get_attendance(session_key).await {
            Ok(records) => {
                self.attendance_hub.publish(session_key.as_str(), records);
            }
            Err(e) => warn!("Failed to build attendance snapshot for {}: {}", session_key, e),
        }
    }
}

#[async_trait]
impl AttendanceGateway for SqliteRepository {
    async fn get_attendance(
        &self,
        session_key: &ChecklistKey,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let rows = sqlx::query(SELECT_ATTENDANCE_BY_SESSION)
            .bind(session_key.as_str())
            .fetch_all(self.pool.get_pool())
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(map_attendance_row(&row)?);
        }

        Ok(records)
    }

    fn subscribe_attendance(
        &self,
        session_key: &ChecklistKey,
    ) -> broadcast::Receiver<Vec<AttendanceRecord>> {
        self.attendance_hub.subscribe(session_key.as_str())
    }

    async fn mark_attendance(
        &self,
        session_key: &ChecklistKey,
        attendee: &AttendeeName,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord, AppError> {
        let normalized = attendee.normalized();

        sqlx::query(UPSERT_ATTENDANCE)
            .bind(AttendanceRecordId::generate().as_str())
            .bind(session_key.as_str())
            .bind(attendee.as_str())
            .bind(&normalized)
            .bind(status.as_str())
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;

        // 既存レコードを更新した場合は元のIDが残る
        let row = sqlx::query(SELECT_ATTENDANCE_BY_ATTENDEE)
            .bind(session_key.as_str())
            .bind(&normalized)
            .fetch_one(self.pool.get_pool())
            .await?;
        let record = map_attendance_row(&row)?;

        self.publish_attendance(session_key).await;
        Ok(record)
    }

    async fn remove_attendance(&self, record_id: &AttendanceRecordId) -> Result<(), AppError> {
        let row = sqlx::query(SELECT_ATTENDANCE_SESSION)
            .bind(record_id.as_str())
            .fetch_optional(self.pool.get_pool())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attendance record {record_id}")))?;
        let session_key: String = row.try_get("session_key")?;
        let session_key = ChecklistKey::new(session_key).map_err(AppError::DeserializationError)?;

        sqlx::query(DELETE_ATTENDANCE)
            .bind(record_id.as_str())
            .execute(self.pool.get_pool())
            .await?;

        self.publish_attendance(&session_key).await;
        Ok(())
    }
}
