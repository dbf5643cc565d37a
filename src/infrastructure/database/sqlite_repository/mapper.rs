use crate::domain::entities::{AttendanceRecord, AttendanceStatus, ChecklistItem, ChecklistState};
use crate::domain::value_objects::{AttendanceRecordId, AttendeeName, ChecklistItemId, ChecklistKey};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use sqlx::{Row, sqlite::SqliteRow};

pub(super) fn map_checklist_state_row(row: &SqliteRow) -> Result<ChecklistState, AppError> {
    let key: String = row.try_get("key")?;
    let concluded_at: Option<i64> = row.try_get("concluded_at")?;

    Ok(ChecklistState {
        key: ChecklistKey::new(key).map_err(AppError::DeserializationError)?,
        exists: true,
        is_active: row.try_get("is_active")?,
        title: Some(row.try_get("title")?),
        created_at: Some(timestamp(row.try_get("created_at")?)),
        concluded_at: concluded_at.map(timestamp),
    })
}

pub(super) fn map_item_row(row: &SqliteRow) -> Result<ChecklistItem, AppError> {
    let id: String = row.try_get("id")?;
    let checklist_key: String = row.try_get("checklist_key")?;
    let completed_at: Option<i64> = row.try_get("completed_at")?;

    Ok(ChecklistItem {
        id: ChecklistItemId::new(id).map_err(AppError::DeserializationError)?,
        checklist_key: ChecklistKey::new(checklist_key).map_err(AppError::DeserializationError)?,
        text: row.try_get("text")?,
        completed: row.try_get("completed")?,
        order: row.try_get("sort_order")?,
        created_at: timestamp(row.try_get("created_at")?),
        completed_at: completed_at.map(timestamp),
        created_by: row.try_get("created_by")?,
        completed_by: row.try_get("completed_by")?,
    })
}

pub(super) fn map_attendance_row(row: &SqliteRow) -> Result<AttendanceRecord, AppError> {
    let id: String = row.try_get("id")?;
    let session_key: String = row.try_get("session_key")?;
    let attendee: String = row.try_get("attendee")?;
    let status: String = row.try_get("status")?;

    Ok(AttendanceRecord {
        id: AttendanceRecordId::new(id).map_err(AppError::DeserializationError)?,
        session_key: ChecklistKey::new(session_key).map_err(AppError::DeserializationError)?,
        attendee: AttendeeName::new(&attendee).map_err(AppError::DeserializationError)?,
        status: AttendanceStatus::parse(&status).map_err(AppError::DeserializationError)?,
        recorded_at: timestamp(row.try_get("recorded_at")?),
    })
}

fn timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}
