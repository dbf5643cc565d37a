use super::{AttendanceRecord, AttendanceStatus};
use crate::domain::value_objects::{AttendanceRecordId, AttendeeName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 出欠のマージ済みビューの1行。
/// `record_id` が `None` の行はサーバー未確認の新規登録。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub record_id: Option<AttendanceRecordId>,
    pub attendee: AttendeeName,
    pub status: AttendanceStatus,
    pub recorded_at: DateTime<Utc>,
    pub is_pending: bool,
}

impl AttendanceEntry {
    pub(crate) fn from_record(record: &AttendanceRecord) -> Self {
        Self {
            record_id: Some(record.id.clone()),
            attendee: record.attendee.clone(),
            status: record.status,
            recorded_at: record.recorded_at,
            is_pending: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub attending: usize,
    pub not_attending: usize,
    pub total: usize,
    pub pending: usize,
}

impl AttendanceStats {
    pub fn from_entries(entries: &[AttendanceEntry]) -> Self {
        let attending = entries
            .iter()
            .filter(|e| e.status == AttendanceStatus::Attending)
            .count();
        Self {
            attending,
            not_attending: entries.len() - attending,
            total: entries.len(),
            pending: entries.iter().filter(|e| e.is_pending).count(),
        }
    }
}
