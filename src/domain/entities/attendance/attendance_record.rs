use crate::domain::value_objects::{AttendanceRecordId, AttendeeName, ChecklistKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Attending,
    NotAttending,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attending => "attending",
            Self::NotAttending => "not_attending",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "attending" => Ok(Self::Attending),
            "not_attending" => Ok(Self::NotAttending),
            other => Err(format!("Unknown attendance status: {other}")),
        }
    }
}

/// 出欠はセッション単位でチェックリストと同じキー空間を使う
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: AttendanceRecordId,
    pub session_key: ChecklistKey,
    pub attendee: AttendeeName,
    pub status: AttendanceStatus,
    pub recorded_at: DateTime<Utc>,
}
