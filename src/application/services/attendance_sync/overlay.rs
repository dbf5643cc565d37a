use crate::domain::entities::{AttendanceEntry, AttendanceRecord, AttendanceStatus};
use crate::domain::value_objects::{AttendanceRecordId, AttendeeName};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMark {
    pub attendee: AttendeeName,
    pub status: AttendanceStatus,
    pub started_at: DateTime<Utc>,
    pub generation: u64,
}

/// 出欠の楽観的更新。出席者名（正規化済み）ごとに最大1件の保留を持つ
#[derive(Debug, Clone, Default)]
pub struct AttendanceOverlay {
    pending_marks: HashMap<String, PendingMark>,
    removing_ids: HashSet<AttendanceRecordId>,
    next_generation: u64,
}

impl AttendanceOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// 出席者名の大文字小文字を無視した順で並べる
    pub fn merge(&self, records: &[AttendanceRecord]) -> Vec<AttendanceEntry> {
        let mut by_attendee: HashMap<String, AttendanceEntry> =
            HashMap::with_capacity(records.len() + self.pending_marks.len());

        for record in records {
            if self.removing_ids.contains(&record.id) {
                continue;
            }
            by_attendee
                .entry(record.attendee.normalized())
                .or_insert_with(|| AttendanceEntry::from_record(record));
        }

        for (normalized, mark) in &self.pending_marks {
            by_attendee
                .entry(normalized.clone())
                .and_modify(|entry| {
                    entry.status = mark.status;
                    entry.is_pending = true;
                })
                .or_insert_with(|| AttendanceEntry {
                    record_id: None,
                    attendee: mark.attendee.clone(),
                    status: mark.status,
                    recorded_at: mark.started_at,
                    is_pending: true,
                });
        }

        let mut entries: Vec<(String, AttendanceEntry)> = by_attendee.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.into_iter().map(|(_, entry)| entry).collect()
    }

    pub fn begin_mark(&mut self, attendee: AttendeeName, status: AttendanceStatus) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.pending_marks.insert(
            attendee.normalized(),
            PendingMark {
                attendee,
                status,
                started_at: Utc::now(),
                generation,
            },
        );
        generation
    }

    pub fn settle_mark(&mut self, attendee: &AttendeeName, generation: u64) -> bool {
        let normalized = attendee.normalized();
        match self.pending_marks.get(&normalized) {
            Some(mark) if mark.generation == generation => {
                self.pending_marks.remove(&normalized);
                true
            }
            _ => false,
        }
    }

    pub fn begin_remove(&mut self, record_id: AttendanceRecordId) -> bool {
        self.removing_ids.insert(record_id)
    }

    pub fn rollback_remove(&mut self, record_id: &AttendanceRecordId) {
        self.removing_ids.remove(record_id);
    }

    pub fn is_removing(&self, record_id: &AttendanceRecordId) -> bool {
        self.removing_ids.contains(record_id)
    }

    /// スナップショット到着時に、サーバーが追いついた保留と消えた削除中IDを捨てる
    pub fn reconcile(&mut self, records: &[AttendanceRecord]) -> usize {
        let confirmed: HashMap<String, AttendanceStatus> = records
            .iter()
            .map(|r| (r.attendee.normalized(), r.status))
            .collect();
        let ids: HashSet<&AttendanceRecordId> = records.iter().map(|r| &r.id).collect();

        let before = self.pending_marks.len() + self.removing_ids.len();
        self.pending_marks
            .retain(|normalized, mark| confirmed.get(normalized) != Some(&mark.status));
        self.removing_ids.retain(|id| ids.contains(id));
        before - (self.pending_marks.len() + self.removing_ids.len())
    }

    pub fn is_empty(&self) -> bool {
        self.pending_marks.is_empty() && self.removing_ids.is_empty()
    }
}
