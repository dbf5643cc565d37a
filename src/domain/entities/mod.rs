pub mod attendance;
pub mod checklist;

pub use attendance::{AttendanceEntry, AttendanceRecord, AttendanceStats, AttendanceStatus};
pub use checklist::{
    ChecklistEntry, ChecklistItem, ChecklistLifecycle, ChecklistSnapshot, ChecklistState,
    ChecklistStats, ClearCompletedResult, EntryId, ItemOrder, OptimisticChecklistItem,
};
