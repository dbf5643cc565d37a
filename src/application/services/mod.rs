pub mod attendance_sync;
pub mod checklist_sync;
pub mod sync_error;

pub use attendance_sync::AttendanceSyncService;
pub use checklist_sync::{ChecklistSyncRegistry, ChecklistSyncService, ClearOutcome};
pub use sync_error::{SyncError, SyncFailureKind, SyncResult};
