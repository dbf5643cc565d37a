pub mod events;
pub mod merge;
pub mod overlay;
pub mod registry;
pub mod service;


pub use events::{ChangeCause, ChecklistChange};
pub use merge::{compute_reorder, merge_checklist_view};
pub use overlay::{ChecklistOverlay, ReconcileReport, ToggleOverride};
pub use registry::ChecklistSyncRegistry;
pub use service::{ChecklistSyncService, ClearOutcome};
