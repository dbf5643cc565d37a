pub mod checklist_item;
pub mod entry;
pub mod optimistic_item;
pub mod state;
pub mod stats;

pub use checklist_item::{ChecklistItem, ClearCompletedResult, ItemOrder};
pub use entry::{ChecklistEntry, EntryId};
pub use optimistic_item::OptimisticChecklistItem;
pub use state::{ChecklistLifecycle, ChecklistSnapshot, ChecklistState};
pub use stats::ChecklistStats;
