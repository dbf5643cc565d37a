pub mod attendance_gateway;
pub mod checklist_gateway;
pub mod notifier;

pub use attendance_gateway::AttendanceGateway;
pub use checklist_gateway::ChecklistGateway;
pub use notifier::{NotificationLevel, SyncNotification, SyncNotifier};
