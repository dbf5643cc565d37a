pub mod overlay;
pub mod service;


pub use overlay::{AttendanceOverlay, PendingMark};
pub use service::AttendanceSyncService;
