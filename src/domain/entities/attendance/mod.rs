pub mod attendance_entry;
pub mod attendance_record;

pub use attendance_entry::{AttendanceEntry, AttendanceStats};
pub use attendance_record::{AttendanceRecord, AttendanceStatus};
