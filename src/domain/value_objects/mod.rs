pub mod attendance_record_id;
pub mod attendee_name;
pub mod checklist_key;
pub mod item_id;
pub mod item_text;
pub mod temp_item_id;

pub use attendance_record_id::AttendanceRecordId;
pub use attendee_name::AttendeeName;
pub use checklist_key::ChecklistKey;
pub use item_id::ChecklistItemId;
pub use item_text::ItemText;
pub use temp_item_id::TempItemId;
