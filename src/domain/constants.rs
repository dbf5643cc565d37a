/// 一時IDの接頭辞
pub const TEMP_ID_PREFIX: &str = "temp-";

pub const MAX_ITEM_TEXT_LENGTH: usize = 500;
pub const MAX_ATTENDEE_NAME_LENGTH: usize = 100;

pub const DEFAULT_CHECKLIST_TITLE: &str = "Checklist";
