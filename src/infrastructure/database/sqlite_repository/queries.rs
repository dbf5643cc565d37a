pub(super) const INSERT_CHECKLIST: &str = r#"
    INSERT INTO checklists (key, title, is_active, created_at, concluded_at)
    VALUES (?1, ?2, 1, ?3, NULL)
    ON CONFLICT(key) DO NOTHING
"#;

pub(super) const SELECT_CHECKLIST_BY_KEY: &str = r#"
    SELECT key, title, is_active, created_at, concluded_at
    FROM checklists
    WHERE key = ?1
"#;

pub(super) const CONCLUDE_CHECKLIST: &str = r#"
    UPDATE checklists
    SET is_active = 0,
        concluded_at = ?2
    WHERE key = ?1
"#;

pub(super) const REOPEN_CHECKLIST: &str = r#"
    UPDATE checklists
    SET is_active = 1,
        concluded_at = NULL
    WHERE key = ?1
"#;

pub(super) const SELECT_ITEMS_BY_CHECKLIST: &str = r#"
    SELECT id, checklist_key, text, completed, sort_order,
           created_at, completed_at, created_by, completed_by
    FROM checklist_items
    WHERE checklist_key = ?1
    ORDER BY sort_order ASC, created_at ASC
"#;

pub(super) const SELECT_ITEM_BY_ID: &str = r#"
    SELECT id, checklist_key, text, completed, sort_order,
           created_at, completed_at, created_by, completed_by
    FROM checklist_items
    WHERE id = ?1
"#;

pub(super) const SELECT_NEXT_SORT_ORDER: &str = r#"
    SELECT COALESCE(MAX(sort_order) + 1, 0) AS next_order
    FROM checklist_items
    WHERE checklist_key = ?1
"#;

pub(super) const INSERT_ITEM: &str = r#"
    INSERT INTO checklist_items (
        id,
        checklist_key,
        text,
        completed,
        sort_order,
        created_at,
        completed_at,
        created_by,
        completed_by
    ) VALUES (?1, ?2, ?3, 0, ?4, ?5, NULL, ?6, NULL)
"#;

pub(super) const UPDATE_ITEM_COMPLETION: &str = r#"
    UPDATE checklist_items
    SET completed = ?2,
        completed_at = ?3,
        completed_by = ?4
    WHERE id = ?1
"#;

pub(super) const DELETE_ITEM: &str = r#"
    DELETE FROM checklist_items
    WHERE id = ?1
"#;

pub(super) const DELETE_COMPLETED_ITEMS: &str = r#"
    DELETE FROM checklist_items
    WHERE checklist_key = ?1 AND completed = 1
"#;

pub(super) const UPDATE_ITEM_ORDER: &str = r#"
    UPDATE checklist_items
    SET sort_order = ?3
    WHERE id = ?1 AND checklist_key = ?2
"#;

pub(super) const UPSERT_ATTENDANCE: &str = r#"
    INSERT INTO attendance_records (
        id,
        session_key,
        attendee,
        attendee_normalized,
        status,
        recorded_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(session_key, attendee_normalized) DO UPDATE SET
        attendee = excluded.attendee,
        status = excluded.status,
        recorded_at = excluded.recorded_at
"#;

pub(super) const SELECT_ATTENDANCE_BY_SESSION: &str = r#"
    SELECT id, session_key, attendee, status, recorded_at
    FROM attendance_records
    WHERE session_key = ?1
    ORDER BY attendee_normalized ASC
"#;

pub(super) const SELECT_ATTENDANCE_BY_ATTENDEE: &str = r#"
    SELECT id, session_key, attendee, status, recorded_at
    FROM attendance_records
    WHERE session_key = ?1 AND attendee_normalized = ?2
"#;

pub(super) const SELECT_ATTENDANCE_SESSION: &str = r#"
    SELECT session_key
    FROM attendance_records
    WHERE id = ?1
"#;

pub(super) const DELETE_ATTENDANCE: &str = r#"
    DELETE FROM attendance_records
    WHERE id = ?1
"#;
