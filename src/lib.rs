//! チェックリストと出欠の楽観的同期。
//!
//! サーバー確定済みのスナップショットに、未確認のローカル変更（追加・削除・完了切り替え）を
//! 重ねた表示用ビューを組み立て、リモート呼び出しの失敗時にはローカル変更を取り消す。

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::services::{
    AttendanceSyncService, ChecklistSyncRegistry, ChecklistSyncService, ClearOutcome, SyncError,
    SyncFailureKind, SyncResult,
};
pub use shared::{AppConfig, AppError};

/// tracing の購読者を登録する。`RUST_LOG` が無ければ既定のフィルタを使う
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checklist_sync=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[doc(hidden)]
pub mod test_support {
    pub use crate::application;
    pub use crate::domain;
    pub use crate::infrastructure;
    pub use crate::shared;
}
