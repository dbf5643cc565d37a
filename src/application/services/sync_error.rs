use crate::domain::value_objects::ChecklistKey;
use crate::shared::error::AppError;
use thiserror::Error;

/// 同期アクションの失敗。どれも致命的ではなく、呼び出し側は通知を出して再試行できる。
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SyncError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Checklist {0} is not active")]
    ChecklistInactive(ChecklistKey),

    #[error("Checklist {0} does not exist")]
    ChecklistMissing(ChecklistKey),

    #[error("Item {0} is still waiting for server confirmation")]
    PendingItem(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Remote call failed: {0}")]
    Remote(#[from] AppError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncFailureKind {
    /// ネットワークに到達する前に弾いた入力エラー
    Validation,
    /// 状態が操作を許さない（終了済み・未確定項目など）
    Precondition,
    /// リモート呼び出しの失敗。オーバーレイはロールバック済み
    Remote,
}

impl SyncError {
    pub fn kind(&self) -> SyncFailureKind {
        match self {
            SyncError::Validation(_) => SyncFailureKind::Validation,
            SyncError::ChecklistInactive(_)
            | SyncError::ChecklistMissing(_)
            | SyncError::PendingItem(_)
            | SyncError::ItemNotFound(_) => SyncFailureKind::Precondition,
            SyncError::Remote(_) => SyncFailureKind::Remote,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == SyncFailureKind::Remote
    }
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;
