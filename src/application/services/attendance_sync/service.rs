use super::overlay::AttendanceOverlay;
use crate::application::ports::{AttendanceGateway, SyncNotification, SyncNotifier};
use crate::application::services::sync_error::{SyncError, SyncResult};
use crate::domain::entities::{
    AttendanceEntry, AttendanceRecord, AttendanceStats, AttendanceStatus,
};
use crate::domain::value_objects::{AttendanceRecordId, AttendeeName, ChecklistKey};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct AttendanceState {
    records: Vec<AttendanceRecord>,
    overlay: AttendanceOverlay,
    snapshot_epoch: u64,
}

impl AttendanceState {
    fn install(&mut self, records: Vec<AttendanceRecord>) -> usize {
        self.records = records;
        self.snapshot_epoch += 1;
        self.overlay.reconcile(&self.records)
    }
}

const MAX_REFRESH_ATTEMPTS: usize = 3;

/// セッション1つ分の出欠同期。チェックリストと同じく
/// 先にオーバーレイへ反映し、失敗時は元に戻す。
pub struct AttendanceSyncService {
    session_key: ChecklistKey,
    gateway: Arc<dyn AttendanceGateway>,
    notifier: Arc<dyn SyncNotifier>,
    state: RwLock<AttendanceState>,
}

impl AttendanceSyncService {
    pub fn new(
        session_key: ChecklistKey,
        gateway: Arc<dyn AttendanceGateway>,
        notifier: Arc<dyn SyncNotifier>,
    ) -> Self {
        Self {
            session_key,
            gateway,
            notifier,
            state: RwLock::new(AttendanceState::default()),
        }
    }

    pub fn session_key(&self) -> &ChecklistKey {
        &self.session_key
    }

    pub async fn view(&self) -> Vec<AttendanceEntry> {
        let state = self.state.read().await;
        state.overlay.merge(&state.records)
    }

    pub async fn stats(&self) -> AttendanceStats {
        AttendanceStats::from_entries(&self.view().await)
    }

    /// 取得中に新しいスナップショットが適用されていれば、読み取り結果を捨てて取り直す
    pub async fn refresh(&self) -> SyncResult<()> {
        for _ in 0..MAX_REFRESH_ATTEMPTS {
            let epoch = self.state.read().await.snapshot_epoch;
            let records = self.gateway.get_attendance(&self.session_key).await?;

            let dropped = {
                let mut state = self.state.write().await;
                (state.snapshot_epoch == epoch).then(|| state.install(records))
            };
            match dropped {
                Some(dropped) => {
                    self.log_reconcile(dropped);
                    return Ok(());
                }
                None => debug!(
                    "Discarded stale attendance read for {}, newer snapshot arrived",
                    self.session_key
                ),
            }
        }
        Ok(())
    }

    pub async fn apply_snapshot(&self, records: Vec<AttendanceRecord>) {
        if let Some(foreign) = records.iter().find(|r| r.session_key != self.session_key) {
            warn!(
                "Ignoring attendance snapshot containing session {} delivered to {}",
                foreign.session_key, self.session_key
            );
            return;
        }

        let dropped = self.state.write().await.install(records);
        self.log_reconcile(dropped);
    }

    fn log_reconcile(&self, dropped: usize) {
        if dropped > 0 {
            debug!(
                "Reconciled attendance overlay for {}: dropped {} entries",
                self.session_key, dropped
            );
        }
    }

    pub fn spawn_snapshot_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        let mut rx = self.gateway.subscribe_attendance(&self.session_key);

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(records) => service.apply_snapshot(records).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(
                            "Attendance listener for {} lagged by {} messages, resyncing",
                            service.session_key, skipped
                        );
                        if let Err(e) = service.refresh().await {
                            warn!("Failed to resync attendance {}: {}", service.session_key, e);
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            info!("Attendance listener for {} terminated", service.session_key);
        })
    }

    pub async fn mark(&self, attendee: &str, status: AttendanceStatus) -> SyncResult<AttendanceRecord> {
        let attendee = match AttendeeName::new(attendee) {
            Ok(name) => name,
            Err(msg) => return Err(self.reject(SyncError::Validation(msg))),
        };

        let generation = self
            .state
            .write()
            .await
            .overlay
            .begin_mark(attendee.clone(), status);

        let result = self
            .gateway
            .mark_attendance(&self.session_key, &attendee, status)
            .await;

        self.state
            .write()
            .await
            .overlay
            .settle_mark(&attendee, generation);

        match result {
            Ok(record) => {
                info!(
                    "Marked {} as {} in {}",
                    attendee,
                    status.as_str(),
                    self.session_key
                );
                self.notifier
                    .notify(SyncNotification::success("Attendance updated"));
                Ok(record)
            }
            Err(e) => {
                warn!("Rolled back attendance mark for {}: {}", attendee, e);
                Err(self.reject(SyncError::Remote(e)))
            }
        }
    }

    pub async fn remove(&self, record_id: &AttendanceRecordId) -> SyncResult<()> {
        {
            let mut state = self.state.write().await;
            if state.overlay.is_removing(record_id) {
                drop(state);
                debug!("Attendance record {} is already being removed", record_id);
                self.notifier.notify(SyncNotification::info(
                    "Attendance record is already being removed",
                ));
                return Ok(());
            }
            if !state.records.iter().any(|r| &r.id == record_id) {
                drop(state);
                return Err(self.reject(SyncError::ItemNotFound(record_id.to_string())));
            }
            state.overlay.begin_remove(record_id.clone());
        }

        match self.gateway.remove_attendance(record_id).await {
            Ok(()) => {
                info!("Removed attendance record {}", record_id);
                Ok(())
            }
            Err(e) => {
                self.state.write().await.overlay.rollback_remove(record_id);
                warn!("Rolled back attendance removal {}: {}", record_id, e);
                Err(self.reject(SyncError::Remote(e)))
            }
        }
    }

    fn reject(&self, err: SyncError) -> SyncError {
        self.notifier
            .notify(SyncNotification::error(err.to_string()));
        err
    }
}
