#![allow(dead_code)]

pub mod mocks;

use checklist_sync::test_support::application::ports::{
    ChecklistGateway, SyncNotification, SyncNotifier,
};
use checklist_sync::test_support::application::services::ChecklistSyncService;
use checklist_sync::test_support::domain::entities::ChecklistEntry;
use checklist_sync::test_support::domain::value_objects::{ChecklistKey, ItemText};
use checklist_sync::test_support::infrastructure::database::{ConnectionPool, SqliteRepository};
use checklist_sync::test_support::shared::config::SyncConfig;
use mocks::GatedGateway;
use std::sync::{Arc, Mutex};
use tokio::time::{Duration, sleep, timeout};

pub const DEFAULT_WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<SyncNotification>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<SyncNotification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl SyncNotifier for RecordingNotifier {
    fn notify(&self, notification: SyncNotification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

pub struct SyncTestContext {
    pub key: ChecklistKey,
    pub repository: Arc<SqliteRepository>,
    pub gateway: Arc<GatedGateway>,
    pub notifier: Arc<RecordingNotifier>,
    pub service: Arc<ChecklistSyncService>,
}

pub async fn setup_repository() -> Arc<SqliteRepository> {
    let pool = ConnectionPool::from_memory().await.expect("in-memory sqlite");
    let repository = Arc::new(SqliteRepository::new(pool, 32));
    repository.initialize().await.expect("migrations");
    repository
}

/// 作成済みチェックリストと、購読中の同期サービスを用意する
pub async fn setup_sync(key: &str, items: &[&str]) -> SyncTestContext {
    let key = ChecklistKey::new(key.to_string()).expect("key");
    let repository = setup_repository().await;
    repository
        .create_checklist(&key, "Test checklist")
        .await
        .expect("create checklist");
    for text in items {
        repository
            .add_item(&key, &ItemText::new(text).expect("text"), None)
            .await
            .expect("seed item");
    }

    let gateway = Arc::new(GatedGateway::new(
        repository.clone() as Arc<dyn ChecklistGateway>
    ));
    let notifier = Arc::new(RecordingNotifier::default());
    let service = Arc::new(ChecklistSyncService::new(
        key.clone(),
        gateway.clone(),
        notifier.clone(),
        &SyncConfig::default(),
    ));
    service.spawn_snapshot_listener();
    service.refresh().await.expect("initial refresh");

    SyncTestContext {
        key,
        repository,
        gateway,
        notifier,
        service,
    }
}

pub fn texts(view: &[ChecklistEntry]) -> Vec<String> {
    view.iter().map(|entry| entry.text.clone()).collect()
}

/// ビューが条件を満たすまで待つ（スナップショット配信は非同期）
pub async fn wait_for_view<F>(service: &ChecklistSyncService, mut predicate: F) -> Vec<ChecklistEntry>
where
    F: FnMut(&[ChecklistEntry]) -> bool,
{
    timeout(DEFAULT_WAIT, async {
        loop {
            let view = service.view().await;
            if predicate(&view) {
                return view;
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("view did not converge in time")
}
