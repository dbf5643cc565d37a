use super::service::ChecklistSyncService;
use crate::application::ports::{ChecklistGateway, SyncNotifier};
use crate::domain::value_objects::ChecklistKey;
use crate::shared::config::SyncConfig;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

struct RegisteredService {
    service: Arc<ChecklistSyncService>,
    listener: JoinHandle<()>,
}

/// チェックリストキーごとに同期サービスを1つだけ保持する
pub struct ChecklistSyncRegistry {
    gateway: Arc<dyn ChecklistGateway>,
    notifier: Arc<dyn SyncNotifier>,
    config: SyncConfig,
    services: RwLock<HashMap<ChecklistKey, RegisteredService>>,
}

impl ChecklistSyncRegistry {
    pub fn new(
        gateway: Arc<dyn ChecklistGateway>,
        notifier: Arc<dyn SyncNotifier>,
        config: SyncConfig,
    ) -> Self {
        Self {
            gateway,
            notifier,
            config,
            services: RwLock::new(HashMap::new()),
        }
    }

    /// 既存のサービスを返すか、新規作成して購読と初回取得を行う
    pub async fn service_for(&self, key: &ChecklistKey) -> Arc<ChecklistSyncService> {
        if let Some(entry) = self.services.read().await.get(key) {
            return Arc::clone(&entry.service);
        }

        let service = {
            let mut services = self.services.write().await;
            if let Some(entry) = services.get(key) {
                return Arc::clone(&entry.service);
            }

            let service = Arc::new(ChecklistSyncService::new(
                key.clone(),
                Arc::clone(&self.gateway),
                Arc::clone(&self.notifier),
                &self.config,
            ));
            // 初回取得より先に購読しておき、その間の更新を取りこぼさない
            let listener = service.spawn_snapshot_listener();
            services.insert(
                key.clone(),
                RegisteredService {
                    service: Arc::clone(&service),
                    listener,
                },
            );
            service
        };

        if let Err(e) = service.refresh().await {
            warn!("Initial load of checklist {} failed: {}", key, e);
        }
        info!("Registered checklist sync service for {}", key);
        service
    }

    /// サービスを破棄し、購読タスクを止める
    pub async fn release(&self, key: &ChecklistKey) -> bool {
        match self.services.write().await.remove(key) {
            Some(entry) => {
                entry.listener.abort();
                true
            }
            None => false,
        }
    }

    pub async fn active_keys(&self) -> Vec<ChecklistKey> {
        let mut keys: Vec<ChecklistKey> = self.services.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Drop for ChecklistSyncRegistry {
    fn drop(&mut self) {
        for entry in self.services.get_mut().values() {
            entry.listener.abort();
        }
    }
}
