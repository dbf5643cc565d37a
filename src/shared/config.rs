use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// 1チェックリストあたりのスナップショット配信バッファ
    pub snapshot_channel_capacity: usize,
    /// 変更通知 (ChecklistChange) のバッファ
    pub change_channel_capacity: usize,
    /// 追加・完了操作に記録する操作者名
    #[serde(default)]
    pub actor: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:data/checklist.db?mode=rwc".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            sync: SyncConfig::default(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            snapshot_channel_capacity: 64,
            change_channel_capacity: 128,
            actor: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        // 既定値
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("CHECKLIST_SYNC_DATABASE_URL") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.database.url = v.to_string();
            }
        }
        if let Ok(v) = std::env::var("CHECKLIST_SYNC_MAX_CONNECTIONS")
            && let Some(value) = parse_u32(&v)
        {
            cfg.database.max_connections = value.max(1);
        }
        if let Ok(v) = std::env::var("CHECKLIST_SYNC_CONNECTION_TIMEOUT")
            && let Some(value) = parse_u64(&v)
        {
            cfg.database.connection_timeout = value;
        }

        // 同期設定の環境変数反映
        if let Ok(v) = std::env::var("CHECKLIST_SYNC_SNAPSHOT_CAPACITY")
            && let Some(value) = parse_usize(&v)
        {
            cfg.sync.snapshot_channel_capacity = value.max(1);
        }
        if let Ok(v) = std::env::var("CHECKLIST_SYNC_CHANGE_CAPACITY")
            && let Some(value) = parse_usize(&v)
        {
            cfg.sync.change_channel_capacity = value.max(1);
        }
        if let Ok(v) = std::env::var("CHECKLIST_SYNC_ACTOR") {
            let v = v.trim();
            cfg.sync.actor = if v.is_empty() {
                None
            } else {
                Some(v.to_string())
            };
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.sync.snapshot_channel_capacity == 0 {
            return Err("Sync snapshot_channel_capacity must be greater than 0".to_string());
        }
        if self.sync.change_channel_capacity == 0 {
            return Err("Sync change_channel_capacity must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}
