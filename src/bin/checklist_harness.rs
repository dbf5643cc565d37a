use std::path::{Path, PathBuf};
use std::sync::Arc;

use checklist_sync::application::ports::{AttendanceGateway, ChecklistGateway};
use checklist_sync::domain::entities::{AttendanceStatus, ChecklistEntry, ChecklistStats};
use checklist_sync::domain::value_objects::ChecklistKey;
use checklist_sync::infrastructure::database::{ConnectionPool, SqliteRepository};
use checklist_sync::infrastructure::notification::TracingNotifier;
use checklist_sync::{AppConfig, AttendanceSyncService, ChecklistSyncRegistry, init_logging};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone)]
struct HarnessConfig {
    checklist_key: String,
    title: Option<String>,
    items: Vec<String>,
    toggle_first: usize,
    clear_completed: bool,
    conclude: bool,
    attendees: Vec<String>,
    summary_path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct HarnessSummary {
    checklist_key: String,
    lifecycle: String,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    view: Vec<ChecklistEntry>,
    stats: ChecklistStats,
    attending: usize,
    failures: Vec<String>,
}

fn parse_env_list(raw: Option<String>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

fn parse_env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn parse_required_string(key: &str, default_value: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default_value.to_string())
}

fn build_config() -> HarnessConfig {
    HarnessConfig {
        checklist_key: parse_required_string("CHECKLIST_HARNESS_KEY", "harness"),
        title: std::env::var("CHECKLIST_HARNESS_TITLE").ok(),
        items: parse_env_list(std::env::var("CHECKLIST_HARNESS_ITEMS").ok()),
        toggle_first: std::env::var("CHECKLIST_HARNESS_TOGGLE_FIRST")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0),
        clear_completed: parse_env_flag("CHECKLIST_HARNESS_CLEAR_COMPLETED"),
        conclude: parse_env_flag("CHECKLIST_HARNESS_CONCLUDE"),
        attendees: parse_env_list(std::env::var("CHECKLIST_HARNESS_ATTENDEES").ok()),
        summary_path: std::env::var("CHECKLIST_HARNESS_SUMMARY_PATH")
            .ok()
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .map(PathBuf::from),
    }
}

/// `sqlite:` URL のファイルパスから親ディレクトリを作る
fn ensure_database_dir(url: &str) -> anyhow::Result<()> {
    let path = url
        .trim_start_matches("sqlite:")
        .trim_start_matches("//")
        .split('?')
        .next()
        .unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let app_config = AppConfig::from_env();
    app_config
        .validate()
        .map_err(|err| anyhow::anyhow!("invalid configuration: {err}"))?;
    let cfg = build_config();
    let key = ChecklistKey::new(cfg.checklist_key.clone())
        .map_err(|err| anyhow::anyhow!("invalid checklist key: {err}"))?;
    let started_at = Utc::now();

    ensure_database_dir(&app_config.database.url)?;
    let pool = ConnectionPool::from_config(&app_config.database).await?;
    let repository = Arc::new(SqliteRepository::new(
        pool.clone(),
        app_config.sync.snapshot_channel_capacity,
    ));
    repository.initialize().await?;

    let notifier = Arc::new(TracingNotifier);
    let registry = ChecklistSyncRegistry::new(
        Arc::clone(&repository) as Arc<dyn ChecklistGateway>,
        notifier.clone(),
        app_config.sync.clone(),
    );
    let service = registry.service_for(&key).await;
    let mut failures = Vec::new();

    if service.initialize(cfg.title.as_deref()).await? {
        info!("Created checklist {}", key);
    }

    for text in &cfg.items {
        if let Err(e) = service.add_item(text).await {
            warn!("Failed to add {:?}: {}", text, e);
            failures.push(e.to_string());
        }
    }

    let targets: Vec<_> = service
        .view()
        .await
        .into_iter()
        .filter(|entry| !entry.completed)
        .take(cfg.toggle_first)
        .map(|entry| entry.id)
        .collect();
    for id in &targets {
        if let Err(e) = service.toggle_item(id).await {
            failures.push(e.to_string());
        }
    }

    if cfg.clear_completed
        && let Err(e) = service.clear_completed().await
    {
        failures.push(e.to_string());
    }

    let attendance = AttendanceSyncService::new(
        key.clone(),
        Arc::clone(&repository) as Arc<dyn AttendanceGateway>,
        notifier,
    );
    for attendee in &cfg.attendees {
        if let Err(e) = attendance.mark(attendee, AttendanceStatus::Attending).await {
            failures.push(e.to_string());
        }
    }
    attendance.refresh().await?;

    if cfg.conclude
        && let Err(e) = service.conclude().await
    {
        failures.push(e.to_string());
    }

    service.refresh().await?;
    let summary = HarnessSummary {
        checklist_key: key.to_string(),
        lifecycle: service
            .lifecycle()
            .await
            .map_or("unknown", |lifecycle| lifecycle.as_str())
            .to_string(),
        started_at,
        finished_at: Utc::now(),
        view: service.view().await,
        stats: service.stats().await,
        attending: attendance.stats().await.attending,
        failures,
    };

    let json = serde_json::to_string_pretty(&summary)?;
    match &cfg.summary_path {
        Some(path) => {
            std::fs::write(path, &json)?;
            info!("Wrote harness summary to {}", path.display());
        }
        None => println!("{json}"),
    }

    registry.release(&key).await;
    pool.close().await;
    Ok(())
}
