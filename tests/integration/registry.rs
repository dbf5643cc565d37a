use crate::common::{RecordingNotifier, setup_repository};
use checklist_sync::test_support::application::ports::ChecklistGateway;
use checklist_sync::test_support::application::services::ChecklistSyncRegistry;
use checklist_sync::test_support::domain::entities::ChecklistLifecycle;
use checklist_sync::test_support::domain::value_objects::ChecklistKey;
use checklist_sync::test_support::shared::config::SyncConfig;
use std::sync::Arc;

#[tokio::test]
async fn registry_hands_out_one_service_per_key() {
    let repository = setup_repository().await;
    let registry = ChecklistSyncRegistry::new(
        repository.clone() as Arc<dyn ChecklistGateway>,
        Arc::new(RecordingNotifier::default()),
        SyncConfig::default(),
    );
    let a = ChecklistKey::new("a".into()).unwrap();
    let b = ChecklistKey::new("b".into()).unwrap();

    let first = registry.service_for(&a).await;
    let second = registry.service_for(&a).await;
    let other = registry.service_for(&b).await;

    assert!(Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(registry.active_keys().await, vec![a.clone(), b.clone()]);

    assert!(registry.release(&a).await);
    assert!(!registry.release(&a).await);
    assert_eq!(registry.active_keys().await, vec![b]);
}

#[tokio::test]
async fn registered_service_loads_state_and_initializes_once() {
    let repository = setup_repository().await;
    let registry = ChecklistSyncRegistry::new(
        repository.clone() as Arc<dyn ChecklistGateway>,
        Arc::new(RecordingNotifier::default()),
        SyncConfig::default(),
    );
    let key = ChecklistKey::new("fresh".into()).unwrap();

    let service = registry.service_for(&key).await;
    assert_eq!(
        service.lifecycle().await,
        Some(ChecklistLifecycle::Nonexistent)
    );

    assert!(service.initialize(Some("Kickoff")).await.unwrap());
    assert!(!service.initialize(Some("Kickoff")).await.unwrap());

    service.refresh().await.unwrap();
    let state = service.checklist_state().await.unwrap();
    assert_eq!(state.lifecycle(), ChecklistLifecycle::Active);
    assert_eq!(state.title.as_deref(), Some("Kickoff"));
}
