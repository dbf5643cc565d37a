use crate::common::{RecordingNotifier, setup_repository};
use checklist_sync::test_support::application::ports::AttendanceGateway;
use checklist_sync::test_support::application::services::AttendanceSyncService;
use checklist_sync::test_support::domain::entities::AttendanceStatus;
use checklist_sync::test_support::domain::value_objects::ChecklistKey;
use std::sync::Arc;
use tokio::time::{Duration, sleep, timeout};

#[tokio::test]
async fn marks_and_removals_round_trip_through_snapshots() {
    let repository = setup_repository().await;
    let session = ChecklistKey::new("weekly-sync".into()).unwrap();
    let service = Arc::new(AttendanceSyncService::new(
        session.clone(),
        repository.clone() as Arc<dyn AttendanceGateway>,
        Arc::new(RecordingNotifier::default()),
    ));
    service.spawn_snapshot_listener();
    service.refresh().await.unwrap();

    let ada = service
        .mark("Ada Lovelace", AttendanceStatus::Attending)
        .await
        .unwrap();
    service
        .mark("Grace Hopper", AttendanceStatus::NotAttending)
        .await
        .unwrap();
    let changed = service
        .mark("ada lovelace", AttendanceStatus::NotAttending)
        .await
        .unwrap();
    assert_eq!(ada.id, changed.id);

    timeout(Duration::from_secs(5), async {
        loop {
            let stats = service.stats().await;
            if stats.total == 2 && stats.not_attending == 2 && stats.pending == 0 {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("attendance did not converge");

    let view = service.view().await;
    let names: Vec<&str> = view.iter().map(|entry| entry.attendee.as_str()).collect();
    assert_eq!(names, vec!["ada lovelace", "Grace Hopper"]);

    service.remove(&changed.id).await.unwrap();
    timeout(Duration::from_secs(5), async {
        while service.view().await.len() != 1 {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("removal did not converge");
    assert_eq!(repository.get_attendance(&session).await.unwrap().len(), 1);
}
