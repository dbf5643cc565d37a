use crate::common::{setup_sync, texts, wait_for_view};
use checklist_sync::test_support::application::ports::{ChecklistGateway, NotificationLevel};
use checklist_sync::test_support::application::services::{ClearOutcome, SyncFailureKind};
use checklist_sync::test_support::domain::entities::{ChecklistLifecycle, EntryId};
use checklist_sync::test_support::domain::value_objects::ItemText;
use std::sync::Arc;
use tokio::time::{Duration, timeout};

#[tokio::test]
async fn add_item_shows_pending_row_then_converges() {
    let ctx = setup_sync("add-flow", &["A"]).await;

    ctx.gateway.hold_next();
    let service = Arc::clone(&ctx.service);
    let task = tokio::spawn(async move { service.add_item("B").await });
    ctx.gateway.wait_until_entered().await;

    // 呼び出し中: 楽観的な行が末尾に見える
    let in_flight = ctx.service.view().await;
    assert_eq!(texts(&in_flight), vec!["A", "B"]);
    assert!(!in_flight[0].is_optimistic);
    assert!(in_flight[1].is_optimistic);
    assert!(in_flight[1].is_pending);
    assert_eq!(in_flight[1].order, 1);

    ctx.gateway.release();
    let added = task.await.unwrap().unwrap();
    assert_eq!(added.order, 1);

    let settled = wait_for_view(&ctx.service, |view| {
        view.len() == 2 && view.iter().all(|entry| !entry.is_optimistic)
    })
    .await;
    assert_eq!(texts(&settled), vec!["A", "B"]);
    assert_eq!(settled[1].id, EntryId::Confirmed(added.id));
    assert!(ctx.service.overlay().await.is_empty());
}

#[tokio::test]
async fn failed_add_restores_view_and_keeps_text() {
    let ctx = setup_sync("add-failure", &["A"]).await;
    let before = ctx.service.view().await;

    ctx.gateway.fail_next();
    let err = ctx.service.add_item("  write notes  ").await.unwrap_err();

    assert_eq!(err.kind(), SyncFailureKind::Remote);
    assert!(err.is_retryable());
    assert_eq!(ctx.service.view().await, before);
    assert_eq!(
        ctx.service.take_failed_text().await.as_deref(),
        Some("  write notes  ")
    );
    let last = ctx.notifier.messages().pop().unwrap();
    assert_eq!(last.level, NotificationLevel::Error);
}

#[tokio::test]
async fn rejected_toggle_reverts_to_server_state() {
    let ctx = setup_sync("toggle-failure", &["A"]).await;
    let target = ctx.service.view().await[0].id.clone();

    ctx.gateway.hold_next();
    ctx.gateway.fail_next();
    let service = Arc::clone(&ctx.service);
    let toggle_target = target.clone();
    let task = tokio::spawn(async move { service.toggle_item(&toggle_target).await });
    ctx.gateway.wait_until_entered().await;

    let in_flight = ctx.service.view().await;
    assert!(in_flight[0].completed);
    assert!(in_flight[0].is_pending);

    ctx.gateway.release();
    assert!(task.await.unwrap().is_err());

    let after = ctx.service.view().await;
    assert!(!after[0].completed);
    assert!(!after[0].is_pending);
    let server = ctx.repository.get_checklist_items(&ctx.key).await.unwrap();
    assert!(!server[0].completed);
}

#[tokio::test]
async fn toggle_converges_with_server_snapshot() {
    let ctx = setup_sync("toggle-success", &["A", "B"]).await;
    let target = ctx.service.view().await[1].id.clone();

    ctx.service.toggle_item(&target).await.unwrap();

    let view = wait_for_view(&ctx.service, |view| view[1].completed && !view[1].is_pending).await;
    assert!(!view[0].completed);
    let stats = ctx.service.stats().await;
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.completion_percent, 50);
}

#[tokio::test]
async fn delete_hides_immediately_and_failure_restores() {
    let ctx = setup_sync("delete-flow", &["A", "B"]).await;
    let before = ctx.service.view().await;
    let target = before[0].id.clone();

    ctx.gateway.hold_next();
    ctx.gateway.fail_next();
    let service = Arc::clone(&ctx.service);
    let delete_target = target.clone();
    let task = tokio::spawn(async move { service.delete_item(&delete_target).await });
    ctx.gateway.wait_until_entered().await;

    assert_eq!(texts(&ctx.service.view().await), vec!["B"]);

    ctx.gateway.release();
    assert!(task.await.unwrap().is_err());
    assert_eq!(ctx.service.view().await, before);

    // 成功時は次のスナップショットで削除中IDが片付く
    ctx.service.delete_item(&target).await.unwrap();
    wait_for_view(&ctx.service, |view| view.len() == 1).await;
    timeout(Duration::from_secs(5), async {
        while !ctx.service.overlay().await.deleting_ids().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("deleting id was not pruned");
}

#[tokio::test]
async fn clear_completed_batches_confirmed_completed_items() {
    let ctx = setup_sync("clear-flow", &["A", "B", "C"]).await;

    let nothing = ctx.service.clear_completed().await.unwrap();
    assert_eq!(nothing, ClearOutcome::NothingToClear);
    assert_eq!(ctx.gateway.mutation_calls(), 0);

    let view = ctx.service.view().await;
    ctx.service.toggle_item(&view[0].id).await.unwrap();
    ctx.service.toggle_item(&view[2].id).await.unwrap();
    wait_for_view(&ctx.service, |view| {
        view.iter().filter(|entry| entry.completed && !entry.is_pending).count() == 2
    })
    .await;

    ctx.gateway.fail_next();
    let before = ctx.service.view().await;
    assert!(ctx.service.clear_completed().await.is_err());
    assert_eq!(ctx.service.view().await, before);

    let cleared = ctx.service.clear_completed().await.unwrap();
    assert_eq!(cleared, ClearOutcome::Cleared { deleted_count: 2 });
    let remaining = wait_for_view(&ctx.service, |view| view.len() == 1).await;
    assert_eq!(texts(&remaining), vec!["B"]);
}

#[tokio::test]
async fn reorder_applies_after_server_round_trip() {
    let ctx = setup_sync("reorder-flow", &["A", "B", "C"]).await;
    let dragged = ctx.service.view().await[2].id.clone();

    ctx.service.reorder(&dragged, 0).await.unwrap();

    let view = wait_for_view(&ctx.service, |view| view[0].id == dragged).await;
    assert_eq!(texts(&view), vec!["C", "A", "B"]);
    let orders: Vec<i64> = view.iter().map(|entry| entry.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[tokio::test]
async fn pushed_snapshot_from_another_client_updates_view() {
    let ctx = setup_sync("push-flow", &["A"]).await;

    ctx.repository
        .add_item(&ctx.key, &ItemText::new("from elsewhere").unwrap(), None)
        .await
        .unwrap();

    let view = wait_for_view(&ctx.service, |view| view.len() == 2).await;
    assert_eq!(texts(&view), vec!["A", "from elsewhere"]);
}

#[tokio::test]
async fn concluded_checklist_refuses_changes_until_reopened() {
    let ctx = setup_sync("lifecycle-flow", &["A"]).await;

    ctx.service.conclude().await.unwrap();
    timeout(Duration::from_secs(5), async {
        while ctx.service.lifecycle().await != Some(ChecklistLifecycle::Concluded) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("conclude was not observed");
    let calls = ctx.gateway.mutation_calls();

    let err = ctx.service.add_item("late").await.unwrap_err();
    assert_eq!(err.kind(), SyncFailureKind::Precondition);
    let target = ctx.service.view().await[0].id.clone();
    assert!(ctx.service.reorder(&target, 0).await.is_err());
    assert_eq!(ctx.gateway.mutation_calls(), calls);

    ctx.service.reopen().await.unwrap();
    timeout(Duration::from_secs(5), async {
        while ctx.service.lifecycle().await != Some(ChecklistLifecycle::Active) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("reopen was not observed");
    ctx.service.add_item("late").await.unwrap();
}

#[tokio::test]
async fn slow_refresh_does_not_bring_back_deleted_item() {
    let ctx = setup_sync("stale-refresh", &["A", "B"]).await;
    let target = ctx.service.view().await[1].id.clone();

    // 古い [A, B] を読み終えた状態で止める
    ctx.gateway.hold_next_items_read();
    let service = Arc::clone(&ctx.service);
    let refresh = tokio::spawn(async move { service.refresh().await });
    ctx.gateway.wait_until_entered().await;

    ctx.service.delete_item(&target).await.unwrap();
    timeout(Duration::from_secs(5), async {
        while !ctx.service.overlay().await.deleting_ids().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("deletion snapshot was not applied");
    assert_eq!(texts(&ctx.service.view().await), vec!["A"]);

    ctx.gateway.release();
    refresh.await.unwrap().unwrap();

    assert_eq!(texts(&ctx.service.view().await), vec!["A"]);
}

#[tokio::test]
async fn repeated_delete_while_in_flight_is_reported_without_second_call() {
    let ctx = setup_sync("delete-twice", &["A"]).await;
    let target = ctx.service.view().await[0].id.clone();

    ctx.gateway.hold_next();
    let service = Arc::clone(&ctx.service);
    let first_target = target.clone();
    let first = tokio::spawn(async move { service.delete_item(&first_target).await });
    ctx.gateway.wait_until_entered().await;

    ctx.service.delete_item(&target).await.unwrap();
    let last = ctx.notifier.messages().pop().unwrap();
    assert_eq!(last.level, NotificationLevel::Info);

    ctx.gateway.release();
    first.await.unwrap().unwrap();
    assert_eq!(ctx.gateway.mutation_calls(), 1);
}
