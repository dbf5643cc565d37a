use checklist_sync::test_support::application::ports::ChecklistGateway;
use checklist_sync::test_support::domain::value_objects::{ChecklistKey, ItemText};
use checklist_sync::test_support::infrastructure::database::{ConnectionPool, SqliteRepository};
use checklist_sync::test_support::shared::config::DatabaseConfig;

#[tokio::test]
async fn file_backed_pool_persists_across_reconnects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checklist.db");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", path.display()),
        max_connections: 2,
        connection_timeout: 5,
    };
    let key = ChecklistKey::new("persisted".into()).unwrap();

    {
        let pool = ConnectionPool::from_config(&config).await.unwrap();
        let repository = SqliteRepository::new(pool.clone(), 4);
        repository.initialize().await.unwrap();
        assert!(repository.health_check().await.unwrap());
        repository.create_checklist(&key, "Persisted").await.unwrap();
        repository
            .add_item(&key, &ItemText::new("survives").unwrap(), None)
            .await
            .unwrap();
        pool.close().await;
    }

    let pool = ConnectionPool::from_config(&config).await.unwrap();
    let repository = SqliteRepository::new(pool, 4);
    repository.initialize().await.unwrap();
    let items = repository.get_checklist_items(&key).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].text, "survives");
}
