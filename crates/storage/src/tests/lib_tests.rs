use super::*;

use shared::domain::{OrgId, OrgType, Role};

fn sample_org() -> Organization {
    Organization {
        id: OrgId(42),
        identifier: "acme".to_string(),
        name: "Acme Observability".to_string(),
        user_email: "alice@acme.test".to_string(),
        org_type: OrgType::Default,
    }
}

fn sample_user() -> CurrentUser {
    CurrentUser {
        email: "alice@acme.test".to_string(),
        first_name: "Alice".to_string(),
        last_name: "Nguyen".to_string(),
        role: Role::Member,
    }
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn organization_round_trips() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    assert_eq!(
        storage.load_selected_organization().await.expect("load"),
        None
    );

    storage
        .save_selected_organization(&sample_org())
        .await
        .expect("save");
    assert_eq!(
        storage.load_selected_organization().await.expect("load"),
        Some(sample_org())
    );
}

#[tokio::test]
async fn resave_overwrites_previous_organization() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    storage
        .save_selected_organization(&sample_org())
        .await
        .expect("save");

    let mut switched = sample_org();
    switched.id = OrgId(43);
    switched.identifier = "acme-staging".to_string();
    storage
        .save_selected_organization(&switched)
        .await
        .expect("resave");

    assert_eq!(
        storage.load_selected_organization().await.expect("load"),
        Some(switched)
    );
}

#[tokio::test]
async fn clear_removes_persisted_organization() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    storage
        .save_selected_organization(&sample_org())
        .await
        .expect("save");
    storage.clear_selected_organization().await.expect("clear");

    assert_eq!(
        storage.load_selected_organization().await.expect("load"),
        None
    );
}

#[tokio::test]
async fn current_user_round_trips() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    assert_eq!(storage.load_current_user().await.expect("load"), None);

    storage.save_current_user(&sample_user()).await.expect("save");
    assert_eq!(
        storage.load_current_user().await.expect("load"),
        Some(sample_user())
    );

    storage.clear_current_user().await.expect("clear");
    assert_eq!(storage.load_current_user().await.expect("load"), None);
}

#[tokio::test]
async fn keys_do_not_bleed_into_each_other() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    storage
        .save_selected_organization(&sample_org())
        .await
        .expect("save org");
    assert_eq!(storage.load_current_user().await.expect("load"), None);

    storage.clear_current_user().await.expect("clear user");
    assert_eq!(
        storage.load_selected_organization().await.expect("load"),
        Some(sample_org())
    );
}

#[tokio::test]
async fn creates_database_file_and_parent_dirs_when_missing() {
    let temp_root = tempfile::tempdir().expect("temp dir");
    let db_path = temp_root.path().join("nested").join("session.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    storage
        .save_selected_organization(&sample_org())
        .await
        .expect("save");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    let reopened = Storage::new(&database_url).await.expect("reopen");
    assert_eq!(
        reopened.load_selected_organization().await.expect("load"),
        Some(sample_org())
    );
}

#[tokio::test]
async fn serves_as_a_session_store_for_seeding() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .save_selected_organization(&sample_org())
        .await
        .expect("save");

    let store: &dyn SessionStore = &storage;
    assert_eq!(
        store.load_selected_organization().await.expect("load"),
        Some(sample_org())
    );
    assert_eq!(store.load_current_user().await.expect("load"), None);
}

#[test]
fn memory_and_foreign_urls_have_no_backing_file() {
    assert_eq!(file_backed_path("sqlite::memory:"), None);
    assert_eq!(file_backed_path("postgres://localhost/session"), None);
    assert_eq!(file_backed_path("sqlite://"), None);
}

#[test]
fn file_backed_url_strips_scheme_and_query() {
    assert_eq!(
        file_backed_path("sqlite://./data/session.db"),
        Some(PathBuf::from("./data/session.db"))
    );
    assert_eq!(
        file_backed_path("sqlite:./data/session.db?mode=rwc"),
        Some(PathBuf::from("./data/session.db"))
    );
}
