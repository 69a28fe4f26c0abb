//! Allow-list persistence
//! Loading from a missing file and saving into fresh directories

use stepwise::{
    UserId,
    domain::repositories::AccessPolicy,
    infrastructure::{AllowList, AllowListData},
};

#[tokio::test]
async fn missing_file_loads_empty_list() {
    let temp_dir = tempfile::tempdir().unwrap();
    let list = AllowList::load(temp_dir.path().join("allow.json")).await.unwrap();

    assert!(list.users().await.is_empty());
    assert_eq!(list.snapshot().await, AllowListData::default());
    assert!(!list.is_allowed(UserId::new(1)).await);
}

#[tokio::test]
async fn save_creates_parent_directories_and_round_trips() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config").join("access").join("allow.json");

    let list = AllowList::load(&path).await.unwrap();
    list.add_user(UserId::new(7)).await;
    list.add_admin(UserId::new(1)).await;
    list.save(&path).await.unwrap();
    assert!(path.exists());

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["whitelist"], serde_json::json!([7]));
    assert_eq!(raw["admin_ids"], serde_json::json!([1]));

    let reloaded = AllowList::load(&path).await.unwrap();
    assert_eq!(reloaded.snapshot().await, list.snapshot().await);
    assert!(reloaded.is_allowed(UserId::new(7)).await);
    assert!(reloaded.is_admin(UserId::new(1)).await);
}

#[tokio::test]
async fn malformed_file_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("allow.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(AllowList::load(&path).await.is_err());
}
