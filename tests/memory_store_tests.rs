
use portfolio_schema::repositories::{memory::MemoryStore, tag::TagRepository};
use test_utils::*;

#[tokio::test]
async fn test_project_with_tag_round_trip() {
    project_with_tag_round_trip(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_defaults_are_applied() {
    defaults_are_applied(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_explicit_values_override_defaults() {
    explicit_values_override_defaults(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    duplicate_username_is_rejected(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_concurrent_usernames_race() {
    concurrent_usernames_race(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_project_with_tags_is_all_or_nothing() {
    project_with_tags_is_all_or_nothing(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_duplicate_tag_and_skill_names_are_rejected() {
    duplicate_tag_and_skill_names_are_rejected(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_project_tag_requires_existing_rows() {
    project_tag_requires_existing_rows(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_project_tag_pair_is_unique() {
    project_tag_pair_is_unique(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_details_are_returned_in_display_order() {
    details_are_returned_in_display_order(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_detail_order_ties_break_by_identity() {
    detail_order_ties_break_by_identity(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_orphan_detail_is_rejected() {
    orphan_detail_is_rejected(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_deleting_experience_removes_details() {
    deleting_experience_removes_details(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_experiences_filter_by_kind() {
    experiences_filter_by_kind(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_replacing_tag_set() {
    replacing_tag_set(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_deleting_tag_or_project_unlinks() {
    deleting_tag_or_project_unlinks(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_identities_are_never_reused() {
    identities_are_never_reused(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_missing_rows_report_not_found() {
    missing_rows_report_not_found(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_clones_share_tables() {
    let store = MemoryStore::new();
    let handle = store.clone();
    defaults_are_applied(&store).await;

    assert_eq!(handle.list_tags().await.unwrap().len(), 1);
}
