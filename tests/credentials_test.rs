use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;

use vkmcli::management::{CredentialsManager, CredentialsUpdate};

// Helper function to create a store inside a temporary directory
fn create_test_store(dir: &TempDir) -> CredentialsManager {
    CredentialsManager::new(dir.path().join("credentials.json"))
}

fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("credentials.json")
}

#[test]
fn test_initial_state() {
    let dir = TempDir::new().unwrap();
    let store = create_test_store(&dir);

    assert!(!store.has_credentials());
    assert_eq!(store.get_access_token(), None);
    assert_eq!(store.get_refresh_token(), None);
    assert_eq!(store.get_client_user_id(), None);
    assert_eq!(store.get_user_profile(), None);
}

#[test]
fn test_update_and_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut store = create_test_store(&dir);

    let mut profile = serde_json::Map::new();
    profile.insert("name".to_string(), json!("Test User"));

    store.update(CredentialsUpdate {
        access_token: Some("test_token".to_string()),
        refresh_token: Some("test_refresh".to_string()),
        client_user_id: Some("test_user_id".to_string()),
        user_agent: Some("test_user_agent".to_string()),
        user_profile: Some(profile.clone()),
    });

    assert!(store.has_credentials());
    assert_eq!(store.get_access_token().as_deref(), Some("test_token"));
    assert_eq!(store.get_refresh_token().as_deref(), Some("test_refresh"));
    assert_eq!(store.get_client_user_id().as_deref(), Some("test_user_id"));
    assert_eq!(store.get_user_profile(), Some(profile));

    // The file holds the same data and survives a reload
    let content = std::fs::read_to_string(store_path(&dir)).unwrap();
    let data: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(data["access_token"], "test_token");

    let reloaded = create_test_store(&dir);
    assert_eq!(reloaded.get_access_token().as_deref(), Some("test_token"));
}

#[test]
fn test_partial_update_preserves_other_fields() {
    let dir = TempDir::new().unwrap();
    let mut store = create_test_store(&dir);

    store.update(CredentialsUpdate {
        access_token: Some("first_token".to_string()),
        client_user_id: Some("user".to_string()),
        ..Default::default()
    });
    store.update(CredentialsUpdate {
        access_token: Some("second_token".to_string()),
        ..Default::default()
    });

    assert_eq!(store.get_access_token().as_deref(), Some("second_token"));
    assert_eq!(store.get_client_user_id().as_deref(), Some("user"));
}

#[test]
fn test_clear_credentials() {
    let dir = TempDir::new().unwrap();
    let mut store = create_test_store(&dir);

    store.update(CredentialsUpdate {
        access_token: Some("test_token".to_string()),
        ..Default::default()
    });
    store.clear();

    assert!(!store.has_credentials());
    assert_eq!(store.get_access_token(), None);

    let reloaded = create_test_store(&dir);
    assert!(!reloaded.has_credentials());
}

#[test]
fn test_empty_access_token_counts_as_no_credentials() {
    let dir = TempDir::new().unwrap();
    let mut store = create_test_store(&dir);

    store.update(CredentialsUpdate {
        access_token: Some(String::new()),
        ..Default::default()
    });

    assert!(!store.has_credentials());
}

#[test]
fn test_user_agent_selection_priority() {
    let dir = TempDir::new().unwrap();
    let mut store = create_test_store(&dir);

    // Cached value wins over everything, verbatim
    store.update(CredentialsUpdate {
        user_agent: Some("cached_agent".to_string()),
        ..Default::default()
    });
    assert_eq!(store.get_user_agent(None), "cached_agent");
    assert_eq!(store.get_user_agent(Some("configured_agent")), "cached_agent");

    // Configured value wins when nothing is cached
    store.clear();
    assert_eq!(
        store.get_user_agent(Some("configured_agent")),
        "configured_agent"
    );

    // With neither, a non-empty preset is selected
    let user_agent = store.get_user_agent(None);
    assert!(!user_agent.is_empty());
}
