#![cfg(target_arch = "wasm32")]

use incidesk_core::{
    KeyValueStorage, SavedView, SavedViewStore, StorageStatus, ViewConfig, DEFAULT_VIEW_CONFIG,
};
use incidesk_wasm::{BrowserClock, BrowserStorage, SavedViewsEngine};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const PREFIX_OPTIONS: &str = r#"{ "keyPrefix": "incidesk-test:" }"#;

fn clear_test_keys() {
    let mut storage = BrowserStorage::local();
    storage.remove("incidesk-test:saved-views").unwrap();
    storage.remove("incidesk-test:active-view-id").unwrap();
}

#[wasm_bindgen_test]
fn test_init_installs_console_subscriber() {
    incidesk_wasm::init();
    incidesk_wasm::init();
    assert!(tracing::dispatcher::has_been_set());
}

#[wasm_bindgen_test]
fn test_browser_storage_round_trip() {
    let mut storage = BrowserStorage::local();
    storage.set("incidesk-test:scratch", "1").unwrap();
    assert_eq!(storage.get("incidesk-test:scratch").unwrap(), Some("1".to_string()));
    storage.remove("incidesk-test:scratch").unwrap();
    assert_eq!(storage.get("incidesk-test:scratch").unwrap(), None);
}

#[wasm_bindgen_test]
fn test_store_over_local_storage() {
    clear_test_keys();
    let config = incidesk_core::StoreConfig::default().with_key_prefix("incidesk-test:");
    let mut store = SavedViewStore::with_parts(
        BrowserStorage::local(),
        BrowserClock,
        incidesk_core::UuidGenerator,
        config,
    );
    assert_eq!(store.storage_status(), StorageStatus::Full);

    let view = store.create_view("Critical Issues", ViewConfig::new()).unwrap();
    let raw = BrowserStorage::local();
    let stored: Vec<SavedView> =
        serde_json::from_str(&raw.get("incidesk-test:saved-views").unwrap().unwrap()).unwrap();
    assert_eq!(stored, vec![view.clone()]);

    store.apply_view(Some(&view.id)).unwrap();
    assert_eq!(
        raw.get("incidesk-test:active-view-id").unwrap(),
        Some(format!("\"{}\"", view.id))
    );

    store.apply_view(None).unwrap();
    assert_eq!(raw.get("incidesk-test:active-view-id").unwrap(), Some("null".to_string()));
    clear_test_keys();
}

#[wasm_bindgen_test]
fn test_engine_create_and_apply() {
    clear_test_keys();
    let mut engine = SavedViewsEngine::new(Some(PREFIX_OPTIONS.to_string())).unwrap();
    let config = serde_json::to_string(&ViewConfig::new()).unwrap();

    let view = engine.create_view("Critical Issues", &config);
    assert!(!view.is_null());
    assert!(engine.create_view("  Critical Issues ", &config).is_null());
    assert!(!engine.get_last_error().is_null());

    let views: Vec<SavedView> = serde_json::from_str(&engine.get_saved_views()).unwrap();
    assert_eq!(views.len(), 1);

    assert!(!engine.apply_view(Some(views[0].id.clone())).is_null());
    assert_eq!(engine.get_active_view_id(), Some(views[0].id.clone()));
    assert!(engine.delete_view(&views[0].id));
    assert_eq!(engine.get_active_view_id(), None);
    assert_eq!(engine.get_storage_status(), "full");
    clear_test_keys();
}

#[wasm_bindgen_test]
fn test_engine_apply_default_view() {
    clear_test_keys();
    let mut engine = SavedViewsEngine::new(Some(PREFIX_OPTIONS.to_string())).unwrap();
    let config = serde_json::to_string(&ViewConfig {
        global_filter: "db".to_string(),
        ..ViewConfig::new()
    })
    .unwrap();

    let view: SavedView = serde_wasm_bindgen::from_value(engine.create_view("Database", &config)).unwrap();
    assert!(!engine.apply_view(Some(view.id.clone())).is_null());
    let active: ViewConfig = serde_json::from_str(&engine.get_active_config()).unwrap();
    assert_eq!(active.global_filter, "db");

    let applied: ViewConfig = serde_wasm_bindgen::from_value(engine.apply_view(None)).unwrap();
    assert_eq!(applied, DEFAULT_VIEW_CONFIG);
    assert_eq!(engine.get_active_view_id(), None);
    let active: ViewConfig = serde_json::from_str(&engine.get_active_config()).unwrap();
    assert_eq!(active, DEFAULT_VIEW_CONFIG);
    clear_test_keys();
}
