use incidesk_core::{
    ColumnSort, MemoryStorage, SavedViewStore, TableState, TableViewState, DEFAULT_VIEW_CONFIG,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let storage = MemoryStorage::new();
    let mut store = SavedViewStore::new(storage.clone());

    // Example 1: Save the current table state as a view
    println!("=== Example 1: Save a view ===");
    let mut table = TableViewState::new();
    table.set_column_filter("severity", json!(["critical", "high"]));
    table.set_filter_fn("severity", "arrIncludesSome");
    table.set_sorting(vec![ColumnSort::desc("createdAt")]);
    table.set_column_visible("assignee", false);

    match store.save_table_as("Critical Issues", &table) {
        Ok(view) => println!("Saved '{}' with id {}", view.name, view.id),
        Err(err) => println!("Could not save view: {}", err),
    }

    // Example 2: Live name validation
    println!("\n=== Example 2: Validate names ===");
    for name in ["   ", "Critical Issues", "Open P1s"] {
        match store.validate_name(name, None) {
            Ok(()) => println!("  '{}' -> ok", name),
            Err(err) => println!("  '{}' -> {}", name, err),
        }
    }

    // Example 3: Switch between views
    println!("\n=== Example 3: Apply views ===");
    table.apply(&DEFAULT_VIEW_CONFIG);
    let first_id = store.saved_views().first().map(|v| v.id.clone());
    if let Some(id) = first_id {
        if store.apply_view_to(Some(&id), &mut table).is_ok() {
            println!("Active view: {:?}", store.active_view().map(|v| &v.name));
            println!("Filters now: {}", serde_json::to_string(&table.capture()).unwrap_or_default());
        }
    }
    if store.apply_view_to(None, &mut table).is_ok() {
        println!("Back to default view, table reset: {}", table == TableViewState::new());
    }

    // Example 4: Storage failure
    println!("\n=== Example 4: Storage failure ===");
    storage.set_fail_writes(true);
    let result = store.save_table_as("Will not persist", &table);
    println!(
        "Create result: {:?}, views: {}, storage: {}",
        result.map(|v| v.name),
        store.len(),
        store.storage_status().as_str()
    );
}
