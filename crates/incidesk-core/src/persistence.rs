//! Fail-soft persistence of saved views over a key-value storage facility.
//!
//! Reads never fail: missing, unparsable or malformed data reads as "nothing
//! stored". Writes report failure as a `StorageError` value.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::StorageError;
use crate::storage::KeyValueStorage;
use crate::view::SavedView;

/// Keys every stored view config must carry
const CONFIG_KEYS: [&str; 5] = [
    "columnVisibility",
    "columnFilters",
    "columnFilterFns",
    "sorting",
    "globalFilter",
];

/// Structural check of stored view data before it is deserialized.
///
/// Accepts an array whose elements all have a non-null `id` and `name` and a
/// `config` object containing every view-config key.
pub fn validate_shape(data: &Value) -> bool {
    let Some(items) = data.as_array() else {
        return false;
    };

    items.iter().all(|item| {
        let Some(view) = item.as_object() else {
            return false;
        };
        let has = |key: &str| view.get(key).is_some_and(|v| !v.is_null());
        if !has("id") || !has("name") {
            return false;
        }
        match view.get("config").and_then(Value::as_object) {
            Some(config) => CONFIG_KEYS.iter().all(|key| config.contains_key(*key)),
            None => false,
        }
    })
}

/// Reads and writes the saved-view collection and active view id
#[derive(Debug)]
pub struct ViewPersistence<S> {
    storage: S,
    views_key: String,
    active_key: String,
    probe_key: String,
    /// Cached result of the availability probe
    available: Option<bool>,
}

impl<S: KeyValueStorage> ViewPersistence<S> {
    pub fn new(storage: S, config: &StoreConfig) -> Self {
        Self {
            storage,
            views_key: config.views_key(),
            active_key: config.active_view_key(),
            probe_key: config.probe_key(),
            available: None,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Load the stored collection, or an empty one if nothing valid is stored
    pub fn read_views(&self) -> Vec<SavedView> {
        let raw = match self.storage.get(&self.views_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(key = %self.views_key, error = %err, "Failed to read saved views");
                return Vec::new();
            }
        };

        let data: Value = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(err) => {
                warn!(key = %self.views_key, error = %err, "Stored saved views are not valid JSON");
                return Vec::new();
            }
        };

        if !validate_shape(&data) {
            warn!(key = %self.views_key, "Stored saved views have an unexpected shape");
            return Vec::new();
        }

        match serde_json::from_value::<Vec<SavedView>>(data) {
            Ok(views) => {
                debug!(count = views.len(), "Loaded saved views");
                views
            }
            Err(err) => {
                warn!(key = %self.views_key, error = %err, "Failed to decode saved views");
                Vec::new()
            }
        }
    }

    pub fn write_views(&mut self, views: &[SavedView]) -> Result<(), StorageError> {
        let json = serde_json::to_string(views)?;
        self.storage.set(&self.views_key, &json).inspect_err(|err| {
            warn!(key = %self.views_key, error = %err, "Failed to write saved views");
        })
    }

    /// Load the stored active view id; anything but a JSON string reads as `None`
    pub fn read_active_view_id(&self) -> Option<String> {
        let raw = match self.storage.get(&self.active_key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key = %self.active_key, error = %err, "Failed to read active view id");
                return None;
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::String(id)) => Some(id),
            Ok(Value::Null) => None,
            Ok(other) => {
                warn!(key = %self.active_key, value = %other, "Ignoring malformed active view id");
                None
            }
            Err(err) => {
                warn!(key = %self.active_key, error = %err, "Stored active view id is not valid JSON");
                None
            }
        }
    }

    pub fn write_active_view_id(&mut self, id: Option<&str>) -> Result<(), StorageError> {
        let json = serde_json::to_string(&id)?;
        self.storage.set(&self.active_key, &json).inspect_err(|err| {
            warn!(key = %self.active_key, error = %err, "Failed to write active view id");
        })
    }

    /// Probe the storage with a scratch write and remove. The result is cached
    /// until [`reset_availability_cache`](Self::reset_availability_cache).
    pub fn is_storage_available(&mut self) -> bool {
        if let Some(available) = self.available {
            return available;
        }

        let probe_key = self.probe_key.clone();
        let available = self
            .storage
            .set(&probe_key, "1")
            .and_then(|()| self.storage.remove(&probe_key))
            .map_err(|err| warn!(error = %err, "Storage probe failed"))
            .is_ok();

        self.available = Some(available);
        available
    }

    pub fn reset_availability_cache(&mut self) {
        self.available = None;
    }
}
