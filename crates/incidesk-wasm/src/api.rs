use incidesk_core::{
    NameValidation, SavedView, SavedViewStore, StoreConfig, UuidGenerator, ViewConfig, ViewError,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::storage::{BrowserClock, BrowserStorage};

type BrowserStore = SavedViewStore<BrowserStorage, BrowserClock, UuidGenerator>;

/// Saved-view store exposed to JavaScript.
///
/// Operations return `null`/`false` on failure; `getLastError()` describes
/// the most recent one.
#[wasm_bindgen]
pub struct SavedViewsEngine {
    store: BrowserStore,
    last_error: Option<JsViewError>,
}

/// Structured error object for JavaScript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsViewError {
    code: String,
    message: String,
}

impl From<&ViewError> for JsViewError {
    fn from(err: &ViewError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl JsViewError {
    fn invalid_config<E: std::fmt::Display>(err: E) -> Self {
        Self {
            code: "INVALID_CONFIG".to_string(),
            message: err.to_string(),
        }
    }

    fn to_js(&self) -> JsValue {
        to_js_value(self)
    }
}

/// Serialize with plain objects for maps, so configs arrive as JSON-shaped data
fn to_js_value<T: Serialize + ?Sized>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

/// Parse a view config sent from the table component
fn parse_config(config_json: &str) -> Result<ViewConfig, JsViewError> {
    serde_json::from_str(config_json).map_err(JsViewError::invalid_config)
}

fn views_to_json(views: &[SavedView]) -> String {
    serde_json::to_string(views).unwrap_or_else(|_| "[]".to_string())
}

fn config_to_json(config: &ViewConfig) -> String {
    serde_json::to_string(config).unwrap_or_else(|_| "{}".to_string())
}

#[wasm_bindgen]
impl SavedViewsEngine {
    /// Open saved views from `localStorage`. `options_json` may set
    /// `keyPrefix`, `maxSavedViews` and `maxNameLength`.
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: Option<String>) -> Result<SavedViewsEngine, JsValue> {
        let config = match options_json.as_deref() {
            Some(json) => StoreConfig::from_json(json)
                .map_err(|err| JsViewError::invalid_config(err).to_js())?,
            None => StoreConfig::default(),
        };

        let store = SavedViewStore::with_parts(BrowserStorage::local(), BrowserClock, UuidGenerator, config);

        Ok(Self {
            store,
            last_error: None,
        })
    }

    /// All saved views as a JSON array
    #[wasm_bindgen(js_name = getSavedViews)]
    pub fn get_saved_views(&self) -> String {
        views_to_json(self.store.saved_views())
    }

    #[wasm_bindgen(js_name = getView)]
    pub fn get_view(&self, id: &str) -> JsValue {
        match self.store.get_view(id) {
            Some(view) => to_js_value(view),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = getActiveViewId)]
    pub fn get_active_view_id(&self) -> Option<String> {
        self.store.active_view_id().map(str::to_string)
    }

    /// Config of the active view (or the default view) as JSON
    #[wasm_bindgen(js_name = getActiveConfig)]
    pub fn get_active_config(&self) -> String {
        config_to_json(&self.store.active_config())
    }

    /// "full", "session" or "none"
    #[wasm_bindgen(js_name = getStorageStatus)]
    pub fn get_storage_status(&self) -> String {
        self.store.storage_status().as_str().to_string()
    }

    #[wasm_bindgen(js_name = isAtCapacity)]
    pub fn is_at_capacity(&self) -> bool {
        self.store.is_at_capacity()
    }

    #[wasm_bindgen(js_name = getMaxSavedViews)]
    pub fn get_max_saved_views(&self) -> usize {
        self.store.config().max_saved_views
    }

    /// Returns `{ valid, error? }`
    #[wasm_bindgen(js_name = validateName)]
    pub fn validate_name(&self, name: &str, exclude_id: Option<String>) -> JsValue {
        let result: NameValidation = self.store.validate_name(name, exclude_id.as_deref()).into();
        to_js_value(&result)
    }

    /// Create a view; returns the new view or `null`
    #[wasm_bindgen(js_name = createView)]
    pub fn create_view(&mut self, name: &str, config_json: &str) -> JsValue {
        let config = match self.config_arg(config_json) {
            Some(config) => config,
            None => return JsValue::NULL,
        };

        match self.store.create_view(name, config) {
            Ok(view) => {
                self.last_error = None;
                to_js_value(&view)
            }
            Err(err) => {
                self.record(&err);
                JsValue::NULL
            }
        }
    }

    #[wasm_bindgen(js_name = updateView)]
    pub fn update_view(&mut self, id: &str, config_json: &str) -> bool {
        let Some(config) = self.config_arg(config_json) else {
            return false;
        };
        let result = self.store.update_view(id, config);
        self.finish(result)
    }

    #[wasm_bindgen(js_name = renameView)]
    pub fn rename_view(&mut self, id: &str, new_name: &str) -> bool {
        let result = self.store.rename_view(id, new_name);
        self.finish(result)
    }

    #[wasm_bindgen(js_name = deleteView)]
    pub fn delete_view(&mut self, id: &str) -> bool {
        let result = self.store.delete_view(id);
        self.finish(result)
    }

    /// Activate a view (`null` for the default view); returns its config or `null`
    #[wasm_bindgen(js_name = applyView)]
    pub fn apply_view(&mut self, id: Option<String>) -> JsValue {
        match self.store.apply_view(id.as_deref()) {
            Ok(config) => {
                self.last_error = None;
                to_js_value(&config)
            }
            Err(err) => {
                self.record(&err);
                JsValue::NULL
            }
        }
    }

    /// Check storage availability again and update the storage
    /// status to match
    #[wasm_bindgen(js_name = resetStorageProbe)]
    pub fn recheck_storage(&mut self) -> bool {
        self.store.recheck_storage()
    }

    /// `{ code, message }` of the last failed operation, or `null`
    #[wasm_bindgen(js_name = getLastError)]
    pub fn get_last_error(&self) -> JsValue {
        match &self.last_error {
            Some(err) => err.to_js(),
            None => JsValue::NULL,
        }
    }

    fn config_arg(&mut self, config_json: &str) -> Option<ViewConfig> {
        match parse_config(config_json) {
            Ok(config) => Some(config),
            Err(err) => {
                web_sys::console::error_1(&format!("Invalid view config: {}", err.message).into());
                self.last_error = Some(err);
                None
            }
        }
    }

    fn finish(&mut self, result: Result<(), ViewError>) -> bool {
        match result {
            Ok(()) => {
                self.last_error = None;
                true
            }
            Err(err) => {
                self.record(&err);
                false
            }
        }
    }

    fn record(&mut self, err: &ViewError) {
        if let ViewError::Persistence(_) = err {
            web_sys::console::warn_1(&format!("Saved views: {}", err).into());
        }
        self.last_error = Some(JsViewError::from(err));
    }
}
