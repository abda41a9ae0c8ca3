use chrono::{DateTime, Utc};
use incidesk_core::{Clock, KeyValueStorage, StorageError};
use wasm_bindgen::{JsCast, JsValue};

/// `window.localStorage`, or nothing when the page has no usable storage
/// (private mode, sandboxed iframe, non-window context)
pub struct BrowserStorage {
    storage: Option<web_sys::Storage>,
}

impl BrowserStorage {
    pub fn local() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self { storage }
    }

    fn handle(&self) -> Result<&web_sys::Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage is not accessible".to_string()))
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.handle()?
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(js_error_message(&err)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.handle()?
            .set_item(key, value)
            .map_err(|err| StorageError::WriteFailed {
                key: key.to_string(),
                reason: js_error_message(&err),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.handle()?
            .remove_item(key)
            .map_err(|err| StorageError::WriteFailed {
                key: key.to_string(),
                reason: js_error_message(&err),
            })
    }
}

/// Clock backed by `Date.now()`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
    }
}

/// Best-effort message from a thrown JS value (QuotaExceededError, SecurityError, ...)
fn js_error_message(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}
