use serde::{Deserialize, Serialize};

use crate::view::{MAX_SAVED_VIEWS, MAX_VIEW_NAME_LENGTH};

/// Storage key holding the saved-view collection
pub const SAVED_VIEWS_KEY: &str = "saved-views";
/// Storage key holding the active view id
pub const ACTIVE_VIEW_ID_KEY: &str = "active-view-id";

/// Saved-view store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct StoreConfig {
    /// Namespace prepended to every storage key
    pub key_prefix: String,
    pub max_saved_views: usize,
    pub max_name_length: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key_prefix: String::new(),
            max_saved_views: MAX_SAVED_VIEWS,
            max_name_length: MAX_VIEW_NAME_LENGTH,
        }
    }
}

impl StoreConfig {
    /// Parse a JSON options object; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn views_key(&self) -> String {
        format!("{}{}", self.key_prefix, SAVED_VIEWS_KEY)
    }

    pub fn active_view_key(&self) -> String {
        format!("{}{}", self.key_prefix, ACTIVE_VIEW_ID_KEY)
    }

    pub(crate) fn probe_key(&self) -> String {
        format!("{}__storage_probe__", self.key_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys() {
        let config = StoreConfig::default();
        assert_eq!(config.views_key(), "saved-views");
        assert_eq!(config.active_view_key(), "active-view-id");
        assert_eq!(config.max_saved_views, 50);
        assert_eq!(config.max_name_length, 100);
    }

    #[test]
    fn test_prefixed_keys() {
        let config = StoreConfig::default().with_key_prefix("incidesk:");
        assert_eq!(config.views_key(), "incidesk:saved-views");
        assert_eq!(config.active_view_key(), "incidesk:active-view-id");
    }

    #[test]
    fn test_from_json_partial() {
        let config = StoreConfig::from_json(r#"{ "keyPrefix": "app/", "maxSavedViews": 5 }"#).unwrap();
        assert_eq!(config.key_prefix, "app/");
        assert_eq!(config.max_saved_views, 5);
        assert_eq!(config.max_name_length, 100);

        assert_eq!(StoreConfig::from_json("{}").unwrap(), StoreConfig::default());
        assert!(StoreConfig::from_json("not json").is_err());
    }
}
