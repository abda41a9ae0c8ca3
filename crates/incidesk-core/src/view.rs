use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum number of saved views that may exist at once
pub const MAX_SAVED_VIEWS: usize = 50;
/// Maximum length of a view name (after trimming), in characters
pub const MAX_VIEW_NAME_LENGTH: usize = 100;

/// Baseline table configuration used when no saved view is active
pub const DEFAULT_VIEW_CONFIG: ViewConfig = ViewConfig {
    column_visibility: BTreeMap::new(),
    column_filters: Vec::new(),
    column_filter_fns: BTreeMap::new(),
    sorting: Vec::new(),
    global_filter: String::new(),
};

/// A filter applied to a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    /// Column identifier
    pub id: String,
    /// Filter value as the table component produced it
    pub value: serde_json::Value,
}

/// One entry of the table's sort order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    pub id: String,
    pub desc: bool,
}

impl ColumnSort {
    pub fn asc(id: impl Into<String>) -> Self {
        Self { id: id.into(), desc: false }
    }

    pub fn desc(id: impl Into<String>) -> Self {
        Self { id: id.into(), desc: true }
    }
}

/// Snapshot of the incident table's display state.
///
/// The store treats this as an opaque value: it is copied in and out and never
/// edited in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    /// Column id -> visible. Columns without an entry are visible.
    pub column_visibility: BTreeMap<String, bool>,
    pub column_filters: Vec<ColumnFilter>,
    /// Column id -> name of the filter predicate in use
    pub column_filter_fns: BTreeMap<String, String>,
    /// Sort precedence follows list order
    pub sorting: Vec<ColumnSort>,
    /// Free-text search; empty means no search
    pub global_filter: String,
}

impl ViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this config equals the default (no customisation)
    pub fn is_default(&self) -> bool {
        *self == DEFAULT_VIEW_CONFIG
    }

    /// Whether a column is shown under this config
    pub fn is_column_visible(&self, column: &str) -> bool {
        self.column_visibility.get(column).copied().unwrap_or(true)
    }
}

/// A named, persisted table configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedView {
    pub id: String,
    pub name: String,
    pub config: ViewConfig,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

/// ISO-8601 timestamps with millisecond precision (`2024-05-01T12:00:00.000Z`)
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}
