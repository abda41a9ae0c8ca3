use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::view::{ColumnFilter, ColumnSort, ViewConfig};

/// A holder of live table state that saved views are captured from and
/// applied to.
///
/// `capture` must return an independent copy of the current state. `apply`
/// must overwrite all five parts of the state so nothing from the previously
/// applied view survives.
pub trait TableState {
    fn capture(&self) -> ViewConfig;
    fn apply(&mut self, config: &ViewConfig);
}

/// Plain table state as a table component keeps it between renders
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableViewState {
    pub column_visibility: BTreeMap<String, bool>,
    pub column_filters: Vec<ColumnFilter>,
    pub column_filter_fns: BTreeMap<String, String>,
    pub sorting: Vec<ColumnSort>,
    pub global_filter: String,
}

impl TableViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_column_visible(&mut self, column: impl Into<String>, visible: bool) {
        self.column_visibility.insert(column.into(), visible);
    }

    /// Set or replace the filter on a column
    pub fn set_column_filter(&mut self, column: impl Into<String>, value: serde_json::Value) {
        let column = column.into();
        match self.column_filters.iter_mut().find(|f| f.id == column) {
            Some(filter) => filter.value = value,
            None => self.column_filters.push(ColumnFilter { id: column, value }),
        }
    }

    pub fn clear_column_filter(&mut self, column: &str) {
        self.column_filters.retain(|f| f.id != column);
    }

    pub fn set_filter_fn(&mut self, column: impl Into<String>, filter_fn: impl Into<String>) {
        self.column_filter_fns.insert(column.into(), filter_fn.into());
    }

    pub fn set_sorting(&mut self, sorting: Vec<ColumnSort>) {
        self.sorting = sorting;
    }

    pub fn set_global_filter(&mut self, query: impl Into<String>) {
        self.global_filter = query.into();
    }
}

impl TableState for TableViewState {
    fn capture(&self) -> ViewConfig {
        ViewConfig {
            column_visibility: self.column_visibility.clone(),
            column_filters: self.column_filters.clone(),
            column_filter_fns: self.column_filter_fns.clone(),
            sorting: self.sorting.clone(),
            global_filter: self.global_filter.clone(),
        }
    }

    fn apply(&mut self, config: &ViewConfig) {
        self.column_visibility = config.column_visibility.clone();
        self.column_filters = config.column_filters.clone();
        self.column_filter_fns = config.column_filter_fns.clone();
        self.sorting = config.sorting.clone();
        self.global_filter = config.global_filter.clone();
    }
}
