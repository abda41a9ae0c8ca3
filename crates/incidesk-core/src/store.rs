use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::{next_timestamp, Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::{NameError, StorageError, ViewError};
use crate::id::{IdGenerator, UuidGenerator};
use crate::persistence::ViewPersistence;
use crate::storage::KeyValueStorage;
use crate::table::TableState;
use crate::validation::validate_view_name;
use crate::view::{SavedView, ViewConfig, DEFAULT_VIEW_CONFIG};

/// How far saved-view changes currently reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageStatus {
    /// Changes are written to storage and survive a reload
    Full,
    /// Storage was unavailable at startup; changes live in memory only
    Session,
    /// A write failed; further changes may not survive a reload
    #[serde(rename = "none")]
    Unavailable,
}

impl StorageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageStatus::Full => "full",
            StorageStatus::Session => "session",
            StorageStatus::Unavailable => "none",
        }
    }
}

/// Owns the saved-view collection and the active view pointer.
///
/// Every mutation is all-or-nothing: the in-memory collection only changes
/// after the new collection has been persisted.
#[derive(Debug)]
pub struct SavedViewStore<S, C = SystemClock, G = UuidGenerator> {
    persistence: ViewPersistence<S>,
    clock: C,
    ids: G,
    config: StoreConfig,
    saved_views: Vec<SavedView>,
    active_view_id: Option<String>,
    storage_status: StorageStatus,
}

impl<S: KeyValueStorage> SavedViewStore<S> {
    /// Open the store with the system clock, UUID ids and default limits
    pub fn new(storage: S) -> Self {
        Self::with_parts(storage, SystemClock, UuidGenerator, StoreConfig::default())
    }
}

impl<S, C, G> SavedViewStore<S, C, G>
where
    S: KeyValueStorage,
    C: Clock,
    G: IdGenerator,
{
    /// Open the store, loading any previously persisted views
    pub fn with_parts(storage: S, clock: C, ids: G, config: StoreConfig) -> Self {
        let persistence = ViewPersistence::new(storage, &config);

        let mut store = Self {
            persistence,
            clock,
            ids,
            config,
            saved_views: Vec::new(),
            active_view_id: None,
            storage_status: StorageStatus::Full,
        };

        // reads fail soft, so a full but readable storage still yields its views
        store.saved_views = store.persistence.read_views();
        let active = store.persistence.read_active_view_id();

        if !store.persistence.is_storage_available() {
            info!("Storage unavailable, saved view changes will only last for this session");
            store.storage_status = StorageStatus::Session;
        }

        match active {
            Some(id) if store.saved_views.iter().any(|v| v.id == id) => {
                store.active_view_id = Some(id);
            }
            Some(id) => {
                warn!(view_id = %id, "Discarding active view id with no matching view");
                if let Err(err) = store.persist_active() {
                    warn!(error = %err, "Failed to clear stale active view id");
                }
            }
            None => {}
        }

        info!(
            count = store.saved_views.len(),
            active = ?store.active_view_id,
            "Saved view store ready"
        );
        store
    }

    pub fn saved_views(&self) -> &[SavedView] {
        &self.saved_views
    }

    pub fn active_view_id(&self) -> Option<&str> {
        self.active_view_id.as_deref()
    }

    pub fn storage_status(&self) -> StorageStatus {
        self.storage_status
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn get_view(&self, id: &str) -> Option<&SavedView> {
        self.saved_views.iter().find(|v| v.id == id)
    }

    pub fn active_view(&self) -> Option<&SavedView> {
        self.active_view_id.as_deref().and_then(|id| self.get_view(id))
    }

    /// Config of the active view, or the default config when none is active
    pub fn active_config(&self) -> ViewConfig {
        self.active_view()
            .map(|v| v.config.clone())
            .unwrap_or(DEFAULT_VIEW_CONFIG)
    }

    pub fn len(&self) -> usize {
        self.saved_views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved_views.is_empty()
    }

    pub fn is_at_capacity(&self) -> bool {
        self.saved_views.len() >= self.config.max_saved_views
    }

    pub fn remaining_capacity(&self) -> usize {
        self.config.max_saved_views.saturating_sub(self.saved_views.len())
    }

    pub fn storage(&self) -> &S {
        self.persistence.storage()
    }

    pub fn into_storage(self) -> S {
        self.persistence.into_storage()
    }

    /// Check a name against the current collection, e.g. on every keystroke
    pub fn validate_name(&self, name: &str, exclude_id: Option<&str>) -> Result<(), NameError> {
        validate_view_name(name, &self.saved_views, exclude_id, self.config.max_name_length)
    }

    /// Forget the cached availability result, check again and reconcile the status.
    ///
    /// A session-only store whose storage became writable goes back to
    /// `Full`; a `Full` store whose storage stopped accepting writes drops to
    /// `Session`. `Unavailable` is left to the next write to settle.
    pub fn recheck_storage(&mut self) -> bool {
        self.persistence.reset_availability_cache();
        let available = self.persistence.is_storage_available();

        match (available, self.storage_status) {
            (true, StorageStatus::Session) => {
                info!("Storage became available, saved view changes will persist");
                self.storage_status = StorageStatus::Full;
            }
            (false, StorageStatus::Full) => {
                info!("Storage no longer available, saved view changes will only last for this session");
                self.storage_status = StorageStatus::Session;
            }
            _ => {}
        }

        available
    }

    pub fn is_storage_available(&mut self) -> bool {
        self.persistence.is_storage_available()
    }

    /// Save `config` as a new view named `name`
    pub fn create_view(&mut self, name: &str, config: ViewConfig) -> Result<SavedView, ViewError> {
        self.validate_name(name, None)?;

        if self.is_at_capacity() {
            return Err(ViewError::CapacityReached {
                max: self.config.max_saved_views,
            });
        }

        let now = next_timestamp(&self.clock, None);
        let view = SavedView {
            id: self.ids.next_id(),
            name: name.trim().to_string(),
            config,
            created_at: now,
            updated_at: now,
        };

        let mut next = self.saved_views.clone();
        next.push(view.clone());
        self.persist_views(&next)?;
        self.saved_views = next;

        debug!(view_id = %view.id, name = %view.name, "Created saved view");
        Ok(view)
    }

    /// Replace the config of an existing view
    pub fn update_view(&mut self, id: &str, config: ViewConfig) -> Result<(), ViewError> {
        let index = self.index_of(id)?;

        let mut next = self.saved_views.clone();
        let view = &mut next[index];
        view.config = config;
        view.updated_at = next_timestamp(&self.clock, Some(view.updated_at));

        self.persist_views(&next)?;
        self.saved_views = next;

        debug!(view_id = %id, "Updated saved view");
        Ok(())
    }

    /// Rename an existing view. Renaming a view to its own name is allowed.
    pub fn rename_view(&mut self, id: &str, new_name: &str) -> Result<(), ViewError> {
        let index = self.index_of(id)?;
        self.validate_name(new_name, Some(id))?;

        let mut next = self.saved_views.clone();
        let view = &mut next[index];
        view.name = new_name.trim().to_string();
        view.updated_at = next_timestamp(&self.clock, Some(view.updated_at));

        self.persist_views(&next)?;
        self.saved_views = next;

        debug!(view_id = %id, name = %new_name.trim(), "Renamed saved view");
        Ok(())
    }

    /// Delete a view, clearing the active pointer if it pointed there.
    ///
    /// The result reflects only the removal; failing to persist the cleared
    /// pointer is logged and marks storage as unavailable.
    pub fn delete_view(&mut self, id: &str) -> Result<(), ViewError> {
        let index = self.index_of(id)?;

        let mut next = self.saved_views.clone();
        next.remove(index);
        self.persist_views(&next)?;
        self.saved_views = next;

        if self.active_view_id.as_deref() == Some(id) {
            self.active_view_id = None;
            if let Err(err) = self.persist_active() {
                warn!(view_id = %id, error = %err, "Deleted active view but could not clear it in storage");
            }
        }

        debug!(view_id = %id, "Deleted saved view");
        Ok(())
    }

    /// Make a view active and return its config. `None` selects the default view.
    pub fn apply_view(&mut self, id: Option<&str>) -> Result<ViewConfig, ViewError> {
        let config = match id {
            None => DEFAULT_VIEW_CONFIG,
            Some(id) => self
                .get_view(id)
                .map(|v| v.config.clone())
                .ok_or_else(|| ViewError::NotFound(id.to_string()))?,
        };

        self.active_view_id = id.map(str::to_string);
        if let Err(err) = self.persist_active() {
            warn!(view_id = ?id, error = %err, "Applied view will not survive a reload");
        }

        debug!(view_id = ?id, "Applied saved view");
        Ok(config)
    }

    /// Capture `table` and save it as a new view
    pub fn save_table_as<T: TableState>(&mut self, name: &str, table: &T) -> Result<SavedView, ViewError> {
        self.create_view(name, table.capture())
    }

    /// Capture `table` into an existing view
    pub fn save_table_into<T: TableState>(&mut self, id: &str, table: &T) -> Result<(), ViewError> {
        self.update_view(id, table.capture())
    }

    /// Apply a view (or the default) and overwrite `table` with it
    pub fn apply_view_to<T: TableState>(&mut self, id: Option<&str>, table: &mut T) -> Result<(), ViewError> {
        let config = self.apply_view(id)?;
        table.apply(&config);
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<usize, ViewError> {
        self.saved_views
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| ViewError::NotFound(id.to_string()))
    }

    fn persist_views(&mut self, views: &[SavedView]) -> Result<(), StorageError> {
        if self.storage_status == StorageStatus::Session {
            return Ok(());
        }
        let result = self.persistence.write_views(views);
        self.record_write(&result);
        result
    }

    fn persist_active(&mut self) -> Result<(), StorageError> {
        if self.storage_status == StorageStatus::Session {
            return Ok(());
        }
        let result = self
            .persistence
            .write_active_view_id(self.active_view_id.as_deref());
        self.record_write(&result);
        result
    }

    fn record_write(&mut self, result: &Result<(), StorageError>) {
        match (result, self.storage_status) {
            (Err(_), StorageStatus::Full) => {
                info!("Storage write failed, saved view changes may not persist");
                self.storage_status = StorageStatus::Unavailable;
            }
            (Ok(()), StorageStatus::Unavailable) => {
                info!("Storage writes are succeeding again");
                self.storage_status = StorageStatus::Full;
            }
            _ => {}
        }
    }
}
