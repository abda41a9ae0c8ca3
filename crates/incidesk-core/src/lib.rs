pub mod clock;
pub mod config;
pub mod error;
pub mod id;
pub mod persistence;
pub mod storage;
pub mod store;
pub mod table;
pub mod validation;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{StoreConfig, ACTIVE_VIEW_ID_KEY, SAVED_VIEWS_KEY};
pub use error::{NameError, StorageError, ViewError};
pub use id::{IdGenerator, SequentialIds, UuidGenerator};
pub use persistence::{validate_shape, ViewPersistence};
pub use storage::{KeyValueStorage, MemoryStorage};
pub use store::{SavedViewStore, StorageStatus};
pub use table::{TableState, TableViewState};
pub use validation::{validate_view_name, NameValidation};
pub use view::{
    ColumnFilter, ColumnSort, SavedView, ViewConfig, DEFAULT_VIEW_CONFIG, MAX_SAVED_VIEWS,
    MAX_VIEW_NAME_LENGTH,
};
