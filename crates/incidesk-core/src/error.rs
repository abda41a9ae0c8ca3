use thiserror::Error;

/// Reasons a view name is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("View name is required")]
    Required,

    #[error("View name must be {max} characters or less")]
    TooLong { max: usize },

    #[error("A view with this name already exists")]
    Duplicate,
}

/// Failures reported by a key-value storage facility
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write '{key}': {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Errors returned by saved-view store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Invalid view name: {0}")]
    InvalidName(#[from] NameError),

    #[error("Cannot save more than {max} views")]
    CapacityReached { max: usize },

    #[error("View not found: {0}")]
    NotFound(String),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] StorageError),
}

impl ViewError {
    /// Stable error code for JavaScript callers
    pub fn code(&self) -> &'static str {
        match self {
            ViewError::InvalidName(_) => "INVALID_NAME",
            ViewError::CapacityReached { .. } => "CAPACITY_REACHED",
            ViewError::NotFound(_) => "NOT_FOUND",
            ViewError::Persistence(_) => "PERSISTENCE_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_error_messages() {
        assert!(NameError::Required.to_string().contains("required"));
        assert!(NameError::TooLong { max: 100 }.to_string().contains("100"));
        assert!(NameError::Duplicate.to_string().contains("already exists"));
    }

    #[test]
    fn test_view_error_codes() {
        assert_eq!(ViewError::from(NameError::Duplicate).code(), "INVALID_NAME");
        assert_eq!(ViewError::CapacityReached { max: 50 }.code(), "CAPACITY_REACHED");
        assert_eq!(ViewError::NotFound("view-1".into()).code(), "NOT_FOUND");
        assert_eq!(
            ViewError::from(StorageError::Unavailable("disabled".into())).code(),
            "PERSISTENCE_FAILED"
        );
    }
}
