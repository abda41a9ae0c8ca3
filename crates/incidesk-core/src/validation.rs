use serde::{Deserialize, Serialize};

use crate::error::NameError;
use crate::view::SavedView;

/// Outcome of a name check in the `{ valid, error }` shape UI code expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<(), NameError>> for NameValidation {
    fn from(result: Result<(), NameError>) -> Self {
        match result {
            Ok(()) => Self { valid: true, error: None },
            Err(err) => Self {
                valid: false,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Check a candidate view name against the existing collection.
///
/// The name is trimmed before every check. `exclude_id` skips one view in the
/// duplicate check so a view can be renamed to its own name. Comparison is
/// case-sensitive.
pub fn validate_view_name(
    name: &str,
    existing: &[SavedView],
    exclude_id: Option<&str>,
    max_len: usize,
) -> Result<(), NameError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(NameError::Required);
    }

    if trimmed.chars().count() > max_len {
        return Err(NameError::TooLong { max: max_len });
    }

    let duplicate = existing
        .iter()
        .filter(|view| exclude_id != Some(view.id.as_str()))
        .any(|view| view.name.trim() == trimmed);

    if duplicate {
        return Err(NameError::Duplicate);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ViewConfig, MAX_VIEW_NAME_LENGTH};
    use chrono::Utc;

    fn view(id: &str, name: &str) -> SavedView {
        let now = Utc::now();
        SavedView {
            id: id.into(),
            name: name.into(),
            config: ViewConfig::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn check(name: &str, existing: &[SavedView], exclude: Option<&str>) -> Result<(), NameError> {
        validate_view_name(name, existing, exclude, MAX_VIEW_NAME_LENGTH)
    }

    #[test]
    fn test_empty_name_required() {
        assert_eq!(check("", &[], None), Err(NameError::Required));
        assert_eq!(check("   ", &[], None), Err(NameError::Required));
        assert_eq!(check("\t\n", &[], None), Err(NameError::Required));
    }

    #[test]
    fn test_length_limit() {
        assert_eq!(check(&"a".repeat(100), &[], None), Ok(()));
        assert_eq!(
            check(&"a".repeat(101), &[], None),
            Err(NameError::TooLong { max: 100 })
        );
        // surrounding whitespace does not count
        assert_eq!(check(&format!("  {}  ", "a".repeat(100)), &[], None), Ok(()));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let name = "é".repeat(100);
        assert!(name.len() > 100);
        assert_eq!(check(&name, &[], None), Ok(()));
    }

    #[test]
    fn test_duplicate_after_trim() {
        let existing = vec![view("view-1", "Critical Issues")];
        assert_eq!(check("  Critical Issues ", &existing, None), Err(NameError::Duplicate));
    }

    #[test]
    fn test_duplicate_is_case_sensitive() {
        let existing = vec![view("view-1", "Critical Issues")];
        assert_eq!(check("critical issues", &existing, None), Ok(()));
    }

    #[test]
    fn test_exclude_id_allows_own_name() {
        let existing = vec![view("view-1", "Critical Issues"), view("view-2", "Mine")];
        assert_eq!(check(" Critical Issues", &existing, Some("view-1")), Ok(()));
        assert_eq!(check("Mine", &existing, Some("view-1")), Err(NameError::Duplicate));
    }

    #[test]
    fn test_name_validation_shape() {
        let ok: NameValidation = check("Open P1s", &[], None).into();
        assert_eq!(ok, NameValidation { valid: true, error: None });

        let bad: NameValidation = check("   ", &[], None).into();
        assert!(!bad.valid);
        assert!(bad.error.unwrap().contains("required"));

        let long: NameValidation = check(&"a".repeat(101), &[], None).into();
        assert!(!long.valid);
        assert!(long.error.unwrap().contains("100"));
    }

    #[test]
    fn test_name_validation_serialization_omits_missing_error() {
        let ok = NameValidation { valid: true, error: None };
        assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"valid":true}"#);
    }
}
