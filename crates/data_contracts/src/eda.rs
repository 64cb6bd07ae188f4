use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ValidationError;

/// One row of the exploratory-analysis table: a sample and the classes present in its mask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdaRow {
    /// Image stem, e.g. `0a0a0b1a-7c39d841`.
    pub file_name: String,
    /// Explicit group id; when absent the group is derived from `file_name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Class name -> presence (0/1) or pixel-region count.
    #[serde(default)]
    pub classes: BTreeMap<String, u32>,
}

impl EdaRow {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.file_name.trim().is_empty() {
            return Err(ValidationError::EmptySampleId);
        }
        Ok(())
    }

    /// Value recorded for `class`, failing if the column is missing from this row.
    pub fn target(&self, class: &str) -> Result<u32, ValidationError> {
        self.classes
            .get(class)
            .copied()
            .ok_or_else(|| ValidationError::MissingTarget {
                file_name: self.file_name.clone(),
                class: class.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str) -> EdaRow {
        EdaRow {
            file_name: name.into(),
            group: None,
            classes: BTreeMap::from([("road".to_string(), 1), ("bicycle".to_string(), 0)]),
        }
    }

    #[test]
    fn target_reads_present_column() {
        assert_eq!(row("a-1").target("road"), Ok(1));
        assert_eq!(row("a-1").target("bicycle"), Ok(0));
    }

    #[test]
    fn target_missing_column_is_reported() {
        let err = row("a-1").target("person").unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingTarget {
                file_name: "a-1".into(),
                class: "person".into()
            }
        );
    }

    #[test]
    fn blank_file_name_rejected() {
        assert_eq!(row("  ").validate(), Err(ValidationError::EmptySampleId));
    }
}
