//! Loading the exploratory-analysis table and turning it into split inputs.

use std::fs;
use std::path::Path;

use data_contracts::EdaRow;
use group_split::{group_key, Labels};

use crate::error::{ToolError, ToolResult};

pub fn load_eda_table(path: &Path) -> ToolResult<Vec<EdaRow>> {
    let raw = fs::read(path).map_err(|e| ToolError::io(path, e))?;
    let rows: Vec<EdaRow> = serde_json::from_slice(&raw).map_err(|source| ToolError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    for row in &rows {
        row.validate()?;
    }
    Ok(rows)
}

/// Parallel sample ids, targets, and group ids ready for `assign_partitions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitInputs {
    pub samples: Vec<String>,
    pub labels: Labels,
    pub groups: Vec<String>,
}

/// One target column yields categorical labels; several yield a multi-label vector.
pub fn build_inputs(
    rows: &[EdaRow],
    targets: &[String],
    separator: &str,
) -> ToolResult<SplitInputs> {
    if targets.is_empty() {
        return Err(ToolError::NoTargets);
    }
    let samples: Vec<String> = rows.iter().map(|r| r.file_name.clone()).collect();
    let groups: Vec<String> = rows
        .iter()
        .map(|r| match &r.group {
            Some(group) => group.clone(),
            None => group_key(&r.file_name, separator).to_string(),
        })
        .collect();
    let labels = match targets {
        [single] => Labels::Categorical(
            rows.iter()
                .map(|r| r.target(single).map(|v| v.to_string()))
                .collect::<Result<_, _>>()?,
        ),
        _ => Labels::MultiLabel(
            rows.iter()
                .map(|r| {
                    targets
                        .iter()
                        .map(|t| r.target(t))
                        .collect::<Result<Vec<u32>, _>>()
                })
                .collect::<Result<_, _>>()?,
        ),
    };
    Ok(SplitInputs {
        samples,
        labels,
        groups,
    })
}
