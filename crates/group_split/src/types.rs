//! Core types, errors, and outcome structures for group_split.

use data_contracts::{Partition, SplitRow, SplitTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_NUM_FOLDS: usize = 10;
pub const MIN_NUM_FOLDS: usize = 3;

pub type SplitResult<T> = Result<T, SplitError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("invalid configuration: {reason} (num_folds={num_folds}, groups={groups})")]
    InvalidConfiguration {
        num_folds: usize,
        groups: usize,
        reason: &'static str,
    },
    #[error("no samples to split")]
    EmptyInput,
    #[error("length mismatch: {samples} samples, {labels} labels, {groups} group ids")]
    LengthMismatch {
        samples: usize,
        labels: usize,
        groups: usize,
    },
    #[error("label vector {index} has width {found}, expected {expected}")]
    InconsistentLabelWidth {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("label vectors have no columns to stratify on")]
    EmptyLabelVector,
    #[error("sample id {0:?} appears more than once")]
    DuplicateSample(String),
}

/// Conditions that degrade balance but still allow a complete assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SplitWarning {
    /// A single group holds more samples than an evenly filled fold.
    DegenerateGroup {
        group: String,
        size: usize,
        ideal_fold_size: usize,
    },
    /// A class has fewer members than there are folds.
    SparseClass {
        class: String,
        members: usize,
        num_folds: usize,
    },
}

impl fmt::Display for SplitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitWarning::DegenerateGroup {
                group,
                size,
                ideal_fold_size,
            } => write!(
                f,
                "group {group:?} has {size} samples, more than an even fold of {ideal_fold_size}"
            ),
            SplitWarning::SparseClass {
                class,
                members,
                num_folds,
            } => write!(
                f,
                "class {class:?} has only {members} members, fewer than num_folds={num_folds}"
            ),
        }
    }
}

/// Per-sample targets, parallel to the sample ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Labels {
    /// One class value per sample (e.g. presence "0"/"1" of a class in the mask).
    Categorical(Vec<String>),
    /// Fixed-width binary or count vector per sample.
    MultiLabel(Vec<Vec<u32>>),
}

impl Labels {
    pub fn categorical<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Labels::Categorical(values.into_iter().map(|v| v.to_string()).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Labels::Categorical(values) => values.len(),
            Labels::MultiLabel(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub num_folds: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            num_folds: DEFAULT_NUM_FOLDS,
        }
    }
}

/// Fold index per sample before stages are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldAssignment {
    pub num_folds: usize,
    /// Parallel to the input samples.
    pub folds: Vec<usize>,
    /// Group keys in the order they were placed.
    pub group_order: Vec<String>,
}

/// Immutable result of a split run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    sample_ids: Vec<String>,
    partitions: Vec<Partition>,
    folds: Vec<usize>,
    num_folds: usize,
    warnings: Vec<SplitWarning>,
}

impl SplitOutcome {
    pub(crate) fn new(
        sample_ids: Vec<String>,
        partitions: Vec<Partition>,
        folds: Vec<usize>,
        num_folds: usize,
        warnings: Vec<SplitWarning>,
    ) -> Self {
        Self {
            sample_ids,
            partitions,
            folds,
            num_folds,
            warnings,
        }
    }

    pub fn len(&self) -> usize {
        self.sample_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_ids.is_empty()
    }

    pub fn num_folds(&self) -> usize {
        self.num_folds
    }

    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Parallel to `sample_ids`.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Parallel to `sample_ids`.
    pub fn folds(&self) -> &[usize] {
        &self.folds
    }

    pub fn warnings(&self) -> &[SplitWarning] {
        &self.warnings
    }

    pub fn partition_of(&self, sample_id: &str) -> Option<Partition> {
        self.sample_ids
            .iter()
            .position(|id| id == sample_id)
            .map(|i| self.partitions[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Partition)> + '_ {
        self.sample_ids
            .iter()
            .map(String::as_str)
            .zip(self.partitions.iter().copied())
    }

    pub fn to_table(&self) -> SplitTable {
        SplitTable {
            rows: self
                .iter()
                .map(|(sample_id, partition)| SplitRow {
                    sample_id: sample_id.to_string(),
                    partition,
                })
                .collect(),
        }
    }
}
