//! Shared data contracts for EDA tables and dataset split tables.

pub mod eda;
pub mod split;

pub use eda::EdaRow;
pub use split::{Partition, SplitRow, SplitTable};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("sample id is empty")]
    EmptySampleId,
    #[error("sample id {0:?} appears more than once")]
    DuplicateSampleId(String),
    #[error("unknown partition {0:?} (expected train, valid or test)")]
    UnknownPartition(String),
    #[error("row {file_name:?} has no value for class {class:?}")]
    MissingTarget { file_name: String, class: String },
}
