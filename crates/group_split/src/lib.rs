//! Group-aware stratified partitioning of a labelled dataset.
//!
//! Samples are aggregated by group, groups are greedily placed into `k` folds so
//! that each fold mirrors the global label distribution, and folds collapse into
//! train/valid/test stages. Groups are never split, so correlated samples (frames
//! of one sequence, shots of one scene) cannot leak across stages.
//!
//! - `labels`: encoding of categorical and multi-label targets
//! - `groups`: group-key derivation and aggregation
//! - `folds`: fold scoring and greedy group placement
//! - `stages`: fold-to-partition mapping and the public entry point
//! - `summary`: per-partition and per-fold label statistics
//! - `validation`: eager input checks and non-fatal warnings

pub mod folds;
pub mod groups;
pub mod labels;
pub mod stages;
pub mod summary;
pub mod types;
pub mod validation;

pub use data_contracts::{Partition, SplitRow, SplitTable};
pub use folds::assign_folds;
pub use groups::{aggregate_groups, group_key, GroupProfile, DEFAULT_GROUP_SEPARATOR};
pub use labels::LabelMatrix;
pub use stages::{assign_partitions, partition_for_fold};
pub use summary::{summarize_partitions, summarize_table, BucketStats, PartitionSummary};
pub use types::*;
