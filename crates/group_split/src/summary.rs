//! Per-partition and per-fold label statistics for split reports.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use data_contracts::{Partition, SplitTable};

use crate::labels::LabelMatrix;
use crate::types::{Labels, SplitError, SplitOutcome, SplitResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BucketStats {
    pub samples: usize,
    pub groups: usize,
    pub class_counts: Vec<u64>,
}

impl BucketStats {
    /// Share of this bucket's samples carrying `class` (count / samples).
    pub fn rate(&self, class: usize) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.class_counts[class] as f64 / self.samples as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionSummary {
    pub classes: Vec<String>,
    pub overall: BucketStats,
    pub partitions: BTreeMap<Partition, BucketStats>,
    pub folds: Vec<BucketStats>,
}

impl PartitionSummary {
    pub fn class_index(&self, class: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == class)
    }

    /// Largest absolute gap between a non-empty partition's rate and the overall rate.
    pub fn max_partition_deviation(&self, class: usize) -> f64 {
        max_deviation(self.partitions.values(), self.overall.rate(class), class)
    }

    /// Largest absolute gap between a non-empty fold's rate and the overall rate.
    pub fn max_fold_deviation(&self, class: usize) -> f64 {
        max_deviation(self.folds.iter(), self.overall.rate(class), class)
    }
}

fn max_deviation<'a>(
    buckets: impl Iterator<Item = &'a BucketStats>,
    overall: f64,
    class: usize,
) -> f64 {
    buckets
        .filter(|b| b.samples > 0)
        .map(|b| (b.rate(class) - overall).abs())
        .fold(0.0, f64::max)
}

/// Tally labels per partition and per fold of a finished split.
pub fn summarize_partitions<G: AsRef<str>>(
    outcome: &SplitOutcome,
    labels: &Labels,
    groups: &[G],
) -> SplitResult<PartitionSummary> {
    tally(
        outcome.partitions(),
        Some((outcome.folds(), outcome.num_folds())),
        labels,
        groups,
    )
}

/// Tally labels per partition of a persisted table; `labels` and `groups` follow table row order.
///
/// Fold membership is not persisted, so `folds` is empty.
pub fn summarize_table<G: AsRef<str>>(
    table: &SplitTable,
    labels: &Labels,
    groups: &[G],
) -> SplitResult<PartitionSummary> {
    let partitions: Vec<Partition> = table.rows.iter().map(|row| row.partition).collect();
    tally(&partitions, None, labels, groups)
}

fn tally<G: AsRef<str>>(
    partitions: &[Partition],
    folds: Option<(&[usize], usize)>,
    labels: &Labels,
    groups: &[G],
) -> SplitResult<PartitionSummary> {
    if labels.len() != partitions.len() || groups.len() != partitions.len() {
        return Err(SplitError::LengthMismatch {
            samples: partitions.len(),
            labels: labels.len(),
            groups: groups.len(),
        });
    }
    let matrix = LabelMatrix::encode(labels)?;
    let width = matrix.width();
    let empty = || BucketStats {
        class_counts: vec![0; width],
        ..Default::default()
    };
    let num_folds = folds.map_or(0, |(_, k)| k);

    let mut overall = empty();
    let mut by_partition: BTreeMap<Partition, BucketStats> =
        Partition::ALL.iter().map(|p| (*p, empty())).collect();
    let mut by_fold = vec![empty(); num_folds];
    let mut all_groups = BTreeSet::new();
    let mut partition_groups: BTreeMap<Partition, BTreeSet<&str>> = BTreeMap::new();
    let mut fold_groups: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); num_folds];

    for (i, partition) in partitions.iter().enumerate() {
        let row = matrix.row(i);
        let group = groups[i].as_ref();
        let mut buckets = vec![&mut overall, by_partition.entry(*partition).or_insert_with(empty)];
        if let Some((fold_of, _)) = folds {
            buckets.push(&mut by_fold[fold_of[i]]);
            fold_groups[fold_of[i]].insert(group);
        }
        for bucket in buckets {
            bucket.samples += 1;
            for (acc, v) in bucket.class_counts.iter_mut().zip(row) {
                *acc += v;
            }
        }
        all_groups.insert(group);
        partition_groups.entry(*partition).or_default().insert(group);
    }

    overall.groups = all_groups.len();
    for (partition, stats) in by_partition.iter_mut() {
        stats.groups = partition_groups.get(partition).map_or(0, BTreeSet::len);
    }
    for (stats, groups) in by_fold.iter_mut().zip(&fold_groups) {
        stats.groups = groups.len();
    }

    Ok(PartitionSummary {
        classes: matrix.classes().to_vec(),
        overall,
        partitions: by_partition,
        folds: by_fold,
    })
}
