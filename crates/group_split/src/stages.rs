//! Collapse folds into train/valid/test stages.

use data_contracts::Partition;
use tracing::info;

use crate::folds::assign_folds;
use crate::types::{Labels, SplitConfig, SplitOutcome, SplitResult};

/// Fold 0 is held out for test, fold 1 for validation, the rest train.
pub fn partition_for_fold(fold: usize) -> Partition {
    match fold {
        0 => Partition::Test,
        1 => Partition::Valid,
        _ => Partition::Train,
    }
}

/// Split `samples` into train/valid/test without breaking groups apart.
///
/// `labels` and `groups` are parallel to `samples`. With the default ten folds
/// the result is roughly 80/10/10, and each stage approximates the global
/// label distribution as closely as group sizes allow.
pub fn assign_partitions<S, G>(
    samples: &[S],
    labels: &Labels,
    groups: &[G],
    config: &SplitConfig,
) -> SplitResult<SplitOutcome>
where
    S: AsRef<str>,
    G: AsRef<str>,
{
    let (assignment, warnings) = assign_folds(samples, labels, groups, config.num_folds)?;
    let partitions: Vec<Partition> = assignment
        .folds
        .iter()
        .map(|&fold| partition_for_fold(fold))
        .collect();

    let count = |p: Partition| partitions.iter().filter(|&&x| x == p).count();
    info!(
        train = count(Partition::Train),
        valid = count(Partition::Valid),
        test = count(Partition::Test),
        warnings = warnings.len(),
        "data split"
    );

    Ok(SplitOutcome::new(
        samples.iter().map(|s| s.as_ref().to_string()).collect(),
        partitions,
        assignment.folds,
        assignment.num_folds,
        warnings,
    ))
}
