//! Eager input checks and non-fatal balance warnings.

use std::collections::HashSet;

use tracing::warn;

use crate::groups::GroupProfile;
use crate::labels::LabelMatrix;
use crate::types::{Labels, SplitError, SplitResult, SplitWarning, MIN_NUM_FOLDS};

/// Checks that do not depend on group aggregation.
pub fn validate_inputs<S, G>(
    samples: &[S],
    labels: &Labels,
    groups: &[G],
    num_folds: usize,
) -> SplitResult<()>
where
    S: AsRef<str>,
    G: AsRef<str>,
{
    if samples.is_empty() {
        return Err(SplitError::EmptyInput);
    }
    if labels.len() != samples.len() || groups.len() != samples.len() {
        return Err(SplitError::LengthMismatch {
            samples: samples.len(),
            labels: labels.len(),
            groups: groups.len(),
        });
    }
    if num_folds < MIN_NUM_FOLDS {
        return Err(SplitError::InvalidConfiguration {
            num_folds,
            groups: distinct(groups),
            reason: "at least 3 folds are needed for test, valid and train",
        });
    }
    let mut seen = HashSet::with_capacity(samples.len());
    for sample in samples {
        if !seen.insert(sample.as_ref()) {
            return Err(SplitError::DuplicateSample(sample.as_ref().to_string()));
        }
    }
    Ok(())
}

/// Fails when there are fewer groups than folds.
pub fn check_fold_count(num_folds: usize, groups: usize) -> SplitResult<()> {
    if num_folds > groups {
        return Err(SplitError::InvalidConfiguration {
            num_folds,
            groups,
            reason: "more folds than distinct groups",
        });
    }
    Ok(())
}

pub fn collect_warnings(
    matrix: &LabelMatrix,
    profiles: &[GroupProfile],
    num_folds: usize,
) -> Vec<SplitWarning> {
    let samples: usize = profiles.iter().map(GroupProfile::size).sum();
    let ideal_fold_size = samples.div_ceil(num_folds);
    let mut warnings: Vec<SplitWarning> = profiles
        .iter()
        .filter(|p| p.size() > ideal_fold_size)
        .map(|p| SplitWarning::DegenerateGroup {
            group: p.key.clone(),
            size: p.size(),
            ideal_fold_size,
        })
        .collect();
    warnings.extend(
        matrix
            .classes()
            .iter()
            .zip(matrix.support())
            .filter(|(_, members)| *members < num_folds)
            .map(|(class, members)| SplitWarning::SparseClass {
                class: class.clone(),
                members,
                num_folds,
            }),
    );
    for w in &warnings {
        warn!("{w}");
    }
    warnings
}

fn distinct<G: AsRef<str>>(groups: &[G]) -> usize {
    groups.iter().map(AsRef::as_ref).collect::<HashSet<_>>().len()
}
