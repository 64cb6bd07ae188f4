//! Group-key derivation and per-group label aggregation.

use std::collections::BTreeMap;

use crate::labels::LabelMatrix;

pub const DEFAULT_GROUP_SEPARATOR: &str = "-";

/// Group id for a sample: the part of `sample_id` before the first `separator`.
///
/// Ids without the separator (or an empty separator) form their own group.
pub fn group_key<'a>(sample_id: &'a str, separator: &str) -> &'a str {
    if separator.is_empty() {
        return sample_id;
    }
    sample_id
        .split_once(separator)
        .map_or(sample_id, |(head, _)| head)
}

/// Aggregate label profile of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupProfile {
    pub key: String,
    /// Indices into the input samples, ascending.
    pub members: Vec<usize>,
    /// Per-class label counts summed over the members.
    pub counts: Vec<u64>,
}

impl GroupProfile {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Population standard deviation of the class-count vector.
    pub(crate) fn label_spread(&self) -> f64 {
        let n = self.counts.len();
        if n == 0 {
            return 0.0;
        }
        let sum: u128 = self.counts.iter().map(|&c| c as u128).sum();
        let sumsq: u128 = self.counts.iter().map(|&c| (c as u128) * (c as u128)).sum();
        let num = (n as u128) * sumsq - sum * sum;
        (num as f64).sqrt() / n as f64
    }
}

/// One profile per distinct group id, ordered by key.
pub fn aggregate_groups<S: AsRef<str>>(matrix: &LabelMatrix, groups: &[S]) -> Vec<GroupProfile> {
    let width = matrix.width();
    let mut by_key: BTreeMap<&str, GroupProfile> = BTreeMap::new();
    for (idx, group) in groups.iter().enumerate() {
        let key = group.as_ref();
        let profile = by_key.entry(key).or_insert_with(|| GroupProfile {
            key: key.to_string(),
            members: Vec::new(),
            counts: vec![0; width],
        });
        profile.members.push(idx);
        for (acc, v) in profile.counts.iter_mut().zip(matrix.row(idx)) {
            *acc += v;
        }
    }
    by_key.into_values().collect()
}
