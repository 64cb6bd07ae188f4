//! Greedy placement of groups into label-balanced folds.
//!
//! Each fold `f` holds a per-class count `n[f][c]`. The quality of a candidate
//! placement is the mean, over classes with a non-zero global count `y[c]`, of
//! the population standard deviation across folds of `n[f][c] / y[c]`. The group
//! goes to the fold with the lowest resulting score; scores within a relative
//! tolerance of each other are decided by the fold's current sample count, then
//! by fold index.
//!
//! Per-class sums and sums of squares are kept as integers so a candidate is
//! scored in O(classes) and equal placements score exactly equal.

use tracing::debug;

use crate::groups::{aggregate_groups, GroupProfile};
use crate::labels::LabelMatrix;
use crate::types::{FoldAssignment, Labels, SplitResult, SplitWarning};
use crate::validation::{check_fold_count, collect_warnings, validate_inputs};

const SCORE_RTOL: f64 = 1e-5;
const SCORE_ATOL: f64 = 1e-8;

fn is_close(a: f64, b: f64) -> bool {
    if !b.is_finite() {
        return a == b;
    }
    (a - b).abs() <= SCORE_ATOL + SCORE_RTOL * b.abs()
}

struct FoldBalancer {
    num_folds: usize,
    /// Classes with a non-zero global count, paired with that count.
    scored: Vec<(usize, u64)>,
    /// `[fold][class]` label counts.
    counts: Vec<Vec<u64>>,
    /// Per class: sum over folds of counts.
    sums: Vec<u128>,
    /// Per class: sum over folds of squared counts.
    sumsqs: Vec<u128>,
    sizes: Vec<usize>,
}

impl FoldBalancer {
    fn new(num_folds: usize, totals: &[u64]) -> Self {
        let width = totals.len();
        Self {
            num_folds,
            scored: totals
                .iter()
                .copied()
                .enumerate()
                .filter(|(_, total)| *total > 0)
                .collect(),
            counts: vec![vec![0; width]; num_folds],
            sums: vec![0; width],
            sumsqs: vec![0; width],
            sizes: vec![0; num_folds],
        }
    }

    /// Mean per-class spread if `group` were added to `fold`.
    fn score(&self, fold: usize, group: &GroupProfile) -> f64 {
        if self.scored.is_empty() {
            return 0.0;
        }
        let k = self.num_folds as u128;
        let mut total = 0.0;
        for &(class, global) in &self.scored {
            let add = group.counts[class] as u128;
            let old = self.counts[fold][class] as u128;
            let sum = self.sums[class] + add;
            let sumsq = self.sumsqs[class] + 2 * old * add + add * add;
            // k^2 * var * y^2, exact.
            let num = k * sumsq - sum * sum;
            total += (num as f64).sqrt() / (k as f64 * global as f64);
        }
        total / self.scored.len() as f64
    }

    fn best_fold(&self, group: &GroupProfile) -> usize {
        let mut best = 0;
        let mut min_eval = f64::INFINITY;
        let mut min_size = usize::MAX;
        for fold in 0..self.num_folds {
            let eval = self.score(fold, group);
            let size = self.sizes[fold];
            if eval < min_eval || (is_close(eval, min_eval) && size < min_size) {
                best = fold;
                min_eval = eval;
                min_size = size;
            }
        }
        best
    }

    fn place(&mut self, fold: usize, group: &GroupProfile) {
        for (class, add) in group.counts.iter().enumerate() {
            let add = *add as u128;
            let old = self.counts[fold][class] as u128;
            self.sums[class] += add;
            self.sumsqs[class] += 2 * old * add + add * add;
            self.counts[fold][class] += add as u64;
        }
        self.sizes[fold] += group.size();
    }
}

/// Order in which groups are placed: descending label spread, ties by key.
fn placement_order(profiles: &[GroupProfile]) -> Vec<usize> {
    let spreads: Vec<f64> = profiles.iter().map(GroupProfile::label_spread).collect();
    let mut order: Vec<usize> = (0..profiles.len()).collect();
    // Profiles arrive sorted by key and the sort is stable.
    order.sort_by(|&a, &b| spreads[b].total_cmp(&spreads[a]));
    order
}

/// Assign every sample to one of `num_folds` folds, keeping groups intact.
pub fn assign_folds<S, G>(
    samples: &[S],
    labels: &Labels,
    groups: &[G],
    num_folds: usize,
) -> SplitResult<(FoldAssignment, Vec<SplitWarning>)>
where
    S: AsRef<str>,
    G: AsRef<str>,
{
    validate_inputs(samples, labels, groups, num_folds)?;
    let matrix = LabelMatrix::encode(labels)?;
    let profiles = aggregate_groups(&matrix, groups);
    check_fold_count(num_folds, profiles.len())?;
    let warnings = collect_warnings(&matrix, &profiles, num_folds);

    debug!(
        samples = samples.len(),
        groups = profiles.len(),
        classes = matrix.width(),
        num_folds,
        "assigning groups to folds"
    );

    let mut balancer = FoldBalancer::new(num_folds, &matrix.totals());
    let mut folds = vec![0usize; samples.len()];
    let order = placement_order(&profiles);
    for &gi in &order {
        let group = &profiles[gi];
        let fold = balancer.best_fold(group);
        balancer.place(fold, group);
        for &member in &group.members {
            folds[member] = fold;
        }
    }

    debug!(sizes = ?balancer.sizes, "fold sizes");

    Ok((
        FoldAssignment {
            num_folds,
            folds,
            group_order: order.iter().map(|&gi| profiles[gi].key.clone()).collect(),
        },
        warnings,
    ))
}
