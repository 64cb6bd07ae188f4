//! Encoding of per-sample targets into a dense count matrix.

use std::collections::BTreeMap;

use crate::types::{Labels, SplitError, SplitResult};

/// Row-major `samples x classes` count matrix.
///
/// Categorical labels become one-hot rows with classes in lexicographic order;
/// multi-label vectors are copied as-is and their columns are named `label[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatrix {
    classes: Vec<String>,
    counts: Vec<u64>,
}

impl LabelMatrix {
    pub fn encode(labels: &Labels) -> SplitResult<Self> {
        match labels {
            Labels::Categorical(values) => {
                let index: BTreeMap<&str, usize> = values
                    .iter()
                    .map(String::as_str)
                    .collect::<std::collections::BTreeSet<_>>()
                    .into_iter()
                    .enumerate()
                    .map(|(i, class)| (class, i))
                    .collect();
                let width = index.len();
                let mut counts = vec![0u64; values.len() * width];
                for (row, value) in values.iter().enumerate() {
                    counts[row * width + index[value.as_str()]] = 1;
                }
                Ok(Self {
                    classes: index.keys().map(|c| c.to_string()).collect(),
                    counts,
                })
            }
            Labels::MultiLabel(values) => {
                let width = values.first().map_or(0, Vec::len);
                if width == 0 {
                    return Err(SplitError::EmptyLabelVector);
                }
                let mut counts = Vec::with_capacity(values.len() * width);
                for (index, row) in values.iter().enumerate() {
                    if row.len() != width {
                        return Err(SplitError::InconsistentLabelWidth {
                            index,
                            expected: width,
                            found: row.len(),
                        });
                    }
                    counts.extend(row.iter().map(|v| u64::from(*v)));
                }
                Ok(Self {
                    classes: (0..width).map(|i| format!("label[{i}]")).collect(),
                    counts,
                })
            }
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn width(&self) -> usize {
        self.classes.len()
    }

    pub fn row(&self, sample: usize) -> &[u64] {
        let width = self.width();
        &self.counts[sample * width..(sample + 1) * width]
    }

    /// Global count per class.
    pub fn totals(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.width()];
        for row in self.counts.chunks_exact(self.width().max(1)) {
            for (total, v) in totals.iter_mut().zip(row) {
                *total += v;
            }
        }
        totals
    }

    /// Number of samples with a non-zero value per class.
    pub fn support(&self) -> Vec<usize> {
        let mut support = vec![0usize; self.width()];
        for row in self.counts.chunks_exact(self.width().max(1)) {
            for (s, v) in support.iter_mut().zip(row) {
                if *v > 0 {
                    *s += 1;
                }
            }
        }
        support
    }
}
