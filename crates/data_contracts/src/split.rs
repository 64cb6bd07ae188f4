use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::ValidationError;

/// Stage a sample is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Train,
    Valid,
    Test,
}

impl Partition {
    pub const ALL: [Partition; 3] = [Partition::Train, Partition::Valid, Partition::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Valid => "valid",
            Partition::Test => "test",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Partition {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "train" => Ok(Partition::Train),
            "valid" => Ok(Partition::Valid),
            "test" => Ok(Partition::Test),
            other => Err(ValidationError::UnknownPartition(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRow {
    pub sample_id: String,
    pub partition: Partition,
}

/// The persisted `sample_id -> partition` table consumed by training and evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitTable {
    pub rows: Vec<SplitRow>,
}

impl SplitTable {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::with_capacity(self.rows.len());
        for row in &self.rows {
            if row.sample_id.trim().is_empty() {
                return Err(ValidationError::EmptySampleId);
            }
            if !seen.insert(row.sample_id.as_str()) {
                return Err(ValidationError::DuplicateSampleId(row.sample_id.clone()));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn partition_of(&self, sample_id: &str) -> Option<Partition> {
        self.rows
            .iter()
            .find(|row| row.sample_id == sample_id)
            .map(|row| row.partition)
    }

    /// Sample ids assigned to `partition`, in table order.
    pub fn samples_in(&self, partition: Partition) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .filter(move |row| row.partition == partition)
            .map(|row| row.sample_id.as_str())
    }

    /// Row count per partition; every partition is present, possibly with zero.
    pub fn counts(&self) -> BTreeMap<Partition, usize> {
        let mut counts: BTreeMap<Partition, usize> =
            Partition::ALL.iter().map(|p| (*p, 0)).collect();
        for row in &self.rows {
            *counts.entry(row.partition).or_default() += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_names_are_stable() {
        assert_eq!(Partition::Train.as_str(), "train");
        assert_eq!(Partition::Valid.as_str(), "valid");
        assert_eq!(Partition::Test.as_str(), "test");
        assert_eq!("valid".parse::<Partition>(), Ok(Partition::Valid));
        assert_eq!(
            "validation".parse::<Partition>(),
            Err(ValidationError::UnknownPartition("validation".into()))
        );
    }

    #[test]
    fn counts_include_empty_partitions() {
        let table = SplitTable {
            rows: vec![SplitRow {
                sample_id: "a".into(),
                partition: Partition::Train,
            }],
        };
        let counts = table.counts();
        assert_eq!(counts[&Partition::Train], 1);
        assert_eq!(counts[&Partition::Valid], 0);
        assert_eq!(counts[&Partition::Test], 0);
    }
}
