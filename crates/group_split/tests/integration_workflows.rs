//! Integration tests for end-to-end group_split workflows.
//!
//! These tests verify the properties downstream training relies on:
//! 1. Completeness and group atomicity of the partition mapping
//! 2. Deterministic output for identical input
//! 3. Label balance that improves as groups get finer
//! 4. Typed errors for malformed input and warnings for oversized groups

use group_split::{
    assign_partitions, summarize_partitions, Labels, Partition, SplitConfig, SplitError,
    SplitWarning,
};
use std::collections::{BTreeMap, HashMap};

/// 100 frames from 20 sequences of 5; even sequences hold 2 positives, odd ones 1.
fn sequence_fixture() -> (Vec<String>, Labels, Vec<String>) {
    let mut samples = Vec::new();
    let mut labels = Vec::new();
    let mut groups = Vec::new();
    for seq in 0..20 {
        let positives = if seq % 2 == 0 { 2 } else { 1 };
        for frame in 0..5 {
            samples.push(format!("seq{seq:02}-{frame:04}"));
            groups.push(format!("seq{seq:02}"));
            labels.push(if frame < positives { "1" } else { "0" });
        }
    }
    (samples, Labels::categorical(labels), groups)
}

/// Deterministic ~30% positive labels.
fn lcg_labels(n: usize, seed: u64) -> Vec<&'static str> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            if (state >> 33) % 10 < 3 {
                "1"
            } else {
                "0"
            }
        })
        .collect()
}

/// `positives` of `n` labels set to "1" at LCG-shuffled positions.
fn scattered_labels(n: usize, positives: usize, seed: u64) -> Vec<&'static str> {
    let mut order: Vec<usize> = (0..n).collect();
    let mut state = seed;
    for i in (1..n).rev() {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let j = ((state >> 33) % (i as u64 + 1)) as usize;
        order.swap(i, j);
    }
    let mut labels = vec!["0"; n];
    for &i in &order[..positives] {
        labels[i] = "1";
    }
    labels
}

fn assert_groups_atomic(outcome: &group_split::SplitOutcome, groups: &[String]) {
    let mut seen: HashMap<&str, Partition> = HashMap::new();
    for ((_, partition), group) in outcome.iter().zip(groups) {
        let first = *seen.entry(group.as_str()).or_insert(partition);
        assert_eq!(first, partition, "group {group} spans two partitions");
    }
}

#[test]
fn workflow_sequences_split_80_10_10_with_balanced_labels() -> anyhow::Result<()> {
    let (samples, labels, groups) = sequence_fixture();

    let outcome = assign_partitions(&samples, &labels, &groups, &SplitConfig::default())?;

    assert_eq!(outcome.len(), 100);
    assert!(outcome.warnings().is_empty());
    let table = outcome.to_table();
    table.validate()?;
    let counts = table.counts();
    assert_eq!(counts[&Partition::Train], 80);
    assert_eq!(counts[&Partition::Valid], 10);
    assert_eq!(counts[&Partition::Test], 10);
    assert_groups_atomic(&outcome, &groups);

    let summary = summarize_partitions(&outcome, &labels, &groups)?;
    let positive = summary.class_index("1").expect("positive class");
    assert!((summary.overall.rate(positive) - 0.3).abs() < 1e-12);
    for (partition, stats) in &summary.partitions {
        assert!(
            (stats.rate(positive) - 0.3).abs() <= 0.05,
            "{partition} positive rate {}",
            stats.rate(positive)
        );
    }
    assert_eq!(summary.partitions[&Partition::Train].groups, 16);
    assert_eq!(summary.partitions[&Partition::Valid].groups, 2);
    assert_eq!(summary.partitions[&Partition::Test].groups, 2);
    Ok(())
}

#[test]
fn workflow_scattered_positives_keep_80_10_10_sizes() -> anyhow::Result<()> {
    let samples: Vec<String> = (0..100)
        .map(|i| format!("seq{:02}-{:04}", i / 5, i % 5))
        .collect();
    let groups: Vec<String> = (0..100).map(|i| format!("seq{:02}", i / 5)).collect();

    for seed in 1..=8 {
        let labels = Labels::categorical(scattered_labels(100, 30, seed));
        let outcome = assign_partitions(&samples, &labels, &groups, &SplitConfig::default())?;

        assert_eq!(outcome.sample_ids(), samples.as_slice());
        let counts = outcome.to_table().counts();
        assert_eq!(counts[&Partition::Train], 80, "seed {seed}");
        assert_eq!(counts[&Partition::Valid], 10, "seed {seed}");
        assert_eq!(counts[&Partition::Test], 10, "seed {seed}");
        assert_groups_atomic(&outcome, &groups);
    }
    Ok(())
}

#[test]
fn workflow_every_sample_mapped_exactly_once() -> anyhow::Result<()> {
    // Uneven sequences: sizes cycle 1..=7.
    let mut samples = Vec::new();
    let mut groups = Vec::new();
    for seq in 0..30 {
        for frame in 0..(1 + seq % 7) {
            samples.push(format!("run{seq:03}-{frame:03}"));
            groups.push(format!("run{seq:03}"));
        }
    }
    let labels = Labels::categorical(lcg_labels(samples.len(), 11));

    let outcome = assign_partitions(&samples, &labels, &groups, &SplitConfig { num_folds: 5 })?;

    assert_eq!(outcome.sample_ids(), samples.as_slice());
    let mut per_sample: BTreeMap<&str, usize> = BTreeMap::new();
    for (id, _) in outcome.iter() {
        *per_sample.entry(id).or_default() += 1;
    }
    assert_eq!(per_sample.len(), samples.len());
    assert!(per_sample.values().all(|&n| n == 1));
    assert!(outcome.folds().iter().all(|&f| f < 5));
    assert_groups_atomic(&outcome, &groups);
    for partition in Partition::ALL {
        assert!(
            outcome.partitions().contains(&partition),
            "{partition} is empty"
        );
    }
    Ok(())
}

#[test]
fn workflow_identical_input_gives_identical_output() -> anyhow::Result<()> {
    let (samples, labels, groups) = sequence_fixture();
    let first = assign_partitions(&samples, &labels, &groups, &SplitConfig::default())?;
    let second = assign_partitions(&samples, &labels, &groups, &SplitConfig::default())?;
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.to_table())?,
        serde_json::to_string(&second.to_table())?
    );
    Ok(())
}

#[test]
fn workflow_finer_groups_balance_labels_better() -> anyhow::Result<()> {
    let n = 400;
    let labels = Labels::categorical(lcg_labels(n, 7));
    let samples: Vec<String> = (0..n).map(|i| format!("s{i:04}")).collect();

    let mut deviations = Vec::new();
    for group_size in [20, 10, 4, 2] {
        let groups: Vec<String> = (0..n).map(|i| format!("g{:04}", i / group_size)).collect();
        let outcome = assign_partitions(&samples, &labels, &groups, &SplitConfig::default())?;
        assert_groups_atomic(&outcome, &groups);
        let summary = summarize_partitions(&outcome, &labels, &groups)?;
        let positive = summary.class_index("1").expect("positive class");
        deviations.push(summary.max_fold_deviation(positive));
    }

    for pair in deviations.windows(2) {
        assert!(
            pair[1] < pair[0],
            "deviation did not shrink with finer groups: {deviations:?}"
        );
    }
    assert!(deviations[3] < 0.05, "{deviations:?}");
    Ok(())
}

#[test]
fn workflow_multilabel_targets() -> anyhow::Result<()> {
    let mut samples = Vec::new();
    let mut values = Vec::new();
    let mut groups = Vec::new();
    for clip in 0..12u32 {
        for frame in 0..(3 + clip % 4) {
            samples.push(format!("clip{clip:02}-{frame:03}"));
            groups.push(format!("clip{clip:02}"));
            // road, person, bicycle presence
            values.push(vec![
                1,
                u32::from((clip + frame) % 3 == 0),
                u32::from((clip * frame) % 5 == 1),
            ]);
        }
    }
    let labels = Labels::MultiLabel(values);

    let outcome = assign_partitions(&samples, &labels, &groups, &SplitConfig::default())?;

    assert_eq!(outcome.len(), samples.len());
    assert_groups_atomic(&outcome, &groups);
    for partition in Partition::ALL {
        assert!(outcome.partitions().contains(&partition));
    }
    let summary = summarize_partitions(&outcome, &labels, &groups)?;
    assert_eq!(summary.classes, vec!["label[0]", "label[1]", "label[2]"]);
    assert_eq!(
        summary.partitions.values().map(|s| s.class_counts[0]).sum::<u64>(),
        samples.len() as u64
    );
    Ok(())
}

#[test]
fn workflow_oversized_group_warns_but_completes() -> anyhow::Result<()> {
    let mut samples = Vec::new();
    let mut labels = Vec::new();
    let mut groups = Vec::new();
    for frame in 0..30 {
        samples.push(format!("long-{frame:03}"));
        groups.push("long".to_string());
        labels.push(if frame % 3 == 0 { "1" } else { "0" });
    }
    for seq in 0..14 {
        for frame in 0..5 {
            samples.push(format!("s{seq:02}-{frame}"));
            groups.push(format!("s{seq:02}"));
            labels.push(if frame < 2 { "1" } else { "0" });
        }
    }
    let labels = Labels::categorical(labels);

    let outcome = assign_partitions(&samples, &labels, &groups, &SplitConfig::default())?;

    assert_eq!(outcome.len(), 100);
    assert_eq!(
        outcome.warnings(),
        &[SplitWarning::DegenerateGroup {
            group: "long".into(),
            size: 30,
            ideal_fold_size: 10,
        }]
    );
    assert_groups_atomic(&outcome, &groups);
    let long = outcome.partition_of("long-000").expect("mapped");
    assert!(samples
        .iter()
        .filter(|s| s.starts_with("long-"))
        .all(|s| outcome.partition_of(s) == Some(long)));
    Ok(())
}

#[test]
fn empty_samples_rejected() {
    let samples: Vec<String> = Vec::new();
    let groups: Vec<String> = Vec::new();
    let err = assign_partitions(
        &samples,
        &Labels::Categorical(Vec::new()),
        &groups,
        &SplitConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err, SplitError::EmptyInput);
}

#[test]
fn two_folds_rejected() {
    let (samples, labels, groups) = sequence_fixture();
    let err = assign_partitions(&samples, &labels, &groups, &SplitConfig { num_folds: 2 })
        .unwrap_err();
    assert!(matches!(
        err,
        SplitError::InvalidConfiguration { num_folds: 2, .. }
    ));
}

#[test]
fn more_folds_than_groups_rejected() {
    let (samples, labels, groups) = sequence_fixture();
    let err = assign_partitions(&samples, &labels, &groups, &SplitConfig { num_folds: 21 })
        .unwrap_err();
    assert_eq!(
        err,
        SplitError::InvalidConfiguration {
            num_folds: 21,
            groups: 20,
            reason: "more folds than distinct groups",
        }
    );
}

#[test]
fn zero_width_label_vectors_rejected() {
    let (samples, _, groups) = sequence_fixture();
    let err = assign_partitions(
        &samples,
        &Labels::MultiLabel(vec![Vec::new(); samples.len()]),
        &groups,
        &SplitConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err, SplitError::EmptyLabelVector);
}

#[test]
fn misaligned_inputs_rejected() {
    let err = assign_partitions(
        &["a", "b"],
        &Labels::categorical([1]),
        &["g1", "g2"],
        &SplitConfig { num_folds: 3 },
    )
    .unwrap_err();
    assert_eq!(
        err,
        SplitError::LengthMismatch {
            samples: 2,
            labels: 1,
            groups: 2
        }
    );
}
