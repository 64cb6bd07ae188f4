//! Auditing and pretty-printing of split tables.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;

use data_contracts::{EdaRow, Partition, SplitTable};
use group_split::PartitionSummary;

use crate::eda_table::{build_inputs, SplitInputs};
use crate::error::{ToolError, ToolResult};

/// A group whose samples landed in more than one partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLeak {
    pub group: String,
    pub partitions: BTreeSet<Partition>,
}

/// `groups` is parallel to `table.rows`.
pub fn find_group_leaks<G: AsRef<str>>(table: &SplitTable, groups: &[G]) -> Vec<GroupLeak> {
    let mut seen: BTreeMap<&str, BTreeSet<Partition>> = BTreeMap::new();
    for (row, group) in table.rows.iter().zip(groups) {
        seen.entry(group.as_ref()).or_default().insert(row.partition);
    }
    seen.into_iter()
        .filter(|(_, partitions)| partitions.len() > 1)
        .map(|(group, partitions)| GroupLeak {
            group: group.to_string(),
            partitions,
        })
        .collect()
}

/// Split inputs for the EDA rows, reordered to follow the table rows.
pub fn align_to_table(
    table: &SplitTable,
    rows: &[EdaRow],
    targets: &[String],
    separator: &str,
) -> ToolResult<SplitInputs> {
    let by_name: HashMap<&str, &EdaRow> = rows.iter().map(|r| (r.file_name.as_str(), r)).collect();
    let ordered = table
        .rows
        .iter()
        .map(|row| {
            by_name
                .get(row.sample_id.as_str())
                .map(|r| (*r).clone())
                .ok_or_else(|| ToolError::UnknownSample(row.sample_id.clone()))
        })
        .collect::<ToolResult<Vec<EdaRow>>>()?;
    build_inputs(&ordered, targets, separator)
}

fn class_label(class: &str, targets: &[String]) -> String {
    match targets {
        [single] => format!("{single}={class}"),
        _ => class
            .strip_prefix("label[")
            .and_then(|rest| rest.strip_suffix(']'))
            .and_then(|i| i.parse::<usize>().ok())
            .and_then(|i| targets.get(i))
            .cloned()
            .unwrap_or_else(|| class.to_string()),
    }
}

/// Stage counts and label rates, one line per partition.
pub fn format_summary(summary: &PartitionSummary, targets: &[String]) -> String {
    let mut out = String::from("data split:\n");
    let labels: Vec<String> = summary
        .classes
        .iter()
        .map(|c| class_label(c, targets))
        .collect();
    let mut line = |name: &str, stats: &group_split::BucketStats| {
        let _ = write!(
            out,
            "  {name:<6} {:>6} samples {:>5} groups",
            stats.samples, stats.groups
        );
        for (i, label) in labels.iter().enumerate() {
            let _ = write!(out, "  {label}: {:.3}", stats.rate(i));
        }
        out.push('\n');
    };
    for (partition, stats) in &summary.partitions {
        line(partition.as_str(), stats);
    }
    line("total", &summary.overall);
    out
}
