use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use group_split::summarize_table;
use split_tools::{
    align_to_table, find_group_leaks, format_summary, load_eda_table, logging::init_tracing,
    read_split_csv, SplitToolConfig,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "split_report",
    about = "Check a persisted split table for group leakage and print label balance"
)]
struct Args {
    /// TOML config; defaults to $GROUP_SPLIT_CONFIG or ./group-split.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// EDA table the split was produced from.
    #[arg(long)]
    eda_table: Option<PathBuf>,
    /// Split CSV to audit.
    #[arg(long)]
    split: Option<PathBuf>,
    /// Class column(s) to report rates for.
    #[arg(long = "target")]
    targets: Vec<String>,
    /// Group id is the part of the file name before this separator.
    #[arg(long)]
    separator: Option<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => SplitToolConfig::from_path_strict(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => SplitToolConfig::load(),
    };
    if let Some(v) = args.eda_table {
        cfg.eda_table = v;
    }
    if let Some(v) = args.split {
        cfg.split_table = v;
    }
    if !args.targets.is_empty() {
        cfg.targets = args.targets;
    }
    if let Some(v) = args.separator {
        cfg.group_separator = v;
    }
    cfg.warn_if_invalid();
    let eda_path = cfg.eda_table;
    let split_path = cfg.split_table;
    let targets = cfg.targets;
    let separator = cfg.group_separator;

    let table = read_split_csv(&split_path)
        .with_context(|| format!("read split table {}", split_path.display()))?;
    let rows = load_eda_table(&eda_path)
        .with_context(|| format!("load EDA table {}", eda_path.display()))?;
    info!(rows = table.len(), "loaded split table");

    let inputs = align_to_table(&table, &rows, &targets, &separator)?;
    let summary = summarize_table(&table, &inputs.labels, &inputs.groups)?;
    print!("{}", format_summary(&summary, &targets));

    let leaks = find_group_leaks(&table, &inputs.groups);
    for leak in &leaks {
        error!(group = %leak.group, partitions = ?leak.partitions, "group spans partitions");
    }
    if !leaks.is_empty() {
        bail!("{} group(s) leak across partitions", leaks.len());
    }
    println!("no group leakage across {} groups", summary.overall.groups);
    Ok(())
}
