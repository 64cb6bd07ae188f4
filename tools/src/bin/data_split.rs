use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use group_split::{assign_partitions, summarize_partitions, SplitConfig};
use split_tools::{
    build_inputs, format_summary, load_eda_table, logging::init_tracing, write_split_csv,
    write_split_json, SplitToolConfig,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "data_split",
    about = "Assign EDA-table samples to train/valid/test without splitting groups"
)]
struct Args {
    /// TOML config; defaults to $GROUP_SPLIT_CONFIG or ./group-split.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// EDA table (JSON array of {file_name, classes}).
    #[arg(long)]
    eda_table: Option<PathBuf>,
    /// Output CSV with columns sample_id,partition.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Optional JSON copy of the split table.
    #[arg(long)]
    json: Option<PathBuf>,
    /// Class column(s) to stratify on; repeat for multi-label balancing.
    #[arg(long = "target")]
    targets: Vec<String>,
    /// Number of internal folds (fold 0 -> test, fold 1 -> valid).
    #[arg(long)]
    num_folds: Option<usize>,
    /// Group id is the part of the file name before this separator.
    #[arg(long)]
    separator: Option<String>,
    /// Split only the first N rows (debug subset).
    #[arg(long)]
    limit: Option<usize>,
}

fn resolve_config(args: Args) -> Result<SplitToolConfig> {
    let mut cfg = match &args.config {
        Some(path) => SplitToolConfig::from_path_strict(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => SplitToolConfig::load(),
    };
    if let Some(v) = args.eda_table {
        cfg.eda_table = v;
    }
    if let Some(v) = args.output {
        cfg.split_table = v;
    }
    if args.json.is_some() {
        cfg.split_json = args.json;
    }
    if !args.targets.is_empty() {
        cfg.targets = args.targets;
    }
    if let Some(v) = args.num_folds {
        cfg.num_folds = v;
    }
    if let Some(v) = args.separator {
        cfg.group_separator = v;
    }
    if args.limit.is_some() {
        cfg.limit = args.limit;
    }
    cfg.warn_if_invalid();
    Ok(cfg)
}

fn main() -> Result<()> {
    init_tracing();
    let cfg = resolve_config(Args::parse())?;

    let mut rows = load_eda_table(&cfg.eda_table)
        .with_context(|| format!("load EDA table {}", cfg.eda_table.display()))?;
    if let Some(limit) = cfg.limit {
        rows.truncate(limit);
    }
    info!(rows = rows.len(), targets = ?cfg.targets, "loaded EDA table");

    let inputs = build_inputs(&rows, &cfg.targets, &cfg.group_separator)
        .context("build split inputs")?;
    let outcome = assign_partitions(
        &inputs.samples,
        &inputs.labels,
        &inputs.groups,
        &SplitConfig {
            num_folds: cfg.num_folds,
        },
    )
    .context("assign partitions")?;

    let table = outcome.to_table();
    write_split_csv(&cfg.split_table, &table)
        .with_context(|| format!("write {}", cfg.split_table.display()))?;
    info!(path = %cfg.split_table.display(), "wrote split table");
    if let Some(path) = &cfg.split_json {
        write_split_json(path, &table).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "wrote split json");
    }

    let summary = summarize_partitions(&outcome, &inputs.labels, &inputs.groups)?;
    print!("{}", format_summary(&summary, &cfg.targets));
    Ok(())
}
