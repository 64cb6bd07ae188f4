use std::path::{Path, PathBuf};

use group_split::{DEFAULT_GROUP_SEPARATOR, DEFAULT_NUM_FOLDS, MIN_NUM_FOLDS};
use serde::Deserialize;
use tracing::warn;

use crate::error::{ToolError, ToolResult};

pub const CONFIG_ENV: &str = "GROUP_SPLIT_CONFIG";
const DEFAULT_CONFIG_NAME: &str = "group-split.toml";
const DEFAULT_CLASSES: [&str; 7] = [
    "background",
    "road",
    "traffic light",
    "traffic sign",
    "person",
    "vehicle",
    "bicycle",
];

#[derive(Debug, Clone, PartialEq)]
pub struct SplitToolConfig {
    pub eda_table: PathBuf,
    pub split_table: PathBuf,
    pub split_json: Option<PathBuf>,
    pub classes: Vec<String>,
    pub targets: Vec<String>,
    pub num_folds: usize,
    pub group_separator: String,
    /// Only the first `limit` rows of the EDA table are split (debug subsets).
    pub limit: Option<usize>,
}

impl Default for SplitToolConfig {
    fn default() -> Self {
        let artifacts_root = PathBuf::from("artifacts");
        Self {
            eda_table: artifacts_root.join("eda_table.json"),
            split_table: artifacts_root.join("data_split.csv"),
            split_json: None,
            classes: DEFAULT_CLASSES.iter().map(|c| c.to_string()).collect(),
            targets: vec!["bicycle".to_string()],
            num_folds: DEFAULT_NUM_FOLDS,
            group_separator: DEFAULT_GROUP_SEPARATOR.to_string(),
            limit: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct SplitToolConfigFile {
    artifacts_root: Option<String>,
    dataset: Option<DatasetSection>,
    split: Option<SplitSection>,
}

#[derive(Debug, Deserialize, Default)]
struct DatasetSection {
    eda_table: Option<String>,
    classes: Option<Vec<String>>,
    group_separator: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct SplitSection {
    output: Option<String>,
    json: Option<String>,
    targets: Option<Vec<String>>,
    num_folds: Option<usize>,
}

impl SplitToolConfig {
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let cfg = Self::from_path(Path::new(&path)).unwrap_or_default();
            cfg.warn_if_invalid();
            return cfg;
        }
        let cfg = Self::from_path(Path::new(DEFAULT_CONFIG_NAME)).unwrap_or_default();
        cfg.warn_if_invalid();
        cfg
    }

    /// Lenient load for implicit config locations: missing or malformed files yield `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::from_path_strict(path) {
            Ok(cfg) => Some(cfg),
            Err(err) => {
                warn!("split config: {err}");
                None
            }
        }
    }

    /// Load a config the user named explicitly; a missing or malformed file is an error.
    pub fn from_path_strict(path: &Path) -> ToolResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
        let file = toml::from_str::<SplitToolConfigFile>(&raw).map_err(|source| {
            ToolError::Config {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(Self::from_file(file))
    }

    fn from_file(file: SplitToolConfigFile) -> Self {
        let defaults = Self::default();
        let artifacts_root = file
            .artifacts_root
            .map(|v| expand_path(&v))
            .unwrap_or_else(|| PathBuf::from("artifacts"));
        let dataset = file.dataset.unwrap_or_default();
        let split = file.split.unwrap_or_default();

        SplitToolConfig {
            eda_table: dataset
                .eda_table
                .map(|v| expand_path(&v))
                .unwrap_or_else(|| artifacts_root.join("eda_table.json")),
            split_table: split
                .output
                .map(|v| expand_path(&v))
                .unwrap_or_else(|| artifacts_root.join("data_split.csv")),
            split_json: split.json.map(|v| expand_path(&v)),
            classes: dataset.classes.unwrap_or(defaults.classes),
            targets: split.targets.unwrap_or(defaults.targets),
            num_folds: split.num_folds.unwrap_or(defaults.num_folds),
            group_separator: dataset
                .group_separator
                .unwrap_or(defaults.group_separator),
            limit: dataset.limit,
        }
    }

    pub fn warn_if_invalid(&self) {
        if self.targets.is_empty() {
            warn!("split config: targets is empty; nothing to stratify on");
        }
        for target in &self.targets {
            if !self.classes.contains(target) {
                warn!("split config: target {target:?} is not one of the dataset classes");
            }
        }
        if self.num_folds < MIN_NUM_FOLDS {
            warn!(
                "split config: num_folds={} is below {MIN_NUM_FOLDS}; the split will be rejected",
                self.num_folds
            );
        }
        if self.group_separator.is_empty() {
            warn!("split config: group_separator is empty; every sample becomes its own group");
        }
        if self.limit == Some(0) {
            warn!("split config: limit is 0; no rows will be split");
        }
    }
}

fn expand_path(raw: &str) -> PathBuf {
    let mut out = raw.to_string();
    if let Some(stripped) = out.strip_prefix("~") {
        if let Ok(home) = std::env::var("HOME") {
            out = format!("{home}{stripped}");
        }
    }
    PathBuf::from(expand_env(&out))
}

fn expand_env(input: &str) -> String {
    let mut out = String::new();
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match std::env::var(key) {
                    Ok(val) => out.push_str(&val),
                    Err(_) => out.push_str(&format!("${{{key}}}")),
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
