use std::path::PathBuf;

use thiserror::Error;

pub type ToolResult<T> = Result<T, ToolError>;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json parse error at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("config parse error at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("no target classes configured; at least one is needed to stratify")]
    NoTargets,
    #[error("malformed split table {path} line {line}: {msg}")]
    Csv {
        path: PathBuf,
        line: usize,
        msg: String,
    },
    #[error("split table sample {0:?} is not in the EDA table")]
    UnknownSample(String),
    #[error(transparent)]
    Contract(#[from] data_contracts::ValidationError),
    #[error(transparent)]
    Split(#[from] group_split::SplitError),
}

impl ToolError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        ToolError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
