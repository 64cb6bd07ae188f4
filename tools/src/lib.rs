pub mod config;
pub mod eda_table;
pub mod error;
pub mod logging;
pub mod report;
pub mod split_table;

pub use config::SplitToolConfig;
pub use eda_table::{build_inputs, load_eda_table, SplitInputs};
pub use error::{ToolError, ToolResult};
pub use report::{align_to_table, find_group_leaks, format_summary, GroupLeak};
pub use split_table::{read_split_csv, render_csv, write_split_csv, write_split_json};
