//! CSV and JSON persistence of the `sample_id,partition` table.

use std::fs;
use std::path::Path;

use data_contracts::{Partition, SplitRow, SplitTable};

use crate::error::{ToolError, ToolResult};

pub const HEADER: &str = "sample_id,partition";

pub fn render_csv(table: &SplitTable) -> String {
    let mut out = String::with_capacity(table.len() * 24 + HEADER.len() + 1);
    out.push_str(HEADER);
    out.push('\n');
    for row in &table.rows {
        out.push_str(&quote_field(&row.sample_id));
        out.push(',');
        out.push_str(row.partition.as_str());
        out.push('\n');
    }
    out
}

pub fn write_split_csv(path: &Path, table: &SplitTable) -> ToolResult<()> {
    table.validate()?;
    create_parent(path)?;
    fs::write(path, render_csv(table)).map_err(|e| ToolError::io(path, e))
}

pub fn write_split_json(path: &Path, table: &SplitTable) -> ToolResult<()> {
    table.validate()?;
    create_parent(path)?;
    let json = serde_json::to_string_pretty(table).map_err(|source| ToolError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|e| ToolError::io(path, e))
}

pub fn read_split_csv(path: &Path) -> ToolResult<SplitTable> {
    let raw = fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
    let table = parse_csv(&raw).map_err(|(line, msg)| ToolError::Csv {
        path: path.to_path_buf(),
        line,
        msg,
    })?;
    table.validate()?;
    Ok(table)
}

fn create_parent(path: &Path) -> ToolResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ToolError::io(parent, e))?;
    }
    Ok(())
}

fn quote_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Parses the two-column table; errors carry a 1-based line number.
fn parse_csv(raw: &str) -> Result<SplitTable, (usize, String)> {
    let records = split_records(raw)?;
    let mut records = records.into_iter();
    match records.next() {
        Some((_, header)) if header == ["sample_id", "partition"] => {}
        Some((line, header)) => return Err((line, format!("unexpected header {header:?}"))),
        None => return Err((1, "missing header".to_string())),
    }
    let mut rows = Vec::new();
    for (line, fields) in records {
        let [sample_id, partition]: [String; 2] = fields
            .try_into()
            .map_err(|f: Vec<String>| (line, format!("expected 2 fields, found {}", f.len())))?;
        let partition: Partition = partition.parse().map_err(|e| (line, format!("{e}")))?;
        rows.push(SplitRow {
            sample_id,
            partition,
        });
    }
    Ok(SplitTable { rows })
}

/// RFC 4180 record splitting; blank lines are skipped.
fn split_records(raw: &str) -> Result<Vec<(usize, Vec<String>)>, (usize, String)> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            ('"', true) => in_quotes = false,
            ('"', false) if field.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut field)),
            ('\r', false) => {}
            ('\n', false) => {
                fields.push(std::mem::take(&mut field));
                if !(fields.len() == 1 && fields[0].is_empty()) {
                    records.push((record_line, std::mem::take(&mut fields)));
                }
                fields.clear();
                line += 1;
                record_line = line;
            }
            (c, _) => {
                if c == '\n' {
                    line += 1;
                }
                field.push(c);
            }
        }
    }
    if in_quotes {
        return Err((record_line, "unterminated quoted field".to_string()));
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }
    Ok(records)
}
