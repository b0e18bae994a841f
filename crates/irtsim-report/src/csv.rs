//! Delimited-text table output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use irtsim_core::traits::{Table, TableSink};

/// Quote a field when it contains the delimiter, a quote or a line break.
/// Embedded quotes are doubled.
fn quote_field(field: &str, delimiter: char) -> String {
    if field.contains(delimiter) || field.contains('"') || field.contains('\n') || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_record(out: &mut String, cells: &[String], delimiter: char) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        out.push_str(&quote_field(cell, delimiter));
    }
    out.push('\n');
}

/// Render a table as delimited text: header line, then one line per row.
pub fn generate_csv(table: &Table, delimiter: char) -> String {
    let mut out = String::new();
    push_record(&mut out, &table.header, delimiter);
    for row in &table.rows {
        push_record(&mut out, row, delimiter);
    }
    out
}

/// Write a table to `path`, creating parent directories.
pub fn write_csv_table(table: &Table, path: &Path, delimiter: char) -> Result<()> {
    let csv = generate_csv(table, delimiter);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Writes each table to `<dir>/<name>.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectorySink {
    dir: PathBuf,
    delimiter: char,
    written: Vec<PathBuf>,
}

impl CsvDirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            delimiter: ',',
            written: Vec::new(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl TableSink for CsvDirectorySink {
    fn write_table(&mut self, table: &Table) -> Result<()> {
        let path = self.path_for(&table.name);
        write_csv_table(table, &path, self.delimiter)?;
        tracing::info!(path = %path.display(), rows = table.rows.len(), "wrote table");
        self.written.push(path);
        Ok(())
    }
}
