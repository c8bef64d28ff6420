//! Benchmark result tables: one key column of row labels plus numeric columns.

use crate::domain::error::{HarnessError, HarnessResult};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    /// NaN marks an empty cell.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct ResultTable {
    pub path: PathBuf,
    pub labels: Vec<String>,
    pub columns: Vec<Column>,
}

impl ResultTable {
    pub fn rows(&self) -> usize {
        self.labels.len()
    }

    pub fn column(&self, name: &str) -> HarnessResult<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| HarnessError::MissingColumn {
                path: self.path.clone(),
                column: name.to_string(),
            })
    }

    pub fn select(&self, names: &[String]) -> HarnessResult<Vec<&Column>> {
        if names.is_empty() {
            return Ok(self.columns.iter().collect());
        }
        names.iter().map(|n| self.column(n)).collect()
    }

    /// Headers of the selected columns read as numbers, e.g. input sizes of a
    /// scalability run.
    pub fn numeric_headers(&self, names: &[String]) -> HarnessResult<Vec<f64>> {
        self.select(names)?
            .into_iter()
            .map(|c| {
                c.name
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| HarnessError::NonNumericHeader {
                        path: self.path.clone(),
                        header: c.name.clone(),
                    })
            })
            .collect()
    }
}

pub fn load_table(path: &Path, key_column: &str) -> HarnessResult<ResultTable> {
    let csv_err = |source| HarnessError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?.clone();
    let key_idx = headers
        .iter()
        .position(|h| h == key_column)
        .ok_or_else(|| HarnessError::MissingColumn {
            path: path.to_path_buf(),
            column: key_column.to_string(),
        })?;

    let mut labels = Vec::new();
    let mut columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != key_idx)
        .map(|(_, h)| Column {
            name: h.to_string(),
            values: Vec::new(),
        })
        .collect();

    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let label = record.get(key_idx).unwrap_or_default().to_string();
        let cells = record.iter().enumerate().filter(|(i, _)| *i != key_idx);
        for ((_, cell), column) in cells.zip(columns.iter_mut()) {
            let value = if cell.is_empty() {
                f64::NAN
            } else {
                cell.parse::<f64>()
                    .map_err(|_| HarnessError::InvalidNumber {
                        path: path.to_path_buf(),
                        column: column.name.clone(),
                        row: label.clone(),
                        value: cell.to_string(),
                    })?
            };
            column.values.push(value);
        }
        labels.push(label);
    }

    if labels.is_empty() {
        return Err(HarnessError::EmptyTable(path.to_path_buf()));
    }
    tracing::debug!(
        path = %path.display(),
        rows = labels.len(),
        columns = columns.len(),
        "loaded result table"
    );

    Ok(ResultTable {
        path: path.to_path_buf(),
        labels,
        columns,
    })
}

/// Appends one row, writing `header` first when the file is new or empty.
pub fn append_row(path: &Path, header: &[String], row: &[String]) -> HarnessResult<()> {
    let csv_err = |source| HarnessError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let is_new = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    if !is_new {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(csv_err)?;
        let existing = reader.headers().map_err(csv_err)?;
        if !existing.iter().eq(header.iter().map(String::as_str)) {
            return Err(HarnessError::HeaderMismatch {
                path: path.to_path_buf(),
                expected: header.join(","),
                found: existing.iter().collect::<Vec<_>>().join(","),
            });
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| HarnessError::io(parent, e))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| HarnessError::io(path, e))?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if is_new {
        writer.write_record(header).map_err(csv_err)?;
    }
    writer.write_record(row).map_err(csv_err)?;
    writer.flush().map_err(|e| HarnessError::io(path, e))?;
    Ok(())
}
