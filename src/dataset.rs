// certgen: spreadsheet loading and name column selection

use crate::config::NAME_COLUMN_CANDIDATES;
use crate::error::CertError;
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::path::Path;

// ============================================================================
// Cells
// ============================================================================

/// A single spreadsheet value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// Spreadsheet error literal such as `#DIV/0!`
    Error(String),
}

impl Cell {
    /// Text form of the cell, before trimming.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) | Cell::Error(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(true) => "True".to_string(),
            Cell::Bool(false) => "False".to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    fn is_text(&self) -> bool {
        matches!(self, Cell::Text(_) | Cell::Error(_))
    }
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty => Cell::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::Float(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(naive) => Cell::DateTime(naive),
                None => Cell::Float(dt.as_f64()),
            },
            Data::Error(e) => Cell::Error(e.to_string()),
        }
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// Rows of a spreadsheet's first sheet, keyed by the header row
#[derive(Debug, Clone, PartialEq)]
pub struct NameDataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
    /// 1-based sheet row holding the headers
    header_row: usize,
}

impl NameDataset {
    /// Build a dataset from column names and rows. Short rows are padded with
    /// empty cells, long rows are truncated to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self {
            columns,
            rows,
            header_row: 1,
        }
    }

    /// Read the first worksheet of an xlsx/xlsm/xlsb/xls/ods file.
    pub fn load(path: &Path) -> Result<Self, CertError> {
        let display = path.display();
        let mut workbook =
            open_workbook_auto(path).map_err(|e| CertError::DatasetLoad(format!("{}: {}", display, e)))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| CertError::DatasetLoad(format!("{}: workbook has no sheets", display)))?
            .map_err(|e| CertError::DatasetLoad(format!("{}: {}", display, e)))?;

        Self::from_range(&range).map_err(|e| match e {
            CertError::DatasetLoad(msg) => CertError::DatasetLoad(format!("{}: {}", display, msg)),
            other => other,
        })
    }

    /// Interpret the first row of `range` as headers and the rest as data.
    ///
    /// The range may start below or right of `A1`; row numbers and blank
    /// header labels keep the sheet's own positions.
    pub fn from_range(range: &Range<Data>) -> Result<Self, CertError> {
        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| CertError::DatasetLoad("first sheet is empty".to_string()))?;
        let (start_row, start_col) = range.start().unwrap_or((0, 0));

        let columns = header_names(header, start_col as usize);
        let rows = rows.map(|row| row.iter().map(Cell::from).collect()).collect();
        Ok(Self {
            header_row: start_row as usize + 1,
            ..Self::new(columns, rows)
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 1-based sheet row number of data row `index`
    pub fn row_number(&self, index: usize) -> usize {
        self.header_row + 1 + index
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Trimmed text of `column` in `row`, empty when either is missing.
    pub fn name_at(&self, row: usize, column: &str) -> String {
        self.cell(row, column)
            .map(|c| c.to_text().trim().to_string())
            .unwrap_or_default()
    }

    /// A column holds text when any of its cells is textual.
    pub fn is_text_column(&self, idx: usize) -> bool {
        self.rows.iter().any(|row| row.get(idx).is_some_and(Cell::is_text))
    }
}

/// Header labels with blanks named `Unnamed: <column>` and duplicates suffixed `.1`, `.2`, ...
fn header_names(header: &[Data], first_column: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(header.len());

    for (i, value) in header.iter().enumerate() {
        let text = Cell::from(value).to_text().trim().to_string();
        let base = if text.is_empty() { format!("Unnamed: {}", first_column + i) } else { text };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}

// ============================================================================
// Name Column
// ============================================================================

/// Choose the column holding recipient names.
///
/// A preferred header wins in candidate order; otherwise the first text
/// column in column order.
pub fn pick_name_column(dataset: &NameDataset) -> Result<String, CertError> {
    if let Some(candidate) = NAME_COLUMN_CANDIDATES
        .iter()
        .find(|cand| dataset.column_index(cand).is_some())
    {
        return Ok(candidate.to_string());
    }

    (0..dataset.columns().len())
        .find(|&idx| dataset.is_text_column(idx))
        .map(|idx| dataset.columns()[idx].clone())
        .ok_or(CertError::NoSuitableColumn)
}
