//! Tabular analysis
//!
//! A small typed table model that spreadsheet and CSV readers fill in, plus
//! the statistics the report prompt is built from:
//!
//! - [`describe`]: per-column summary rendered as a fixed-width text table
//! - [`histogram`]: equal-width binning of the first numeric column

pub mod describe;
pub mod histogram;

pub use describe::{describe, summarize_column, ColumnSummary, DESCRIBE_MAX_COLUMNS};
pub use histogram::{histogram, Bucket, ChartDescriptor, HistogramError, DEFAULT_BINS};

/// Cell contents treated as missing values, matching common spreadsheet exports
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Missing,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Interpret a raw text field: missing marker, number, or text
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if Self::is_missing_marker(trimmed) {
            return CellValue::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::Text(raw.to_string()),
        }
    }

    /// Text cell that never becomes a number (spreadsheet string cells)
    pub fn text(raw: &str) -> Self {
        if Self::is_missing_marker(raw.trim()) {
            CellValue::Missing
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    fn is_missing_marker(value: &str) -> bool {
        MISSING_MARKERS.contains(&value)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Display form used when counting distinct values
    pub fn display(&self) -> Option<String> {
        match self {
            CellValue::Missing => None,
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Text(s) => Some(s.clone()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

impl Column {
    /// Numeric when no cell holds text; an all-missing column counts as numeric
    pub fn kind(&self) -> ColumnKind {
        if self.cells.iter().any(|c| matches!(c, CellValue::Text(_))) {
            ColumnKind::Text
        } else {
            ColumnKind::Numeric
        }
    }

    /// Non-missing numeric values in row order
    pub fn numbers(&self) -> Vec<f64> {
        self.cells
            .iter()
            .filter_map(|c| match c {
                CellValue::Number(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn non_missing_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_missing()).count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    /// Build a column-major table from a header row and data rows.
    /// Short rows are padded with missing cells.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let headers = normalize_headers(headers);
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column {
                name,
                cells: Vec::with_capacity(rows.len()),
            })
            .collect();

        for row in rows {
            let mut row = row.into_iter();
            for column in columns.iter_mut() {
                column.cells.push(row.next().unwrap_or(CellValue::Missing));
            }
        }

        Self { columns }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.cells.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.kind() == ColumnKind::Numeric)
    }
}

/// Blank headers become `Unnamed: {index}` and repeats get a `.N` suffix
fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut out = Vec::with_capacity(headers.len());

    for (idx, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            header
        };

        let mut name = base.clone();
        while let Some(count) = seen.get(&name).copied() {
            seen.insert(name.clone(), count + 1);
            name = format!("{}.{}", base, count);
        }
        seen.insert(name.clone(), 1);
        out.push(name);
    }

    out
}
