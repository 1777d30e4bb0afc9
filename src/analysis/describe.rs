use std::collections::HashMap;

use super::{Column, ColumnKind, Table};

/// Only the leading columns are rendered to keep the prompt short
pub const DESCRIBE_MAX_COLUMNS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub kind: ColumnKind,
    pub count: usize,
    pub unique: Option<usize>,
    pub top: Option<String>,
    pub freq: Option<usize>,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

pub fn summarize_column(column: &Column) -> ColumnSummary {
    let kind = column.kind();
    let mut summary = ColumnSummary {
        column: column.name.clone(),
        kind,
        count: column.non_missing_count(),
        unique: None,
        top: None,
        freq: None,
        mean: None,
        std_dev: None,
        min: None,
        q25: None,
        median: None,
        q75: None,
        max: None,
    };

    match kind {
        ColumnKind::Numeric => {
            let mut values = column.numbers();
            if values.is_empty() {
                return summary;
            }
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            summary.mean = Some(mean);
            summary.std_dev = std_dev(&values, mean);
            summary.min = values.first().copied();
            summary.q25 = Some(quantile(&values, 0.25));
            summary.median = Some(quantile(&values, 0.5));
            summary.q75 = Some(quantile(&values, 0.75));
            summary.max = values.last().copied();
        }
        ColumnKind::Text => {
            // Ties resolve to the value seen first
            let mut order: Vec<String> = Vec::new();
            let mut counts: HashMap<String, usize> = HashMap::new();
            for value in column.cells.iter().filter_map(|c| c.display()) {
                let entry = counts.entry(value.clone()).or_insert(0);
                if *entry == 0 {
                    order.push(value);
                }
                *entry += 1;
            }

            summary.unique = Some(order.len());
            let mut best: Option<(&String, usize)> = None;
            for value in &order {
                let count = counts[value];
                if best.map(|(_, c)| count > c).unwrap_or(true) {
                    best = Some((value, count));
                }
            }
            if let Some((value, count)) = best {
                summary.top = Some(value.clone());
                summary.freq = Some(count);
            }
        }
    }

    summary
}

/// Sample standard deviation (n - 1); undefined below two values
fn std_dev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0);
    Some(variance.sqrt())
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

#[derive(Clone, Copy)]
enum StatRow {
    Count,
    Unique,
    Top,
    Freq,
    Mean,
    Std,
    Min,
    Q25,
    Median,
    Q75,
    Max,
}

impl StatRow {
    fn label(self) -> &'static str {
        match self {
            StatRow::Count => "count",
            StatRow::Unique => "unique",
            StatRow::Top => "top",
            StatRow::Freq => "freq",
            StatRow::Mean => "mean",
            StatRow::Std => "std",
            StatRow::Min => "min",
            StatRow::Q25 => "25%",
            StatRow::Median => "50%",
            StatRow::Q75 => "75%",
            StatRow::Max => "max",
        }
    }

    fn cell(self, summary: &ColumnSummary) -> String {
        let float = |v: Option<f64>| v.map(|v| format!("{:.6}", v)).unwrap_or_else(|| "NaN".to_string());
        let int = |v: Option<usize>| v.map(|v| v.to_string()).unwrap_or_else(|| "NaN".to_string());
        match self {
            StatRow::Count => summary.count.to_string(),
            StatRow::Unique => int(summary.unique),
            StatRow::Top => summary.top.clone().unwrap_or_else(|| "NaN".to_string()),
            StatRow::Freq => int(summary.freq),
            StatRow::Mean => float(summary.mean),
            StatRow::Std => float(summary.std_dev),
            StatRow::Min => float(summary.min),
            StatRow::Q25 => float(summary.q25),
            StatRow::Median => float(summary.median),
            StatRow::Q75 => float(summary.q75),
            StatRow::Max => float(summary.max),
        }
    }
}

/// Render summary statistics for the first `max_columns` columns.
///
/// Which rows appear depends on every column of the table: text rows
/// (`unique`, `top`, `freq`) when any column is textual, numeric rows when any
/// column is numeric.
pub fn describe(table: &Table, max_columns: usize) -> String {
    let has_text = table.columns.iter().any(|c| c.kind() == ColumnKind::Text);
    let has_numeric = table.columns.iter().any(|c| c.kind() == ColumnKind::Numeric);

    let mut rows = vec![StatRow::Count];
    if has_text {
        rows.extend([StatRow::Unique, StatRow::Top, StatRow::Freq]);
    }
    if has_numeric {
        rows.extend([
            StatRow::Mean,
            StatRow::Std,
            StatRow::Min,
            StatRow::Q25,
            StatRow::Median,
            StatRow::Q75,
            StatRow::Max,
        ]);
    }

    let summaries: Vec<ColumnSummary> = table
        .columns
        .iter()
        .take(max_columns)
        .map(summarize_column)
        .collect();

    let headers: Vec<String> = summaries.iter().map(|s| s.column.clone()).collect();
    let body: Vec<(&'static str, Vec<String>)> = rows
        .iter()
        .map(|row| (row.label(), summaries.iter().map(|s| row.cell(s)).collect()))
        .collect();

    render_table(&headers, &body)
}

fn render_table(headers: &[String], body: &[(&'static str, Vec<String>)]) -> String {
    let width = |s: &str| s.chars().count();

    let index_width = body.iter().map(|(label, _)| width(label)).max().unwrap_or(0);
    let column_widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            body.iter()
                .map(|(_, cells)| width(&cells[idx]))
                .chain(std::iter::once(width(header)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(body.len() + 1);

    let mut header_line = " ".repeat(index_width);
    for (header, w) in headers.iter().zip(&column_widths) {
        header_line.push_str(&format!("  {:>w$}", header, w = w));
    }
    lines.push(header_line.trim_end().to_string());

    for (label, cells) in body {
        let mut line = format!("{:<w$}", label, w = index_width);
        for (cell, w) in cells.iter().zip(&column_widths) {
            line.push_str(&format!("  {:>w$}", cell, w = w));
        }
        lines.push(line);
    }

    lines.join("\n")
}
