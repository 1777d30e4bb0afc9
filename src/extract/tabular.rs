// CSV and spreadsheet readers feeding the tabular analysis

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;

use super::ExtractionError;
use crate::analysis::{describe, histogram, CellValue, ChartDescriptor, Table, DEFAULT_BINS, DESCRIBE_MAX_COLUMNS};

const NO_COLUMNS: &str = "No columns to parse from file";

/// Parse CSV bytes; the first record is the header row
pub fn read_csv(data: &[u8]) -> Result<Table, ExtractionError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() {
        return Err(ExtractionError::Malformed(NO_COLUMNS.to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(ExtractionError::Malformed(format!(
                "Error tokenizing data. Expected {} fields in line {}, saw {}",
                headers.len(),
                line,
                record.len()
            )));
        }
        rows.push(record.iter().map(CellValue::parse).collect());
    }

    Ok(Table::from_rows(headers, rows))
}

/// Parse the first worksheet of an xlsx/xls workbook; the first row is the header row
pub fn read_excel(data: &[u8]) -> Result<Table, ExtractionError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ExtractionError::Malformed("Workbook contains no sheets".to_string()))??;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|cell| cell.to_string()).collect(),
        None => return Err(ExtractionError::Malformed(NO_COLUMNS.to_string())),
    };

    let body = rows
        .map(|row| row.iter().map(excel_cell).collect())
        .collect();

    Ok(Table::from_rows(headers, body))
}

fn excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Missing,
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Float(n) => CellValue::Number(*n),
        Data::String(s) => CellValue::text(s),
        Data::Bool(b) => CellValue::Text(if *b { "True" } else { "False" }.to_string()),
        other => CellValue::text(&other.to_string()),
    }
}

/// Statistics text for the prompt plus a histogram of the first numeric column
pub fn summarize(table: &Table) -> Result<(String, Option<ChartDescriptor>), ExtractionError> {
    if table.is_empty() {
        return Err(ExtractionError::Malformed(NO_COLUMNS.to_string()));
    }

    let stats = describe(table, DESCRIBE_MAX_COLUMNS);

    let chart = match table.numeric_columns().next() {
        Some(column) => {
            let buckets = histogram(&column.numbers(), DEFAULT_BINS)?;
            if buckets.is_empty() {
                None
            } else {
                Some(ChartDescriptor::from_buckets(column.name.clone(), &buckets))
            }
        }
        None => None,
    };

    Ok((stats, chart))
}
