// Spreadsheet parsing - calamine for workbooks, csv for delimited text
use crate::application::spreadsheet_parser::{ImportError, ParsedWorkbook, SpreadsheetParser};
use crate::domain::view::CellValue;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookParser;

impl WorkbookParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_workbook(bytes: &[u8]) -> Result<ParsedWorkbook, ImportError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| ImportError::ParseFailure(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        let first = sheet_names.first().ok_or(ImportError::EmptyFile)?;
        let range = workbook
            .worksheet_range(first)
            .map_err(|e| ImportError::ParseFailure(format!("sheet '{}': {}", first, e)))?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_value).collect())
            .collect();

        Ok(ParsedWorkbook { sheet_names, rows })
    }

    fn parse_delimited(bytes: &[u8], delimiter: u8) -> Result<ParsedWorkbook, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| ImportError::ParseFailure(e.to_string()))?;
            rows.push(record.iter().map(text_value).collect());
        }

        Ok(ParsedWorkbook {
            sheet_names: Vec::new(),
            rows,
        })
    }
}

impl SpreadsheetParser for WorkbookParser {
    fn parse(&self, file_name: &str, bytes: &[u8]) -> Result<ParsedWorkbook, ImportError> {
        if bytes.is_empty() {
            return Err(ImportError::EmptyFile);
        }

        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Self::parse_delimited(bytes, b','),
            Some("tsv") | Some("tab") => Self::parse_delimited(bytes, b'\t'),
            _ => Self::parse_workbook(bytes),
        }
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Dates stay as spreadsheet serial numbers
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        other => CellValue::Text(other.to_string()),
    }
}

/// Delimited text has no cell types; numbers are recognized by parsing.
fn text_value(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(field.to_string()),
    }
}
