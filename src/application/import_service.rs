// Import service - turns an uploaded spreadsheet into view headers and records
use crate::application::spreadsheet_parser::{ImportError, ParsedWorkbook, SpreadsheetParser};
use crate::domain::view::{CellValue, Record};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct ImportedTable {
    pub source_name: String,
    pub sheet_name: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
    pub truncated: bool,
}

#[derive(Clone)]
pub struct ImportService {
    parser: Arc<dyn SpreadsheetParser>,
    max_rows: usize,
}

impl ImportService {
    pub fn new(parser: Arc<dyn SpreadsheetParser>, max_rows: usize) -> Self {
        Self { parser, max_rows }
    }

    pub async fn import_path(&self, path: &Path) -> Result<ImportedTable, ImportError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ImportError::ParseFailure(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.import_bytes(file_name, bytes).await
    }

    pub async fn import_bytes(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<ImportedTable, ImportError> {
        let parser = self.parser.clone();
        let name = file_name.clone();

        // Workbook decoding is CPU-bound
        let workbook = tokio::task::spawn_blocking(move || parser.parse(&name, &bytes))
            .await
            .map_err(|e| ImportError::ParseFailure(format!("parser task failed: {}", e)))??;

        let table = build_table(file_name, workbook, self.max_rows)?;
        if table.truncated {
            tracing::warn!(
                "Import of {} truncated to {} rows",
                table.source_name,
                self.max_rows
            );
        }
        tracing::debug!(
            "Parsed {}: {} columns, {} rows",
            table.source_name,
            table.headers.len(),
            table.rows.len()
        );

        Ok(table)
    }
}

/// Split the first sheet into a header row and keyed records.
///
/// Fully blank rows are skipped. Blank header cells become `Column N` and
/// repeated headers get a numeric suffix so every record key is unique.
pub fn build_table(
    source_name: String,
    workbook: ParsedWorkbook,
    max_rows: usize,
) -> Result<ImportedTable, ImportError> {
    let mut rows = workbook
        .rows
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()));

    let header_row = rows.next().ok_or(ImportError::EmptyFile)?;
    let headers = normalize_headers(&header_row);

    let mut records = Vec::new();
    let mut truncated = false;
    for row in rows {
        if records.len() == max_rows {
            truncated = true;
            break;
        }
        let record: Record = headers
            .iter()
            .zip(row)
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header.clone(), cell))
            .collect();
        records.push(record);
    }

    if records.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    Ok(ImportedTable {
        source_name,
        sheet_name: workbook.sheet_names.into_iter().next(),
        headers,
        rows: records,
        truncated,
    })
}

fn normalize_headers(cells: &[CellValue]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut headers = Vec::with_capacity(cells.len());

    for (index, cell) in cells.iter().enumerate() {
        let base = match cell.to_string().trim() {
            "" => format!("Column {}", index + 1),
            text => text.to_string(),
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while !seen.insert(candidate.clone()) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        headers.push(candidate);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    struct FixedParser(Result<ParsedWorkbook, ImportError>);

    impl SpreadsheetParser for FixedParser {
        fn parse(&self, _file_name: &str, _bytes: &[u8]) -> Result<ParsedWorkbook, ImportError> {
            self.0.clone()
        }
    }

    fn workbook(rows: Vec<Vec<CellValue>>) -> ParsedWorkbook {
        ParsedWorkbook {
            sheet_names: vec!["Sheet1".to_string()],
            rows,
        }
    }

    #[test]
    fn test_first_row_becomes_headers() {
        let table = build_table(
            "sales.xlsx".to_string(),
            workbook(vec![
                vec![text("Revenue"), text("Region")],
                vec![CellValue::Number(1200.0), text("North")],
            ]),
            100,
        )
        .unwrap();

        assert_eq!(table.headers, vec!["Revenue", "Region"]);
        assert_eq!(table.sheet_name.as_deref(), Some("Sheet1"));
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0]["Revenue"], CellValue::Number(1200.0));
        assert_eq!(table.rows[0]["Region"], text("North"));
    }

    #[test]
    fn test_blank_and_duplicate_headers() {
        let table = build_table(
            "t.csv".to_string(),
            workbook(vec![
                vec![text("Name"), CellValue::Empty, text("Name"), text("Name")],
                vec![text("a"), text("b"), text("c"), text("d")],
            ]),
            100,
        )
        .unwrap();

        assert_eq!(table.headers, vec!["Name", "Column 2", "Name_1", "Name_2"]);
        assert_eq!(table.rows[0]["Column 2"], text("b"));
    }

    #[test]
    fn test_blank_rows_and_cells_are_skipped() {
        let table = build_table(
            "t.csv".to_string(),
            workbook(vec![
                vec![CellValue::Empty, text("  ")],
                vec![text("A"), text("B")],
                vec![CellValue::Empty, CellValue::Empty],
                vec![text("1"), CellValue::Empty],
            ]),
            100,
        )
        .unwrap();

        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.rows.len(), 1);
        assert!(!table.rows[0].contains_key("B"));
    }

    #[test]
    fn test_empty_sheet_is_rejected() {
        assert_eq!(
            build_table("t.csv".to_string(), workbook(Vec::new()), 100),
            Err(ImportError::EmptyFile)
        );
        assert_eq!(
            build_table("t.csv".to_string(), workbook(vec![vec![text("Only")]]), 100),
            Err(ImportError::EmptyFile)
        );
    }

    #[test]
    fn test_rows_past_limit_are_truncated() {
        let mut rows = vec![vec![text("N")]];
        rows.extend((0..5).map(|n| vec![CellValue::Number(n as f64)]));

        let table = build_table("t.csv".to_string(), workbook(rows), 3).unwrap();
        assert!(table.truncated);
        assert_eq!(table.rows.len(), 3);
    }

    #[tokio::test]
    async fn test_import_bytes_uses_parser() {
        let parser = FixedParser(Ok(workbook(vec![
            vec![text("Revenue")],
            vec![CellValue::Number(5.0)],
        ])));
        let service = ImportService::new(Arc::new(parser), 100);

        let table = service
            .import_bytes("q1.xlsx".to_string(), Vec::new())
            .await
            .unwrap();
        assert_eq!(table.source_name, "q1.xlsx");
        assert_eq!(table.headers, vec!["Revenue"]);
    }

    #[tokio::test]
    async fn test_parser_failure_is_propagated() {
        let parser = FixedParser(Err(ImportError::ParseFailure("corrupt".to_string())));
        let service = ImportService::new(Arc::new(parser), 100);

        let result = service.import_bytes("bad.xlsx".to_string(), vec![1, 2, 3]).await;
        assert_eq!(result, Err(ImportError::ParseFailure("corrupt".to_string())));
    }

    #[tokio::test]
    async fn test_missing_file_is_a_parse_failure() {
        let parser = FixedParser(Ok(ParsedWorkbook::default()));
        let service = ImportService::new(Arc::new(parser), 100);

        let result = service
            .import_path(Path::new("/definitely/not/here.xlsx"))
            .await;
        assert!(matches!(result, Err(ImportError::ParseFailure(_))));
    }
}
