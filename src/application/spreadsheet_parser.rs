// Parser trait for uploaded spreadsheet files
use crate::domain::view::CellValue;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("the spreadsheet has no data rows")]
    EmptyFile,

    #[error("could not read spreadsheet: {0}")]
    ParseFailure(String),
}

/// Raw contents of a workbook: every sheet name, and the cells of the first sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedWorkbook {
    pub sheet_names: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

pub trait SpreadsheetParser: Send + Sync {
    /// Parse raw file bytes; `file_name` is used to pick the format
    fn parse(&self, file_name: &str, bytes: &[u8]) -> Result<ParsedWorkbook, ImportError>;
}
