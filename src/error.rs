use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur while the
/// tool reads group workbooks, aggregates their indicators, or writes the
/// consolidated report.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a JSON configuration file cannot be parsed or emitted.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the discovery pattern cannot be compiled.
    #[error("invalid search pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Raised when the target period label is absent from the header row.
    #[error("no column in row {row} holds the value '{label}' (searched columns 1..{max_columns})")]
    ConfigurationMismatch {
        row: u32,
        label: String,
        max_columns: u32,
    },

    /// Raised when a summed cell does not hold an integer or an empty value.
    #[error("malformed cell at row {row:02}, column {column:02}: '{value}'")]
    MalformedCell { row: u32, column: u32, value: String },

    /// Raised when two sources map to the same group and duplicates are rejected.
    #[error("duplicate group identifier '{0}'")]
    DuplicateGroup(String),

    /// Raised when a taxonomy declares the same category twice.
    #[error("duplicate category '{0}' in taxonomy")]
    DuplicateCategory(String),

    /// Raised when a category total no longer fits in a 64-bit integer.
    #[error("total of category '{0}' overflows")]
    TotalOverflow(String),

    /// Raised when a report cell cannot be placed in a worksheet.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a configured row interval ends before it starts.
    #[error("invalid row interval [{start}, {end}) for category '{category}'")]
    InvalidInterval {
        category: String,
        start: u32,
        end: u32,
    },

    /// Raised when a workbook lacks the sheet that holds the indicators.
    #[error("workbook {} has no sheet named '{sheet}'", .path.display())]
    MissingSheet { path: PathBuf, sheet: String },

    /// Raised when the user provides a path that does not exist.
    #[error("input not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
