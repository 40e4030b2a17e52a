use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("Shape error: {times} time descriptions but {locations} locations")]
    Shape { times: usize, locations: usize },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Parse error in row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("Source sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Invalid row range: start row {start} is after end row {end}")]
    InvalidRowRange { start: u32, end: u32 },

    #[error("{what} {value} is past the worksheet limit of {limit} rows")]
    RowLimit {
        what: &'static str,
        value: u32,
        limit: u32,
    },

    #[error("Destination sheet name already taken: {0}")]
    SheetNameTaken(String),

    #[error("Output file already exists: {} (use --force to overwrite)", .0.display())]
    OutputExists(PathBuf),

    #[error("No class rows found in rows {start}-{end}")]
    NoClasses { start: u32, end: u32 },

    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    #[error("Unsupported input format: {0}")]
    UnsupportedInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),
}

pub type Result<T> = std::result::Result<T, TimetableError>;
