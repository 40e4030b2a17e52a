use crate::error::{Result, TimetableError};
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::utility::{column_name_to_number, column_number_to_name};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Excel's column limit (XFD)
const MAX_COLUMNS: u16 = 16_384;

/// Excel's row limit
pub const MAX_ROWS: u32 = 1_048_576;

/// Validate a 1-based, inclusive row range against itself and the sheet limit
pub fn check_row_range(start_row: u32, end_row: u32) -> Result<()> {
    if start_row == 0 || start_row > end_row {
        return Err(TimetableError::InvalidRowRange {
            start: start_row,
            end: end_row,
        });
    }
    if end_row > MAX_ROWS {
        return Err(TimetableError::RowLimit {
            what: "End row",
            value: end_row,
            limit: MAX_ROWS,
        });
    }
    Ok(())
}

/// A zero-based worksheet column, written as letters ("A", "E", "AA")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef(pub u16);

impl ColumnRef {
    pub fn index(&self) -> u16 {
        self.0
    }

    pub fn letters(&self) -> String {
        column_number_to_name(self.0)
    }
}

impl FromStr for ColumnRef {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self> {
        let letters = s.trim().to_ascii_uppercase();
        if letters.is_empty()
            || letters.len() > 3
            || !letters.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(TimetableError::InvalidColumn(s.to_string()));
        }

        let col = column_name_to_number(&letters);
        if col >= MAX_COLUMNS {
            return Err(TimetableError::InvalidColumn(s.to_string()));
        }
        Ok(ColumnRef(col))
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letters())
    }
}

/// Time descriptions and locations read from a row range, index-aligned
#[derive(Debug, Clone, Default)]
pub struct ClassColumns {
    pub first_row: u32,
    pub times: Vec<String>,
    pub locations: Vec<String>,
}

/// One worksheet's cell text, plus the names of every sheet in its workbook
#[derive(Debug, Clone)]
pub struct SourceSheet {
    pub name: String,
    pub workbook_sheets: Vec<String>,
    cells: Vec<Vec<String>>,
}

impl SourceSheet {
    pub fn new(
        name: impl Into<String>,
        workbook_sheets: Vec<String>,
        cells: Vec<Vec<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            workbook_sheets,
            cells,
        }
    }

    /// Text of a cell by zero-based position; cells outside the data read as ""
    pub fn cell(&self, row: u32, col: u16) -> &str {
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Last 1-based row that holds any non-blank cell (0 for an empty sheet)
    pub fn last_used_row(&self) -> u32 {
        self.cells
            .iter()
            .rposition(|r| r.iter().any(|c| !c.trim().is_empty()))
            .map(|idx| idx as u32 + 1)
            .unwrap_or(0)
    }

    /// Whether `name` collides with a sheet in the source workbook.
    /// Sheet names are compared case-insensitively, as spreadsheet apps do.
    pub fn has_sheet_named(&self, name: &str) -> bool {
        self.workbook_sheets
            .iter()
            .any(|s| s.eq_ignore_ascii_case(name))
    }

    /// Read two columns over the 1-based, inclusive row range `start_row..=end_row`.
    /// Rows past the last used row are blank, so reading stops there.
    pub fn read_columns(
        &self,
        start_row: u32,
        end_row: u32,
        time_column: ColumnRef,
        location_column: ColumnRef,
    ) -> Result<ClassColumns> {
        check_row_range(start_row, end_row)?;

        let mut columns = ClassColumns {
            first_row: start_row,
            ..Default::default()
        };

        let last_row = end_row.min(self.last_used_row());
        for row in (start_row - 1)..last_row {
            columns.times.push(self.cell(row, time_column.index()).to_string());
            columns.locations.push(self.cell(row, location_column.index()).to_string());
        }

        Ok(columns)
    }
}

/// Render a cell as the text a user would see in it
fn cell_text(value: &Data) -> String {
    match value {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Read a worksheet from an xlsx/xlsm/xls/ods workbook. Defaults to the first sheet.
fn read_workbook_sheet(path: &Path, sheet: Option<&str>) -> Result<SourceSheet> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_owned();

    let name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(TimetableError::SheetNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| TimetableError::SheetNotFound("<first sheet>".to_string()))?,
    };

    let range = workbook.worksheet_range(&name)?;
    let (row_offset, col_offset) = range.start().unwrap_or((0, 0));

    let mut cells: Vec<Vec<String>> = Vec::new();
    for (row, col, value) in range.used_cells() {
        let row = row + row_offset as usize;
        let col = col + col_offset as usize;
        if cells.len() <= row {
            cells.resize_with(row + 1, Vec::new);
        }
        if cells[row].len() <= col {
            cells[row].resize(col + 1, String::new());
        }
        cells[row][col] = cell_text(value);
    }

    log::debug!("Read sheet '{}' with {} rows", name, cells.len());
    Ok(SourceSheet::new(name, sheet_names, cells))
}

/// Read a CSV file as a single sheet named after the file stem.
/// Row 1 of the sheet is the first line of the file (header included).
fn read_csv_sheet(path: &Path, sheet: Option<&str>) -> Result<SourceSheet> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string();

    if let Some(requested) = sheet {
        if requested != name {
            return Err(TimetableError::SheetNotFound(requested.to_string()));
        }
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut cells = Vec::new();
    for record in reader.records() {
        let record = record?;
        cells.push(record.iter().map(String::from).collect());
    }

    log::debug!("Read CSV '{}' with {} rows", path.display(), cells.len());
    Ok(SourceSheet::new(name.clone(), vec![name], cells))
}

/// Load the source worksheet, choosing the reader from the file extension
pub fn read_source_sheet(path: &Path, sheet: Option<&str>) -> Result<SourceSheet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => read_csv_sheet(path, sheet),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook_sheet(path, sheet),
        _ => Err(TimetableError::UnsupportedInput(ext)),
    }
}
