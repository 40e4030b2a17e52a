//! End-to-end run: read the source timetable, build the slot schedule, and
//! write the availability sheet. Every precondition is checked before the
//! output workbook is created.

use crate::error::{Result, TimetableError};
use crate::model::{DeliveryMode, ScheduleMap};
use crate::schedule::{aggregate, order};
use crate::source::{check_row_range, read_source_sheet, ColumnRef, SourceSheet};
use crate::xlsx::{write_availability_to_xlsx, SheetLayout, SheetOptions};
use std::path::{Path, PathBuf};

/// Where the raw timetable lives: the file, the sheet, and the cells to read
#[derive(Debug, Clone)]
pub struct SourceOptions {
    pub input: PathBuf,
    /// Sheet to read; the first sheet when unset
    pub sheet: Option<String>,
    /// First 1-based row to read
    pub start_row: u32,
    /// Last 1-based row to read; the last used row when unset
    pub end_row: Option<u32>,
    pub time_column: ColumnRef,
    pub location_column: ColumnRef,
}

impl SourceOptions {
    /// Defaults matching the timetable scraper's CSV export:
    /// Class, Section, Status, Enrols/Capacity, Day/Time, Location
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            sheet: None,
            start_row: 2,
            end_row: None,
            time_column: ColumnRef(4),
            location_column: ColumnRef(5),
        }
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct GenerateSummary {
    pub source_sheet: String,
    pub rows_read: usize,
    pub schedule: ScheduleMap,
    pub layout: SheetLayout,
}

/// Read the selected rows and return the schedule in weekday/start order
pub fn load_schedule(sheet: &SourceSheet, source: &SourceOptions) -> Result<ScheduleMap> {
    let end_row = source.end_row.unwrap_or_else(|| sheet.last_used_row());
    let columns = sheet.read_columns(
        source.start_row,
        end_row,
        source.time_column,
        source.location_column,
    )?;

    let map = aggregate(&columns.times, &columns.locations)?;
    if map.is_empty() {
        return Err(TimetableError::NoClasses {
            start: source.start_row,
            end: end_row,
        });
    }

    order(map)
}

/// Fail unless the destination sheet name is free and the output may be written
pub fn check_destination(
    sheet: &SourceSheet,
    destination: &str,
    output: &Path,
    force: bool,
) -> Result<()> {
    if sheet.has_sheet_named(destination) {
        return Err(TimetableError::SheetNameTaken(destination.to_string()));
    }
    if output.exists() && !force {
        return Err(TimetableError::OutputExists(output.to_path_buf()));
    }
    Ok(())
}

/// Generate the availability workbook at `output`
pub fn generate(
    source: &SourceOptions,
    options: &SheetOptions,
    output: &Path,
    force: bool,
) -> Result<GenerateSummary> {
    let sheet = read_source_sheet(&source.input, source.sheet.as_deref())?;
    let end_row = source.end_row.unwrap_or_else(|| sheet.last_used_row());
    check_row_range(source.start_row, end_row)?;
    check_destination(&sheet, &options.destination, output, force)?;

    let schedule = load_schedule(&sheet, source)?;
    let layout = write_availability_to_xlsx(&schedule, options, output)?;

    log::info!(
        "Wrote '{}' with {} slots ({} in-person / {} online footer pairs)",
        options.destination,
        schedule.len(),
        layout.grid.max(DeliveryMode::InPerson),
        layout.grid.max(DeliveryMode::Online)
    );

    Ok(GenerateSummary {
        source_sheet: sheet.name,
        rows_read: (end_row - source.start_row + 1) as usize,
        schedule,
        layout,
    })
}
