use super::style::{Formats, Palette, PREFERENCE_OPTIONS, STATUS_OPTIONS, UNUSED_MARKER};
use crate::error::{Result, TimetableError};
use crate::model::{DeliveryMode, ScheduleMap, SlotCounts, SlotKey};
use crate::schedule::GridLayout;
use crate::source::MAX_ROWS;
use rust_xlsxwriter::utility::column_number_to_name;
use rust_xlsxwriter::{
    ConditionalFormatFormula, DataValidation, DataValidationRule, Formula, Workbook, Worksheet,
};
use std::path::Path;

const TITLE_ROW: u32 = 0;
const DAY_ROW: u32 = 1;
const HEADER_ROW: u32 = 2;
const COUNTS_ROW: u32 = 3;
const FIRST_TUTOR_ROW: u32 = 4;

const NAME_COL: u16 = 0;
const EMAIL_COL: u16 = 1;
const FIRST_SLOT_COL: u16 = 2;
const MAX_COLUMNS: usize = 16_384;

const TRACKING_HEADERS: [&str; 5] = [
    "Preferred",
    "Available",
    "Max classes",
    "Allocated",
    "Notes",
];

/// User-facing options for the generated sheet
#[derive(Debug, Clone)]
pub struct SheetOptions {
    /// Name of the destination worksheet
    pub destination: String,
    pub title: String,
    /// Number of blank tutor rows in the preference grid
    pub tutor_rows: u32,
    pub palette: Palette,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            destination: "Tutor Preferences".to_string(),
            title: "Tutor Availability".to_string(),
            tutor_rows: 30,
            palette: Palette::default(),
        }
    }
}

/// Final positions of every block of the sheet, computed before rendering
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub slot_count: u16,
    pub tutor_rows: u32,
    pub grid: GridLayout,
}

impl SheetLayout {
    /// Place every block, failing if the sheet would not fit in a worksheet
    pub fn new(map: &ScheduleMap, tutor_rows: u32) -> Result<Self> {
        let tutor_rows = tutor_rows.max(1);
        if tutor_rows > MAX_ROWS - FIRST_TUTOR_ROW {
            return Err(TimetableError::RowLimit {
                what: "Tutor rows",
                value: tutor_rows,
                limit: MAX_ROWS,
            });
        }

        let columns = FIRST_SLOT_COL as usize + map.len() + TRACKING_HEADERS.len();
        if columns > MAX_COLUMNS {
            return Err(TimetableError::InvalidColumn(format!(
                "{} slots need {} columns, more than a worksheet holds",
                map.len(),
                columns
            )));
        }

        // Tutor rows, one spacer, footer day band, footer header
        let footer_first_row = FIRST_TUTOR_ROW + tutor_rows + 3;
        let layout = Self {
            slot_count: map.len() as u16,
            tutor_rows,
            grid: GridLayout::new(map, footer_first_row),
        };

        if layout.last_row() >= MAX_ROWS {
            return Err(TimetableError::RowLimit {
                what: "Footer end row",
                value: layout.last_row() + 1,
                limit: MAX_ROWS,
            });
        }
        Ok(layout)
    }

    pub fn slot_col(&self, index: usize) -> u16 {
        FIRST_SLOT_COL + index as u16
    }

    pub fn last_slot_col(&self) -> u16 {
        FIRST_SLOT_COL + self.slot_count.max(1) - 1
    }

    /// Column of the n-th tracking header
    pub fn tracking_col(&self, n: usize) -> u16 {
        self.last_slot_col() + 1 + n as u16
    }

    pub fn preferred_col(&self) -> u16 {
        self.tracking_col(0)
    }

    pub fn available_col(&self) -> u16 {
        self.tracking_col(1)
    }

    pub fn max_classes_col(&self) -> u16 {
        self.tracking_col(2)
    }

    pub fn allocated_col(&self) -> u16 {
        self.tracking_col(3)
    }

    pub fn notes_col(&self) -> u16 {
        self.tracking_col(4)
    }

    pub fn last_col(&self) -> u16 {
        self.notes_col()
    }

    pub fn first_tutor_row(&self) -> u32 {
        FIRST_TUTOR_ROW
    }

    pub fn last_tutor_row(&self) -> u32 {
        FIRST_TUTOR_ROW + self.tutor_rows - 1
    }

    pub fn footer_day_row(&self) -> u32 {
        self.last_tutor_row() + 2
    }

    pub fn footer_header_row(&self) -> u32 {
        self.footer_day_row() + 1
    }

    pub fn footer_first_row(&self) -> u32 {
        self.footer_header_row() + 1
    }

    /// Last row written; the footer header row when the grid is empty
    pub fn last_row(&self) -> u32 {
        self.footer_header_row() + self.grid.total_rows()
    }
}

/// A1-style reference, absolute in the requested axes
fn cell_ref(row: u32, col: u16, abs_row: bool, abs_col: bool) -> String {
    format!(
        "{}{}{}{}",
        if abs_col { "$" } else { "" },
        column_number_to_name(col),
        if abs_row { "$" } else { "" },
        row + 1
    )
}

fn range_ref(first_row: u32, first_col: u16, last_row: u32, last_col: u16) -> String {
    format!(
        "{}:{}",
        cell_ref(first_row, first_col, true, true),
        cell_ref(last_row, last_col, true, true)
    )
}

/// Write the generated availability sheet to a new workbook
pub fn write_availability_to_xlsx(
    map: &ScheduleMap,
    options: &SheetOptions,
    path: &Path,
) -> Result<SheetLayout> {
    let mut workbook = Workbook::new();
    let layout = SheetLayout::new(map, options.tutor_rows)?;

    let sheet = workbook.add_worksheet();
    write_availability_sheet(sheet, map, &layout, options)?;

    workbook.save(path)?;
    Ok(layout)
}

/// Render the whole sheet in one pass over a precomputed layout
pub fn write_availability_sheet(
    sheet: &mut Worksheet,
    map: &ScheduleMap,
    layout: &SheetLayout,
    options: &SheetOptions,
) -> Result<()> {
    sheet.set_name(&options.destination)?;
    let formats = Formats::new(&options.palette);
    let slots: Vec<(&SlotKey, u32, u32)> = map
        .iter()
        .map(|(k, c)| (k, c.in_person, c.online))
        .collect();

    // Column widths
    sheet.set_column_width(NAME_COL, 22)?;
    sheet.set_column_width(EMAIL_COL, 26)?;
    for idx in 0..slots.len() {
        sheet.set_column_width(layout.slot_col(idx), 14)?;
    }
    for n in 0..TRACKING_HEADERS.len() {
        sheet.set_column_width(layout.tracking_col(n), 11)?;
    }
    sheet.set_column_width(layout.notes_col(), 30)?;

    // Title
    sheet.merge_range(
        TITLE_ROW,
        NAME_COL,
        TITLE_ROW,
        layout.last_col(),
        &options.title,
        &formats.title,
    )?;
    sheet.set_row_height(TITLE_ROW, 24)?;

    write_day_band(sheet, DAY_ROW, &slots, layout, &formats)?;
    write_slot_headers(sheet, HEADER_ROW, &slots, layout, &formats, ["Name", "Email"])?;
    for (n, header) in TRACKING_HEADERS.iter().enumerate() {
        let col = layout.tracking_col(n);
        sheet.write_string_with_format(HEADER_ROW, col, *header, &formats.header)?;
    }
    sheet.set_row_height(HEADER_ROW, 32)?;

    // Per-slot class counts
    sheet.write_string_with_format(COUNTS_ROW, NAME_COL, "Classes", &formats.sub_label)?;
    sheet.write_blank(COUNTS_ROW, EMAIL_COL, &formats.sub_label)?;
    for (idx, (_, in_person, online)) in slots.iter().enumerate() {
        let text = SlotCounts::new(*in_person, *online).to_string();
        sheet.write_string_with_format(COUNTS_ROW, layout.slot_col(idx), &text, &formats.counts)?;
    }

    write_preference_grid(sheet, &slots, layout, &formats, &options.palette)?;
    write_footer(sheet, &slots, layout, &formats, &options.palette)?;

    sheet.set_freeze_panes(FIRST_TUTOR_ROW, FIRST_SLOT_COL)?;

    Ok(())
}

/// One merged cell per weekday, spanning that day's slot columns
fn write_day_band(
    sheet: &mut Worksheet,
    row: u32,
    slots: &[(&SlotKey, u32, u32)],
    layout: &SheetLayout,
    formats: &Formats,
) -> Result<()> {
    let mut start = 0;
    while start < slots.len() {
        let day = &slots[start].0.day;
        let end = slots[start..]
            .iter()
            .position(|(k, _, _)| &k.day != day)
            .map(|len| start + len)
            .unwrap_or(slots.len());

        let first_col = layout.slot_col(start);
        let last_col = layout.slot_col(end - 1);
        if first_col == last_col {
            sheet.write_string_with_format(row, first_col, day.name(), &formats.day_band)?;
        } else {
            sheet.merge_range(row, first_col, row, last_col, day.name(), &formats.day_band)?;
        }

        start = end;
    }
    Ok(())
}

/// Row of leading labels followed by one header per slot
fn write_slot_headers(
    sheet: &mut Worksheet,
    row: u32,
    slots: &[(&SlotKey, u32, u32)],
    layout: &SheetLayout,
    formats: &Formats,
    leading: [&str; 2],
) -> Result<()> {
    for (col, label) in [NAME_COL, EMAIL_COL].into_iter().zip(leading) {
        if label.is_empty() {
            sheet.write_blank(row, col, &formats.header)?;
        } else {
            sheet.write_string_with_format(row, col, label, &formats.header)?;
        }
    }
    for (idx, (key, _, _)) in slots.iter().enumerate() {
        let col = layout.slot_col(idx);
        sheet.write_string_with_format(row, col, &key.to_string(), &formats.header)?;
    }
    Ok(())
}

/// Tutor entry rows: preference dropdowns plus the tracking columns
fn write_preference_grid(
    sheet: &mut Worksheet,
    slots: &[(&SlotKey, u32, u32)],
    layout: &SheetLayout,
    formats: &Formats,
    palette: &Palette,
) -> Result<()> {
    let first_row = layout.first_tutor_row();
    let last_row = layout.last_tutor_row();
    let first_slot = layout.slot_col(0);
    let last_slot = layout.last_slot_col();

    let footer = range_ref(
        layout.footer_first_row(),
        first_slot,
        layout.last_row(),
        last_slot,
    );

    for row in first_row..=last_row {
        sheet.write_blank(row, NAME_COL, &formats.entry)?;
        sheet.write_blank(row, EMAIL_COL, &formats.entry)?;
        for idx in 0..slots.len() {
            sheet.write_blank(row, layout.slot_col(idx), &formats.entry)?;
        }

        let name = cell_ref(row, NAME_COL, false, true);
        let prefs = format!(
            "{}:{}",
            cell_ref(row, first_slot, false, true),
            cell_ref(row, last_slot, false, true)
        );
        let preferred = format!("=COUNTIF({},\"{}\")", prefs, PREFERENCE_OPTIONS[0]);
        let available = format!("=COUNTIF({},\"{}\")", prefs, PREFERENCE_OPTIONS[1]);
        let tracking = &formats.tracking;
        sheet.write_formula_with_format(row, layout.preferred_col(), preferred.as_str(), tracking)?;
        sheet.write_formula_with_format(row, layout.available_col(), available.as_str(), tracking)?;
        sheet.write_blank(row, layout.max_classes_col(), &formats.entry)?;

        let allocated = if layout.grid.total_rows() > 0 {
            format!("=IF({0}=\"\",\"\",COUNTIF({1},{0}))", name, footer)
        } else {
            format!("=IF({}=\"\",\"\",0)", name)
        };
        sheet.write_formula_with_format(row, layout.allocated_col(), allocated.as_str(), tracking)?;
        sheet.write_blank(row, layout.notes_col(), &formats.entry)?;
    }

    if slots.is_empty() {
        return Ok(());
    }

    let preference_dv = DataValidation::new()
        .allow_list_strings(&PREFERENCE_OPTIONS)?
        .set_error_title("Preference")?
        .set_error_message("Choose Preferred, Available or Unavailable.")?;
    sheet.add_data_validation(first_row, first_slot, last_row, last_slot, &preference_dv)?;

    // Colour each preference cell by its value; rules are relative to the top-left cell
    let anchor = cell_ref(first_row, first_slot, false, false);
    for option in PREFERENCE_OPTIONS {
        if let Some(color) = palette.preference_fill(option) {
            let rule = format!("={}=\"{}\"", anchor, option);
            let cf = ConditionalFormatFormula::new()
                .set_rule(rule.as_str())
                .set_format(Formats::fill(color));
            sheet.add_conditional_format(first_row, first_slot, last_row, last_slot, &cf)?;
        }
    }

    let max_dv = DataValidation::new()
        .allow_whole_number(DataValidationRule::Between(0, slots.len() as i32 * 2))
        .set_input_title("Max classes")?
        .set_input_message("Most classes this tutor wants to take.")?;
    let max_col = layout.max_classes_col();
    sheet.add_data_validation(first_row, max_col, last_row, max_col, &max_dv)?;

    // Flag tutors allocated more classes than they asked for
    let allocated_col = layout.allocated_col();
    let over = format!(
        "=AND(ISNUMBER({0}),ISNUMBER({1}),{1}>{0})",
        cell_ref(first_row, max_col, false, true),
        cell_ref(first_row, allocated_col, false, true)
    );
    let over_cf = ConditionalFormatFormula::new()
        .set_rule(over.as_str())
        .set_format(Formats::fill(palette.warning));
    sheet.add_conditional_format(first_row, allocated_col, last_row, allocated_col, &over_cf)?;

    Ok(())
}

/// Allocation timetable: in-person row pairs then online row pairs, one column per slot
fn write_footer(
    sheet: &mut Worksheet,
    slots: &[(&SlotKey, u32, u32)],
    layout: &SheetLayout,
    formats: &Formats,
    palette: &Palette,
) -> Result<()> {
    write_day_band(sheet, layout.footer_day_row(), slots, layout, formats)?;
    let header_row = layout.footer_header_row();
    write_slot_headers(sheet, header_row, slots, layout, formats, ["Allocation", ""])?;

    if slots.is_empty() {
        return Ok(());
    }

    let names = range_ref(layout.first_tutor_row(), NAME_COL, layout.last_tutor_row(), NAME_COL);
    let tutor_dv = DataValidation::new()
        .allow_list_formula(Formula::new(format!("={}", names).as_str()))
        .set_error_title("Tutor")?
        .set_error_message("Pick a tutor listed in the Name column.")?;
    let status_dv = DataValidation::new().allow_list_strings(&STATUS_OPTIONS)?;

    let first_slot = layout.slot_col(0);
    let last_slot = layout.last_slot_col();

    for mode in DeliveryMode::ALL {
        let cell_format = match mode {
            DeliveryMode::InPerson => &formats.in_person,
            DeliveryMode::Online => &formats.online,
        };

        for (n, &anchor) in layout.grid.anchors(mode).iter().enumerate() {
            let label = format!("{} {}", mode.label(), n + 1);
            sheet.merge_range(anchor, NAME_COL, anchor + 1, NAME_COL, &label, &formats.row_label)?;
            sheet.write_string_with_format(anchor, EMAIL_COL, "Tutor", &formats.sub_label)?;
            sheet.write_string_with_format(anchor + 1, EMAIL_COL, "Status", &formats.sub_label)?;

            // Highlight a tutor placed in a slot they marked Unavailable
            let tutor_cell = cell_ref(anchor, first_slot, true, false);
            let pref_column = format!(
                "{}:{}",
                cell_ref(layout.first_tutor_row(), first_slot, true, false),
                cell_ref(layout.last_tutor_row(), first_slot, true, false)
            );
            let clash = format!(
                "=IFERROR(INDEX({},MATCH({},{},0))=\"{}\",FALSE)",
                pref_column, tutor_cell, names, PREFERENCE_OPTIONS[2]
            );
            let clash_cf = ConditionalFormatFormula::new()
                .set_rule(clash.as_str())
                .set_format(Formats::fill(palette.unavailable));
            sheet.add_conditional_format(anchor, first_slot, anchor, last_slot, &clash_cf)?;

            let confirmed = format!(
                "={}=\"{}\"",
                cell_ref(anchor + 1, first_slot, true, false),
                STATUS_OPTIONS[0]
            );
            let confirmed_cf = ConditionalFormatFormula::new()
                .set_rule(confirmed.as_str())
                .set_format(Formats::fill(palette.confirmed));
            let status_row = anchor + 1;
            sheet.add_conditional_format(
                status_row,
                first_slot,
                status_row,
                last_slot,
                &confirmed_cf,
            )?;
        }

        for (idx, (_, in_person, online)) in slots.iter().enumerate() {
            let col = layout.slot_col(idx);
            let count = match mode {
                DeliveryMode::InPerson => *in_person,
                DeliveryMode::Online => *online,
            };

            for &anchor in layout.grid.filled(mode, count) {
                sheet.write_blank(anchor, col, cell_format)?;
                sheet.write_blank(anchor + 1, col, cell_format)?;
                sheet.add_data_validation(anchor, col, anchor, col, &tutor_dv)?;
                sheet.add_data_validation(anchor + 1, col, anchor + 1, col, &status_dv)?;
            }

            for &anchor in layout.grid.unused(mode, count) {
                sheet.merge_range(anchor, col, anchor + 1, col, UNUSED_MARKER, &formats.unused)?;
            }
        }
    }

    Ok(())
}
