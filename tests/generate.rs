use calamine::{open_workbook_auto, Data, Reader};
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use rust_xlsxwriter::Workbook;
use tutor_availability::generate::{generate, load_schedule, SourceOptions};
use tutor_availability::source::{read_source_sheet, ColumnRef};
use tutor_availability::xlsx::SheetOptions;
use tutor_availability::TimetableError;

const SCRAPER_CSV: &str = "\
Class,Section,Status,Enrols/Capacity,Day/Time,Location
5001,W13A,Open,18/24,Wed 13:00 - 15:00,Quad G040
5002,M09A,Full,24/24,Mon 09:00 - 11:00,Online (ONLINE)
5003,M09B,Open,20/24,Mon 09:00 - 11:00,Ainsworth 201
5004,M09C,Open,12/24,Mon 09:00 - 11:00,Ainsworth 202
5005,W13B,Open,9/24,Wed 13:00 - 15:00,Online (ONLINE)
5006,W13C,Open,3/24,Wed 13:00 - 15:00,Online (ONLINE)
";

fn write_csv(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("timetable.csv");
    fs::write(&path, SCRAPER_CSV).unwrap();
    path
}

/// Three sheets; the class table sits on the second one, starting at C3
fn write_workbook(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("timetable.xlsx");
    let mut workbook = Workbook::new();

    let summary = workbook.add_worksheet().set_name("Summary").unwrap();
    summary.write_string(0, 0, "Semester 2").unwrap();

    let classes = workbook.add_worksheet().set_name("Classes").unwrap();
    classes.write_string(2, 2, "Class").unwrap();
    classes.write_string(2, 3, "Day/Time").unwrap();
    classes.write_string(2, 4, "Location").unwrap();
    classes.write_number(3, 2, 5001).unwrap();
    classes.write_string(3, 3, "Tue 14:00 - 16:00").unwrap();
    classes.write_string(3, 4, "Online (ONLINE)").unwrap();
    classes.write_number(4, 2, 5002).unwrap();
    classes.write_string(4, 3, "Mon 09:00 - 10:00").unwrap();
    classes.write_string(4, 4, "Quad G040").unwrap();

    workbook.add_worksheet().set_name("Allocations").unwrap();
    workbook.save(&path).unwrap();
    path
}

fn workbook_source(input: &Path) -> SourceOptions {
    let mut source = SourceOptions::new(input);
    source.sheet = Some("Classes".to_string());
    source.start_row = 4;
    source.time_column = ColumnRef(3);
    source.location_column = ColumnRef(4);
    source
}

fn cell_string(range: &calamine::Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => s.clone(),
        _ => String::new(),
    }
}

#[test]
fn test_generate_from_scraper_csv() {
    let dir = tempdir().unwrap();
    let input = write_csv(dir.path());
    let output = dir.path().join("prefs.xlsx");

    let options = SheetOptions {
        tutor_rows: 5,
        ..Default::default()
    };
    let summary = generate(&SourceOptions::new(&input), &options, &output, false).unwrap();

    assert_eq!(summary.source_sheet, "timetable");
    assert_eq!(summary.rows_read, 6);
    let keys: Vec<String> = summary.schedule.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["Mon 9am - 11am", "Wed 1pm - 3pm"]);
    assert_eq!(summary.layout.grid.max_in_person, 2);
    assert_eq!(summary.layout.grid.max_online, 2);

    let mut workbook = open_workbook_auto(&output).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Tutor Preferences".to_string()]);

    let range = workbook.worksheet_range("Tutor Preferences").unwrap();
    assert_eq!(cell_string(&range, 0, 0), "Tutor Availability");
    assert_eq!(cell_string(&range, 1, 2), "Monday");
    assert_eq!(cell_string(&range, 2, 0), "Name");
    assert_eq!(cell_string(&range, 2, 2), "Mon 9am - 11am");
    assert_eq!(cell_string(&range, 2, 3), "Wed 1pm - 3pm");
    assert_eq!(cell_string(&range, 2, 4), "Preferred");
    assert_eq!(cell_string(&range, 3, 2), "2 in-person / 1 online");
    assert_eq!(cell_string(&range, 3, 3), "1 in-person / 2 online");

    // Footer: in-person pairs start right after the footer header
    let first = summary.layout.footer_first_row();
    assert_eq!(cell_string(&range, first, 0), "In-person 1");
    assert_eq!(cell_string(&range, first + 2, 0), "In-person 2");
    assert_eq!(cell_string(&range, first + 4, 0), "Online 1");

    // Wed has one in-person class, so its second in-person pair is unused
    assert_eq!(cell_string(&range, first + 2, 3), "—");
    assert_eq!(cell_string(&range, first + 2, 2), "");
    // Mon has one online class, so its second online pair is unused
    assert_eq!(cell_string(&range, first + 6, 2), "—");
}

#[test]
fn test_existing_output_is_not_overwritten() {
    let dir = tempdir().unwrap();
    let input = write_csv(dir.path());
    let output = dir.path().join("prefs.xlsx");
    fs::write(&output, b"keep me").unwrap();

    let err = generate(&SourceOptions::new(&input), &SheetOptions::default(), &output, false)
        .unwrap_err();
    assert!(matches!(err, TimetableError::OutputExists(_)));
    assert_eq!(fs::read(&output).unwrap(), b"keep me");

    // --force replaces it
    generate(&SourceOptions::new(&input), &SheetOptions::default(), &output, true).unwrap();
    assert_ne!(fs::read(&output).unwrap(), b"keep me");
}

#[test]
fn test_preconditions_fail_before_writing() {
    let dir = tempdir().unwrap();
    let input = write_csv(dir.path());
    let output = dir.path().join("prefs.xlsx");

    let mut source = SourceOptions::new(&input);
    source.sheet = Some("Sheet9".to_string());
    let err = generate(&source, &SheetOptions::default(), &output, false).unwrap_err();
    assert!(matches!(err, TimetableError::SheetNotFound(_)));

    let mut source = SourceOptions::new(&input);
    source.start_row = 5;
    source.end_row = Some(3);
    let err = generate(&source, &SheetOptions::default(), &output, false).unwrap_err();
    assert!(matches!(err, TimetableError::InvalidRowRange { start: 5, end: 3 }));

    let options = SheetOptions {
        destination: "timetable".to_string(),
        ..Default::default()
    };
    let err = generate(&SourceOptions::new(&input), &options, &output, false).unwrap_err();
    assert!(matches!(err, TimetableError::SheetNameTaken(_)));

    assert!(!output.exists());
}

#[test]
fn test_malformed_row_aborts_run() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("timetable.csv");
    fs::write(
        &input,
        "Class,Section,Status,Enrols/Capacity,Day/Time,Location\n\
         1,A,Open,1/2,Mon 09:00 - 11:00,Room 1\n\
         2,B,Open,1/2,Tue sometime,Room 2\n",
    )
    .unwrap();
    let output = dir.path().join("prefs.xlsx");

    let err = generate(&SourceOptions::new(&input), &SheetOptions::default(), &output, false)
        .unwrap_err();
    assert!(matches!(err, TimetableError::MalformedRow { row: 1, .. }));
    assert!(!output.exists());
}

#[test]
fn test_workbook_source_with_offset_table() {
    let dir = tempdir().unwrap();
    let input = write_workbook(dir.path());
    let source = workbook_source(&input);

    let sheet = read_source_sheet(&input, source.sheet.as_deref()).unwrap();
    assert_eq!(sheet.name, "Classes");
    assert_eq!(sheet.last_used_row(), 5);
    // Cell positions keep the table's offset; whole numbers read without a decimal point
    assert_eq!(sheet.cell(2, 3), "Day/Time");
    assert_eq!(sheet.cell(3, 2), "5001");

    let schedule = load_schedule(&sheet, &source).unwrap();
    let keys: Vec<String> = schedule.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["Mon 9am - 10am", "Tue 2pm - 4pm"]);

    let output = dir.path().join("prefs.xlsx");
    let summary = generate(&source, &SheetOptions::default(), &output, false).unwrap();
    assert_eq!(summary.source_sheet, "Classes");
    assert_eq!(summary.rows_read, 2);
    assert_eq!(summary.layout.grid.max_in_person, 1);
    assert_eq!(summary.layout.grid.max_online, 1);
}

#[test]
fn test_workbook_source_preconditions() {
    let dir = tempdir().unwrap();
    let input = write_workbook(dir.path());
    let output = dir.path().join("prefs.xlsx");

    let mut source = workbook_source(&input);
    source.sheet = Some("Timetable".to_string());
    let err = generate(&source, &SheetOptions::default(), &output, false).unwrap_err();
    assert!(matches!(err, TimetableError::SheetNotFound(_)));

    // Collides with the third sheet, ignoring case
    let options = SheetOptions {
        destination: "ALLOCATIONS".to_string(),
        ..Default::default()
    };
    let err = generate(&workbook_source(&input), &options, &output, false).unwrap_err();
    assert!(matches!(err, TimetableError::SheetNameTaken(_)));

    assert!(!output.exists());
}

#[test]
fn test_row_limits_fail_before_writing() {
    let dir = tempdir().unwrap();
    let input = write_csv(dir.path());
    let output = dir.path().join("prefs.xlsx");

    let mut source = SourceOptions::new(&input);
    source.end_row = Some(4_000_000_000);
    let err = generate(&source, &SheetOptions::default(), &output, false).unwrap_err();
    assert!(matches!(err, TimetableError::RowLimit { value: 4_000_000_000, .. }));

    let options = SheetOptions {
        tutor_rows: u32::MAX,
        ..Default::default()
    };
    let err = generate(&SourceOptions::new(&input), &options, &output, false).unwrap_err();
    assert!(matches!(err, TimetableError::RowLimit { .. }));

    assert!(!output.exists());
}
