use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;

use tutor_availability::generate::{self, SourceOptions};
use tutor_availability::report;
use tutor_availability::source::{read_source_sheet, ColumnRef};
use tutor_availability::xlsx::SheetOptions;

#[derive(Parser)]
#[command(name = "tutor-availability")]
#[command(about = "Build tutor availability sheets from a class timetable", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Which cells of the source timetable to read
#[derive(Args)]
struct SourceArgs {
    /// Timetable file (CSV from the timetable scraper, or xlsx/xls/ods)
    input: PathBuf,

    /// Worksheet to read (defaults to the first sheet)
    #[arg(long, env = "TUTOR_AVAIL_SHEET")]
    sheet: Option<String>,

    /// First row to read (1-based)
    #[arg(long, default_value = "2", env = "TUTOR_AVAIL_START_ROW")]
    start_row: u32,

    /// Last row to read (defaults to the last used row)
    #[arg(long, env = "TUTOR_AVAIL_END_ROW")]
    end_row: Option<u32>,

    /// Column holding the day/time description, e.g. "Mon 14:00 - 16:00"
    #[arg(long, default_value = "E", value_parser = parse_column, env = "TUTOR_AVAIL_TIME_COLUMN")]
    time_column: ColumnRef,

    /// Column holding the class location
    #[arg(
        long,
        default_value = "F",
        value_parser = parse_column,
        env = "TUTOR_AVAIL_LOCATION_COLUMN"
    )]
    location_column: ColumnRef,
}

impl SourceArgs {
    fn to_options(&self) -> SourceOptions {
        SourceOptions {
            input: self.input.clone(),
            sheet: self.sheet.clone(),
            start_row: self.start_row,
            end_row: self.end_row,
            time_column: self.time_column,
            location_column: self.location_column,
        }
    }
}

fn parse_column(s: &str) -> std::result::Result<ColumnRef, String> {
    s.parse().map_err(|e: tutor_availability::TimetableError| e.to_string())
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the availability workbook
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Output Excel file
        #[arg(short, long)]
        output: PathBuf,

        /// Name of the generated worksheet
        #[arg(long, default_value = "Tutor Preferences", env = "TUTOR_AVAIL_DESTINATION")]
        destination: String,

        /// Title shown across the top of the sheet
        #[arg(long, default_value = "Tutor Availability", env = "TUTOR_AVAIL_TITLE")]
        title: String,

        /// Number of tutor rows in the preference grid
        #[arg(long, default_value = "30", env = "TUTOR_AVAIL_TUTOR_ROWS")]
        tutor_rows: u32,

        /// Overwrite the output file if it exists
        #[arg(long)]
        force: bool,
    },

    /// List class slots with their in-person and online counts
    Slots {
        #[command(flatten)]
        source: SourceArgs,

        /// Write the slot list as CSV instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { source, output, destination, title, tutor_rows, force } => {
            let options = SheetOptions {
                destination,
                title,
                tutor_rows,
                ..Default::default()
            };
            run_generate(&source.to_options(), &options, &output, force)?;
        }
        Commands::Slots { source, output } => {
            slots(&source.to_options(), output.as_ref())?;
        }
    }

    Ok(())
}

fn run_generate(
    source: &SourceOptions,
    options: &SheetOptions,
    output: &PathBuf,
    force: bool,
) -> Result<()> {
    println!("Reading timetable: {}", source.input.display());

    let summary = generate::generate(source, options, output, force).with_context(|| {
        format!(
            "Failed to generate '{}' from {} (rows start at {})",
            options.destination,
            source.input.display(),
            source.start_row
        )
    })?;

    println!("Read {} rows from sheet '{}'", summary.rows_read, summary.source_sheet);
    println!("Found {} class slots", summary.schedule.len());
    println!(
        "Footer needs {} in-person and {} online row pairs",
        summary.layout.grid.max_in_person, summary.layout.grid.max_online
    );
    println!("Wrote sheet '{}' to: {}", options.destination, output.display());
    println!("Done!");
    Ok(())
}

fn slots(source: &SourceOptions, output: Option<&PathBuf>) -> Result<()> {
    let sheet = read_source_sheet(&source.input, source.sheet.as_deref())
        .context("Failed to read timetable")?;
    let schedule = generate::load_schedule(&sheet, source).with_context(|| {
        format!("Failed to read class slots (rows start at {})", source.start_row)
    })?;

    match output {
        Some(path) => {
            let file = File::create(path).context("Failed to create output file")?;
            report::write_slots_csv(&schedule, file).context("Failed to write slot CSV")?;
            println!("Wrote {} slots to: {}", schedule.len(), path.display());
        }
        None => {
            println!("Sheet: {}", sheet.name);
            println!("Slots: {}", schedule.len());
            println!();
            print!("{}", report::format_slots(&schedule));
        }
    }

    Ok(())
}
