pub mod reader;

pub use reader::{
    check_row_range, read_source_sheet, ClassColumns, ColumnRef, SourceSheet, MAX_ROWS,
};
