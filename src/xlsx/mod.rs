pub mod style;
pub mod writer;

pub use style::{Palette, PREFERENCE_OPTIONS, STATUS_OPTIONS};
pub use writer::{write_availability_sheet, write_availability_to_xlsx, SheetLayout, SheetOptions};
