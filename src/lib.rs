pub mod error;
pub mod generate;
pub mod model;
pub mod report;
pub mod schedule;
pub mod source;
pub mod time;
pub mod xlsx;

pub use error::{Result, TimetableError};
pub use model::*;
