pub mod aggregate;
pub mod layout;
pub mod order;

pub use aggregate::{aggregate, parse_time_description};
pub use layout::{GridLayout, ROWS_PER_PAIR};
pub use order::{order, order_keys};
