pub mod schedule;
pub mod slot;

pub use schedule::ScheduleMap;
pub use slot::{DeliveryMode, SlotCounts, SlotKey, Weekday, ONLINE_LOCATION};
