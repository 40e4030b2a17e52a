use crate::error::{Result, TimetableError};
use crate::time::{from_12_hour, to_12_hour};
use std::fmt;
use std::str::FromStr;

/// Location string that marks a class as delivered online
pub const ONLINE_LOCATION: &str = "Online (ONLINE)";

/// Teaching day. Anything outside Mon-Fri is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Other(String),
}

impl Weekday {
    pub fn from_abbrev(s: &str) -> Self {
        match s {
            "Mon" => Weekday::Mon,
            "Tue" => Weekday::Tue,
            "Wed" => Weekday::Wed,
            "Thu" => Weekday::Thu,
            "Fri" => Weekday::Fri,
            other => Weekday::Other(other.to_string()),
        }
    }

    pub fn abbrev(&self) -> &str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Other(s) => s,
        }
    }

    /// Full day name for headings; unknown days fall back to their abbreviation
    pub fn name(&self) -> &str {
        match self {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Other(s) => s,
        }
    }

    /// Sort position: Mon=0 .. Fri=4, unknown days after Friday
    pub fn position(&self) -> usize {
        match self {
            Weekday::Mon => 0,
            Weekday::Tue => 1,
            Weekday::Wed => 2,
            Weekday::Thu => 3,
            Weekday::Fri => 4,
            Weekday::Other(_) => 5,
        }
    }

    pub fn is_teaching_day(&self) -> bool {
        !matches!(self, Weekday::Other(_))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbrev())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryMode {
    InPerson,
    Online,
}

impl DeliveryMode {
    pub const ALL: [DeliveryMode; 2] = [DeliveryMode::InPerson, DeliveryMode::Online];

    /// Binary classification: only the exact online sentinel counts as online
    pub fn from_location(location: &str) -> Self {
        if location == ONLINE_LOCATION {
            DeliveryMode::Online
        } else {
            DeliveryMode::InPerson
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeliveryMode::InPerson => "In-person",
            DeliveryMode::Online => "Online",
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Canonical identity of a class time slot, displayed as "Mon 9am - 11am"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub day: Weekday,
    pub start: u8,
    pub end: u8,
}

impl SlotKey {
    pub fn new(day: Weekday, start: u8, end: u8) -> Self {
        Self { day, start, end }
    }

    pub fn start_label(&self) -> String {
        to_12_hour(self.start)
    }

    pub fn end_label(&self) -> String {
        to_12_hour(self.end)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - {}", self.day, self.start_label(), self.end_label())
    }
}

impl FromStr for SlotKey {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            [day, start, "-", end] => Ok(SlotKey::new(
                Weekday::from_abbrev(day),
                from_12_hour(start)?,
                from_12_hour(end)?,
            )),
            _ => Err(TimetableError::Parse(format!("invalid slot key '{}'", s))),
        }
    }
}

/// Occurrence counts for one slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotCounts {
    pub in_person: u32,
    pub online: u32,
}

impl SlotCounts {
    pub fn new(in_person: u32, online: u32) -> Self {
        Self { in_person, online }
    }

    pub fn get(&self, mode: DeliveryMode) -> u32 {
        match mode {
            DeliveryMode::InPerson => self.in_person,
            DeliveryMode::Online => self.online,
        }
    }

    pub fn increment(&mut self, mode: DeliveryMode) {
        match mode {
            DeliveryMode::InPerson => self.in_person += 1,
            DeliveryMode::Online => self.online += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.in_person + self.online
    }
}

impl fmt::Display for SlotCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in-person / {} online", self.in_person, self.online)
    }
}
