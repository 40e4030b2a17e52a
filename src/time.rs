//! Conversions between 24-hour times and compact 12-hour labels ("2pm")

use crate::error::{Result, TimetableError};
use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while_m_n},
    character::complete::char,
    combinator::{all_consuming, map_res},
    sequence::separated_pair,
    IResult, Parser,
};

/// Parse one or two ASCII digits
fn short_number(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 2, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<u8>()
    })
    .parse(input)
}

/// Parse exactly two ASCII digits
fn two_digits(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<u8>()
    })
    .parse(input)
}

/// Parse an "HH:MM" token into (hour, minute)
fn hhmm(input: &str) -> IResult<&str, (u8, u8)> {
    separated_pair(short_number, char(':'), two_digits).parse(input)
}

/// Parse a 12-hour label into (hour, is_pm)
fn twelve_hour(input: &str) -> IResult<&str, (u8, bool)> {
    let (input, hour) = short_number(input)?;
    let (input, suffix) = alt((tag_no_case("am"), tag_no_case("pm"))).parse(input)?;
    Ok((input, (hour, suffix.eq_ignore_ascii_case("pm"))))
}

/// Render a 24-hour value as a compact 12-hour label: 0 -> "12am", 14 -> "2pm"
pub fn to_12_hour(hour24: u8) -> String {
    let hour = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    let suffix = if hour24 < 12 { "am" } else { "pm" };
    format!("{}{}", hour, suffix)
}

/// Parse a 12-hour label ("2pm", "12am") back to a 24-hour value
pub fn from_12_hour(label: &str) -> Result<u8> {
    let (_, (hour, is_pm)) = all_consuming(twelve_hour)
        .parse(label.trim())
        .map_err(|_| TimetableError::Parse(format!("invalid 12-hour time '{}'", label)))?;

    if !(1..=12).contains(&hour) {
        return Err(TimetableError::Parse(format!(
            "hour out of range in '{}'",
            label
        )));
    }

    Ok(match (is_pm, hour) {
        (true, 12) => 12,
        (true, h) => h + 12,
        (false, 12) => 0,
        (false, h) => h,
    })
}

/// Extract the hour from an "HH:MM" token. Minutes are validated but dropped.
pub fn hour_from_hhmm(token: &str) -> Result<u8> {
    let (_, (hour, minute)) = all_consuming(hhmm)
        .parse(token)
        .map_err(|_| TimetableError::Parse(format!("invalid time '{}', expected HH:MM", token)))?;

    if hour > 23 || minute > 59 {
        return Err(TimetableError::Parse(format!("time out of range '{}'", token)));
    }

    Ok(hour)
}
