use crate::error::{Result, TimetableError};
use crate::model::{DeliveryMode, ScheduleMap, SlotKey, Weekday};
use crate::time::hour_from_hhmm;

/// Derive the slot key from a time description like "Mon 14:00 - 16:00".
/// Token 2 is a separator and anything after token 3 (e.g. a weeks note) is ignored.
pub fn parse_time_description(description: &str) -> Result<SlotKey> {
    let tokens: Vec<&str> = description.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(TimetableError::Parse(format!(
            "expected '<day> <HH:MM> - <HH:MM>', got '{}'",
            description
        )));
    }

    let day = Weekday::from_abbrev(tokens[0]);
    let start = hour_from_hhmm(tokens[1])?;
    let end = hour_from_hhmm(tokens[3])?;

    Ok(SlotKey::new(day, start, end))
}

/// Tally in-person and online occurrences per slot.
///
/// `times[i]` and `locations[i]` describe the same class row. Rows where both
/// cells are blank are skipped; any other row that does not parse fails with
/// its index.
pub fn aggregate<T, L>(times: &[T], locations: &[L]) -> Result<ScheduleMap>
where
    T: AsRef<str>,
    L: AsRef<str>,
{
    if times.len() != locations.len() {
        return Err(TimetableError::Shape {
            times: times.len(),
            locations: locations.len(),
        });
    }

    let mut map = ScheduleMap::new();

    for (row, (time, location)) in times.iter().zip(locations).enumerate() {
        let time = time.as_ref().trim();
        let location = location.as_ref().trim();

        if time.is_empty() && location.is_empty() {
            log::debug!("Row {}: blank, skipped", row);
            continue;
        }

        let key = parse_time_description(time).map_err(|e| TimetableError::MalformedRow {
            row,
            reason: match e {
                TimetableError::Parse(msg) => msg,
                other => other.to_string(),
            },
        })?;

        if !key.day.is_teaching_day() {
            log::warn!("Row {}: unrecognised weekday '{}'", row, key.day);
        }

        map.record(key, DeliveryMode::from_location(location));
    }

    log::info!(
        "Aggregated {} class rows into {} slots",
        map.total_classes(),
        map.len()
    );

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SlotCounts;
    use std::collections::HashMap;

    fn as_pairs(map: &ScheduleMap) -> HashMap<String, SlotCounts> {
        map.iter().map(|(k, c)| (k.to_string(), *c)).collect()
    }

    #[test]
    fn test_parse_time_description() {
        let key = parse_time_description("Mon 14:00 - 16:00").unwrap();
        assert_eq!(key.to_string(), "Mon 2pm - 4pm");

        let key = parse_time_description("Fri 09:00 - 11:00 (Weeks:1-5,7-10)").unwrap();
        assert_eq!(key.to_string(), "Fri 9am - 11am");

        assert!(parse_time_description("Mon 14:00").is_err());
        assert!(parse_time_description("Mon 2pm - 4pm").is_err());
    }

    #[test]
    fn test_same_slot_both_modes() {
        let times = ["Mon 09:00 - 11:00", "Mon 09:00 - 11:00"];
        let locations = ["Online (ONLINE)", "Room 101"];
        let map = aggregate(&times, &locations).unwrap();

        assert_eq!(map.len(), 1);
        let pairs = as_pairs(&map);
        assert_eq!(pairs["Mon 9am - 11am"], SlotCounts::new(1, 1));
    }

    #[test]
    fn test_shape_mismatch() {
        let times = ["Mon 09:00 - 11:00", "Tue 09:00 - 11:00", "Wed 09:00 - 11:00"];
        let locations = ["Room 101", "Room 102"];
        let err = aggregate(&times, &locations).unwrap_err();
        assert!(matches!(err, TimetableError::Shape { times: 3, locations: 2 }));
    }

    #[test]
    fn test_malformed_row_names_index() {
        let times = ["Mon 09:00 - 11:00", "Tue 9am"];
        let locations = ["Room 101", "Room 102"];
        let err = aggregate(&times, &locations).unwrap_err();
        assert!(matches!(err, TimetableError::MalformedRow { row: 1, .. }));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let times = ["Mon 09:00 - 11:00", "  ", ""];
        let locations = ["Room 101", "", ""];
        let map = aggregate(&times, &locations).unwrap();
        assert_eq!(map.total_classes(), 1);
    }

    #[test]
    fn test_aggregation_is_commutative() {
        let rows = [
            ("Mon 09:00 - 11:00", "Online (ONLINE)"),
            ("Wed 14:00 - 16:00", "Quad G040"),
            ("Mon 09:00 - 11:00", "Room 101"),
            ("Wed 14:00 - 16:00", "Online (ONLINE)"),
            ("Mon 09:00 - 11:00", "Room 102"),
            ("Tue 18:00 - 20:00", "Online (ONLINE)"),
        ];

        let forward = {
            let (t, l): (Vec<_>, Vec<_>) = rows.iter().cloned().unzip();
            aggregate(&t, &l).unwrap()
        };
        let reversed = {
            let (t, l): (Vec<_>, Vec<_>) = rows.iter().rev().cloned().unzip();
            aggregate(&t, &l).unwrap()
        };
        let rotated = {
            let mut shifted = rows.to_vec();
            shifted.rotate_left(2);
            let (t, l): (Vec<_>, Vec<_>) = shifted.into_iter().unzip();
            aggregate(&t, &l).unwrap()
        };

        assert_eq!(as_pairs(&forward), as_pairs(&reversed));
        assert_eq!(as_pairs(&forward), as_pairs(&rotated));
        assert_eq!(as_pairs(&forward)["Mon 9am - 11am"], SlotCounts::new(2, 1));
    }
}
