use crate::error::Result;
use crate::model::{ScheduleMap, SlotKey, Weekday};
use crate::time::from_12_hour;

/// Weekday ranks: Mon..Fri by position, then each unrecognised day in the
/// order it first appears, so every day forms one contiguous run.
#[derive(Debug, Default)]
struct DayRanks {
    unknown: Vec<String>,
}

impl DayRanks {
    fn rank(&mut self, day: &Weekday) -> usize {
        let Weekday::Other(name) = day else {
            return day.position();
        };
        let idx = match self.unknown.iter().position(|d| d == name) {
            Some(idx) => idx,
            None => {
                self.unknown.push(name.clone());
                self.unknown.len() - 1
            }
        };
        day.position() + idx
    }
}

/// Sort position for a slot: weekday rank first, then start hour.
/// The hour is recovered from the rendered start label, so keys order the
/// same way whether they come from the aggregator or from parsed strings.
fn sort_key(ranks: &mut DayRanks, key: &SlotKey) -> Result<(usize, u8)> {
    Ok((ranks.rank(&key.day), from_12_hour(&key.start_label())?))
}

/// Re-key a schedule into weekday/start-hour order.
///
/// Unrecognised weekdays follow Friday, grouped in first-seen order. The sort
/// is stable, so equal keys keep their input order.
pub fn order(map: ScheduleMap) -> Result<ScheduleMap> {
    let mut ranks = DayRanks::default();
    let mut entries = map
        .into_iter()
        .map(|(key, counts)| -> Result<_> { Ok((sort_key(&mut ranks, &key)?, key, counts)) })
        .collect::<Result<Vec<_>>>()?;

    entries.sort_by_key(|(position, _, _)| *position);

    Ok(entries
        .into_iter()
        .map(|(_, key, counts)| (key, counts))
        .collect())
}

/// Order slot keys given as display strings ("Mon 2pm - 4pm")
pub fn order_keys<S: AsRef<str>>(keys: &[S]) -> Result<Vec<String>> {
    let mut ranks = DayRanks::default();
    let mut parsed = keys
        .iter()
        .map(|k| -> Result<_> {
            let key: SlotKey = k.as_ref().parse()?;
            Ok((sort_key(&mut ranks, &key)?, key))
        })
        .collect::<Result<Vec<_>>>()?;

    parsed.sort_by_key(|(position, _)| *position);

    Ok(parsed.into_iter().map(|(_, key)| key.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SlotCounts;

    #[test]
    fn test_order_keys() {
        let ordered = order_keys(&["Wed 9am - 10am", "Mon 2pm - 4pm", "Mon 10am - 12pm"]).unwrap();
        assert_eq!(
            ordered,
            vec!["Mon 10am - 12pm", "Mon 2pm - 4pm", "Wed 9am - 10am"]
        );
    }

    #[test]
    fn test_noon_sorts_after_morning() {
        let ordered = order_keys(&["Tue 12pm - 2pm", "Tue 11am - 1pm", "Tue 8am - 10am"]).unwrap();
        assert_eq!(
            ordered,
            vec!["Tue 8am - 10am", "Tue 11am - 1pm", "Tue 12pm - 2pm"]
        );
    }

    #[test]
    fn test_order_schedule_map() {
        let map: ScheduleMap = vec![
            (SlotKey::new(Weekday::Fri, 9, 11), SlotCounts::new(1, 0)),
            (SlotKey::new(Weekday::Mon, 16, 18), SlotCounts::new(2, 0)),
            (SlotKey::new(Weekday::Mon, 9, 11), SlotCounts::new(0, 1)),
        ]
        .into_iter()
        .collect();

        let ordered = order(map).unwrap();
        let keys: Vec<String> = ordered.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["Mon 9am - 11am", "Mon 4pm - 6pm", "Fri 9am - 11am"]);
        assert_eq!(
            ordered.get(&SlotKey::new(Weekday::Mon, 16, 18)),
            Some(&SlotCounts::new(2, 0))
        );
    }

    #[test]
    fn test_unknown_weekdays_sort_last_and_stable() {
        let map: ScheduleMap = vec![
            (SlotKey::new(Weekday::Other("Sun".into()), 9, 10), SlotCounts::new(1, 0)),
            (SlotKey::new(Weekday::Fri, 17, 18), SlotCounts::new(1, 0)),
            (SlotKey::new(Weekday::Other("Sat".into()), 8, 9), SlotCounts::new(1, 0)),
            (SlotKey::new(Weekday::Other("Sun".into()), 11, 12), SlotCounts::new(0, 1)),
        ]
        .into_iter()
        .collect();

        let keys: Vec<String> = order(map).unwrap().keys().map(|k| k.to_string()).collect();
        assert_eq!(
            keys,
            vec!["Fri 5pm - 6pm", "Sun 9am - 10am", "Sun 11am - 12pm", "Sat 8am - 9am"]
        );
    }

    #[test]
    fn test_unknown_weekdays_stay_grouped_by_first_appearance() {
        let ordered = order_keys(&[
            "Sun 10am - 11am",
            "Sat 9am - 10am",
            "Mon 2pm - 3pm",
            "Sun 8am - 9am",
        ])
        .unwrap();
        assert_eq!(
            ordered,
            vec!["Mon 2pm - 3pm", "Sun 8am - 9am", "Sun 10am - 11am", "Sat 9am - 10am"]
        );
    }
}
