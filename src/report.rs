use crate::error::Result;
use crate::model::ScheduleMap;
use serde::Serialize;
use std::io::Write;

/// One line of the slot summary export
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SlotRecord {
    slot: String,
    day: String,
    start: String,
    end: String,
    #[serde(rename = "In-person")]
    in_person: u32,
    online: u32,
}

/// Write the ordered slot counts as CSV
pub fn write_slots_csv<W: Write>(map: &ScheduleMap, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for (key, counts) in map.iter() {
        csv.serialize(SlotRecord {
            slot: key.to_string(),
            day: key.day.to_string(),
            start: key.start_label(),
            end: key.end_label(),
            in_person: counts.in_person,
            online: counts.online,
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Human-readable slot table for the terminal
pub fn format_slots(map: &ScheduleMap) -> String {
    let width = map
        .keys()
        .map(|k| k.to_string().len())
        .max()
        .unwrap_or(0)
        .max("Slot".len());

    let mut out = format!(
        "{:<width$}  {:>9}  {:>6}\n",
        "Slot",
        "In-person",
        "Online",
        width = width
    );
    for (key, counts) in map.iter() {
        out.push_str(&format!(
            "{:<width$}  {:>9}  {:>6}\n",
            key.to_string(),
            counts.in_person,
            counts.online,
            width = width
        ));
    }
    out
}
