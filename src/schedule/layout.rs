use crate::model::{DeliveryMode, ScheduleMap};

/// Rows in the footer allocated to one class occurrence (tutor + status)
pub const ROWS_PER_PAIR: u32 = 2;

/// Row allocation plan for the footer timetable.
///
/// The footer holds `max_in_person` row pairs followed by `max_online` row
/// pairs. Every slot column gets the same rows; a slot with fewer classes than
/// the maximum leaves its trailing pairs unused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    pub max_in_person: u32,
    pub max_online: u32,
    in_person_anchors: Vec<u32>,
    online_anchors: Vec<u32>,
}

impl GridLayout {
    /// Size the grid for `map`, with the first row pair starting at `first_row`
    pub fn new(map: &ScheduleMap, first_row: u32) -> Self {
        let max_in_person = map.max_count(DeliveryMode::InPerson);
        let max_online = map.max_count(DeliveryMode::Online);

        let in_person_anchors = (0..max_in_person)
            .map(|i| first_row + ROWS_PER_PAIR * i)
            .collect();
        let online_anchors = (0..max_online)
            .map(|i| first_row + ROWS_PER_PAIR * (max_in_person + i))
            .collect();

        Self {
            max_in_person,
            max_online,
            in_person_anchors,
            online_anchors,
        }
    }

    pub fn max(&self, mode: DeliveryMode) -> u32 {
        match mode {
            DeliveryMode::InPerson => self.max_in_person,
            DeliveryMode::Online => self.max_online,
        }
    }

    /// First row of every pair allocated to `mode`, top to bottom
    pub fn anchors(&self, mode: DeliveryMode) -> &[u32] {
        match mode {
            DeliveryMode::InPerson => &self.in_person_anchors,
            DeliveryMode::Online => &self.online_anchors,
        }
    }

    /// Pairs used by a slot with `count` classes in `mode`
    pub fn filled(&self, mode: DeliveryMode, count: u32) -> &[u32] {
        let anchors = self.anchors(mode);
        let end = (count as usize).min(anchors.len());
        &anchors[..end]
    }

    /// Pairs a slot with `count` classes in `mode` leaves empty
    pub fn unused(&self, mode: DeliveryMode, count: u32) -> &[u32] {
        let anchors = self.anchors(mode);
        let start = (count as usize).min(anchors.len());
        &anchors[start..]
    }

    /// Total footer rows taken by all pairs
    pub fn total_rows(&self) -> u32 {
        ROWS_PER_PAIR * (self.max_in_person + self.max_online)
    }
}
