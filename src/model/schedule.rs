use super::slot::{DeliveryMode, SlotCounts, SlotKey};
use std::collections::HashMap;

/// Slot occurrence counts keyed by slot, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct ScheduleMap {
    entries: Vec<(SlotKey, SlotCounts)>,
    index: HashMap<SlotKey, usize>,
}

impl ScheduleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key` in `mode`, adding the slot on first sight
    pub fn record(&mut self, key: SlotKey, mode: DeliveryMode) {
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.entries.push((key.clone(), SlotCounts::default()));
                self.index.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[idx].1.increment(mode);
    }

    pub fn get(&self, key: &SlotKey) -> Option<&SlotCounts> {
        self.index.get(key).map(|&idx| &self.entries[idx].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &SlotCounts)> {
        self.entries.iter().map(|(k, c)| (k, c))
    }

    pub fn keys(&self) -> impl Iterator<Item = &SlotKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Largest count across all slots for `mode` (0 when empty)
    pub fn max_count(&self, mode: DeliveryMode) -> u32 {
        self.entries
            .iter()
            .map(|(_, c)| c.get(mode))
            .max()
            .unwrap_or(0)
    }

    /// Total class rows counted across all slots
    pub fn total_classes(&self) -> u32 {
        self.entries.iter().map(|(_, c)| c.total()).sum()
    }
}

impl FromIterator<(SlotKey, SlotCounts)> for ScheduleMap {
    /// Build from pairs; a repeated key has its counts added to the earlier entry
    fn from_iter<T: IntoIterator<Item = (SlotKey, SlotCounts)>>(iter: T) -> Self {
        let mut map = ScheduleMap::new();
        for (key, counts) in iter {
            match map.index.get(&key) {
                Some(&idx) => {
                    let existing = &mut map.entries[idx].1;
                    existing.in_person += counts.in_person;
                    existing.online += counts.online;
                }
                None => {
                    map.index.insert(key.clone(), map.entries.len());
                    map.entries.push((key, counts));
                }
            }
        }
        map
    }
}

impl IntoIterator for ScheduleMap {
    type Item = (SlotKey, SlotCounts);
    type IntoIter = std::vec::IntoIter<(SlotKey, SlotCounts)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
