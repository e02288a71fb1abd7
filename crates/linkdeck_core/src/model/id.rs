//! Timestamp-derived id allocation.
//!
//! # Invariants
//! - Allocated ids are strictly increasing within one allocator.
//! - An allocator seeded from existing data never returns an id already in use.

use crate::model::section::Section;
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current unix time in milliseconds (0 if the clock is before epoch).
pub fn unix_time_ms_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

/// Hands out unique ids shaped like creation timestamps.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    last: i64,
}

impl IdAllocator {
    /// Creates an allocator whose next id is greater than `floor`.
    pub fn new(floor: i64) -> Self {
        Self { last: floor }
    }

    /// Creates an allocator that never collides with ids present in `sections`.
    pub fn seeded_from(sections: &[Section]) -> Self {
        Self::new(max_id(sections))
    }

    /// Returns `max(now_ms, last + 1)`.
    pub fn next_id(&mut self) -> i64 {
        self.next_id_at(unix_time_ms_now())
    }

    pub(crate) fn next_id_at(&mut self, now_ms: i64) -> i64 {
        let next = now_ms.max(self.last.saturating_add(1));
        self.last = next;
        next
    }

    /// Raises the floor so later ids stay above `id`.
    pub fn observe(&mut self, id: i64) {
        self.last = self.last.max(id);
    }

    /// Largest id handed out or observed so far.
    pub fn high_water(&self) -> i64 {
        self.last
    }
}

/// Largest section or app id in `sections`, or 0 when empty.
pub fn max_id(sections: &[Section]) -> i64 {
    sections
        .iter()
        .flat_map(|section| {
            std::iter::once(section.id).chain(section.apps.iter().map(|app| app.id))
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::IdAllocator;

    #[test]
    fn ids_increase_even_when_clock_stalls() {
        let mut ids = IdAllocator::new(0);
        let first = ids.next_id_at(1_000);
        let second = ids.next_id_at(1_000);
        let third = ids.next_id_at(999);
        assert_eq!(first, 1_000);
        assert_eq!(second, 1_001);
        assert_eq!(third, 1_002);
    }

    #[test]
    fn observed_ids_raise_the_floor() {
        let mut ids = IdAllocator::new(0);
        ids.observe(5_000);
        assert_eq!(ids.next_id_at(10), 5_001);
        assert_eq!(ids.high_water(), 5_001);
    }
}
