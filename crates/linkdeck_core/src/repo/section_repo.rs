//! Sections blob repository.
//!
//! # Responsibility
//! - Read and write the full section list under a single key.
//! - Classify what was found so callers can choose a fallback policy.
//!
//! # Invariants
//! - Writes serialize the whole list; there are no per-section writes.
//! - Reads never panic on corrupt data; they report `Corrupt`.
//! - A backend read failure is reported as `ReadFailed`, never as `Corrupt`.
//! - The id high-water mark only moves up.

use crate::model::id::max_id;
use crate::model::section::Section;
use crate::model::snapshot::{parse_snapshot, to_blob};
use crate::repo::kv_store::{KeyValueStore, KvError, KvResult};
use log::{error, warn};

/// Key holding the serialized section list.
pub const SECTIONS_KEY: &str = "linkdeck.sections";

/// Key holding the largest id ever handed out, so deleted ids stay retired.
pub const ID_HIGH_WATER_KEY: &str = "linkdeck.id_high_water";

/// Result of reading the sections blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredSections {
    /// Nothing has been persisted yet.
    Absent,
    Loaded(Vec<Section>),
    /// The blob exists but is not a valid section array.
    Corrupt(String),
    /// The backend could not be read; whatever is stored may still be valid.
    ReadFailed(String),
}

/// Typed access to the sections blob over any key-value backend.
#[derive(Debug, Clone)]
pub struct SectionRepository<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> SectionRepository<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Returns the underlying key-value backend.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Reads and validates the persisted section list.
    pub fn read(&self) -> StoredSections {
        let raw = match self.kv.get(SECTIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return StoredSections::Absent,
            Err(err) => {
                warn!(
                    "event=sections_read module=repo status=error error_code=storage_unavailable error={err}"
                );
                return StoredSections::ReadFailed(err.to_string());
            }
        };

        match parse_snapshot(&raw) {
            Ok(sections) => StoredSections::Loaded(sections),
            Err(err) => {
                warn!(
                    "event=sections_read module=repo status=error error_code=corrupt_blob bytes={} error={err}",
                    raw.len()
                );
                StoredSections::Corrupt(err.to_string())
            }
        }
    }

    /// Persists the full section list as one value, then the id high-water mark.
    ///
    /// The stored mark becomes `max(high_water, largest id in sections)`.
    ///
    /// # Errors
    /// - Returns backend errors unchanged; serialization failure maps to
    ///   `KvError::Unavailable`.
    pub fn write(&self, sections: &[Section], high_water: i64) -> KvResult<()> {
        let blob = to_blob(sections).map_err(|err| KvError::Unavailable(err.to_string()))?;
        self.kv.set(SECTIONS_KEY, &blob).inspect_err(|err| {
            error!(
                "event=sections_save module=repo status=error sections={} bytes={} error={err}",
                sections.len(),
                blob.len()
            );
        })?;

        let mark = high_water.max(max_id(sections));
        self.kv
            .set(ID_HIGH_WATER_KEY, &mark.to_string())
            .inspect_err(|err| {
                error!("event=id_mark_save module=repo status=error mark={mark} error={err}");
            })
    }

    /// Largest id ever persisted, or 0 when unknown.
    ///
    /// Missing, unreadable or malformed marks fall back to 0; callers still
    /// seed above the ids present in the section list.
    pub fn read_id_high_water(&self) -> i64 {
        match self.kv.get(ID_HIGH_WATER_KEY) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("event=id_mark_read module=repo status=error error_code=corrupt_mark");
                0
            }),
            Ok(None) => 0,
            Err(err) => {
                warn!("event=id_mark_read module=repo status=error error={err}");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SectionRepository, StoredSections, ID_HIGH_WATER_KEY, SECTIONS_KEY};
    use crate::model::defaults::default_sections;
    use crate::repo::kv_store::{KeyValueStore, MemoryKeyValueStore};

    #[test]
    fn read_distinguishes_absent_loaded_and_corrupt() {
        let kv = MemoryKeyValueStore::new();
        let repo = SectionRepository::new(kv.clone());
        assert_eq!(repo.read(), StoredSections::Absent);

        repo.write(&default_sections(), 0).unwrap();
        assert_eq!(repo.read(), StoredSections::Loaded(default_sections()));

        kv.set(SECTIONS_KEY, "{not json").unwrap();
        assert!(matches!(repo.read(), StoredSections::Corrupt(_)));

        kv.set_reject_reads(true);
        assert!(matches!(repo.read(), StoredSections::ReadFailed(_)));
    }

    #[test]
    fn high_water_mark_never_drops_below_stored_ids() {
        let kv = MemoryKeyValueStore::new();
        let repo = SectionRepository::new(kv.clone());
        assert_eq!(repo.read_id_high_water(), 0);

        repo.write(&default_sections(), 0).unwrap();
        assert_eq!(repo.read_id_high_water(), 105);

        repo.write(&[], 9_000).unwrap();
        assert_eq!(kv.raw(ID_HIGH_WATER_KEY).as_deref(), Some("9000"));
        assert_eq!(repo.read_id_high_water(), 9_000);

        kv.set(ID_HIGH_WATER_KEY, "garbage").unwrap();
        assert_eq!(repo.read_id_high_water(), 0);
    }
}
