//! Snapshot (de)serialization for the sections blob, import and export.
//!
//! # Responsibility
//! - Validate untrusted section arrays before they replace the store.
//! - Produce the JSON backup and the plain-text URL list.
//!
//! # Invariants
//! - Validation only checks `title` (string) and `apps` (array); other fields
//!   are trusted once they match the record shape.
//! - The URL list uses CRLF line endings.

use crate::model::id::IdAllocator;
use crate::model::section::{Section, ValidationError};
use serde_json::Value;
use std::collections::HashSet;

const URL_LIST_LINE_ENDING: &str = "\r\n";

/// Parses and validates a full sections array.
///
/// # Errors
/// - `MalformedSnapshot` for invalid JSON or records that do not deserialize.
/// - `SnapshotNotArray` when the root is not an array.
/// - `InvalidSection { index }` for the first element lacking `title`/`apps`.
pub fn parse_snapshot(raw: &str) -> Result<Vec<Section>, ValidationError> {
    let root: Value = serde_json::from_str(raw)
        .map_err(|err| ValidationError::MalformedSnapshot(err.to_string()))?;
    let elements = root.as_array().ok_or(ValidationError::SnapshotNotArray)?;

    if let Some(index) = elements.iter().position(|element| !has_section_shape(element)) {
        return Err(ValidationError::InvalidSection { index });
    }

    serde_json::from_value(root).map_err(|err| ValidationError::MalformedSnapshot(err.to_string()))
}

fn has_section_shape(element: &Value) -> bool {
    element.get("title").is_some_and(Value::is_string)
        && element.get("apps").is_some_and(Value::is_array)
}

/// Replaces non-positive or duplicated ids with fresh ones.
///
/// Returns how many ids were reassigned. Ids that survive are reported to
/// `ids` so later allocations stay above them.
pub fn normalize_ids(sections: &mut [Section], ids: &mut IdAllocator) -> usize {
    for section in sections.iter() {
        ids.observe(section.id);
        for app in &section.apps {
            ids.observe(app.id);
        }
    }

    let mut reassigned = 0;
    let mut seen_sections = HashSet::new();
    let mut seen_apps = HashSet::new();
    for section in sections.iter_mut() {
        if section.id <= 0 || !seen_sections.insert(section.id) {
            section.id = ids.next_id();
            seen_sections.insert(section.id);
            reassigned += 1;
        }
        for app in section.apps.iter_mut() {
            if app.id <= 0 || !seen_apps.insert(app.id) {
                app.id = ids.next_id();
                seen_apps.insert(app.id);
                reassigned += 1;
            }
        }
    }
    reassigned
}

/// Serializes sections as the compact blob stored under the sections key.
pub fn to_blob(sections: &[Section]) -> serde_json::Result<String> {
    serde_json::to_string(sections)
}

/// Serializes sections as a human-readable JSON backup.
pub fn export_json(sections: &[Section]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(sections)
}

/// Joins the URLs of every app outside the section titled `seed_title`.
pub fn export_url_list(sections: &[Section], seed_title: &str) -> String {
    sections
        .iter()
        .filter(|section| section.title != seed_title)
        .flat_map(|section| section.apps.iter().map(|app| app.url.as_str()))
        .collect::<Vec<_>>()
        .join(URL_LIST_LINE_ENDING)
}
