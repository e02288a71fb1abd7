//! Built-in dataset used when nothing usable is persisted.

use crate::model::section::{App, Section};

/// Title of the seeded section; its links are left out of the plain-text export.
pub const DEFAULT_SEED_SECTION_TITLE: &str = "Launcher Tools";

/// Title of the empty section new links land in by default.
pub const DEFAULT_INBOX_SECTION_TITLE: &str = "Shared Docs, YouTube, Apps";

/// Title of the section share intake creates when the store is empty.
pub const SHARED_LINKS_SECTION_TITLE: &str = "Shared Links";

fn sample_app(id: i64, name: &str, url: &str, icon: &str, description: &str) -> App {
    App {
        id,
        name: name.to_string(),
        url: url.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
    }
}

/// Returns a fresh copy of the default dataset: one seeded section, one empty section.
pub fn default_sections() -> Vec<Section> {
    vec![
        Section {
            id: 1,
            title: DEFAULT_SEED_SECTION_TITLE.to_string(),
            apps: vec![
                sample_app(
                    101,
                    "Search",
                    "https://duckduckgo.com",
                    "🔎",
                    "Private web search",
                ),
                sample_app(
                    102,
                    "Mail",
                    "https://mail.google.com",
                    "✉️",
                    "Open the inbox",
                ),
                sample_app(
                    103,
                    "Calendar",
                    "https://calendar.google.com",
                    "📅",
                    "Today's schedule",
                ),
                sample_app(
                    104,
                    "Docs",
                    "https://docs.google.com/document/u/0/",
                    "📝",
                    "Recent documents",
                ),
                sample_app(
                    105,
                    "Rust Docs",
                    "https://doc.rust-lang.org/std/",
                    "fas fa-book",
                    "Standard library reference",
                ),
            ],
        },
        Section::new(2, DEFAULT_INBOX_SECTION_TITLE),
    ]
}
