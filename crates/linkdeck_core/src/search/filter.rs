//! Case-insensitive substring search over sections and apps.
//!
//! # Invariants
//! - Pure projection: input sections are never mutated.
//! - A section whose title matches keeps all of its apps.
//! - A section included only through app matches keeps only matching apps.
//! - An empty term returns the full list unchanged.

use crate::model::section::{App, Section};

/// Filters `sections` by `term` against section titles and app name/url/description.
pub fn filter_sections(sections: &[Section], term: &str) -> Vec<Section> {
    if term.is_empty() {
        return sections.to_vec();
    }
    let needle = term.to_lowercase();

    sections
        .iter()
        .filter_map(|section| {
            if contains_folded(&section.title, &needle) {
                return Some(section.clone());
            }
            let apps: Vec<App> = section
                .apps
                .iter()
                .filter(|app| app_matches(app, &needle))
                .cloned()
                .collect();
            if apps.is_empty() {
                return None;
            }
            Some(Section {
                id: section.id,
                title: section.title.clone(),
                apps,
            })
        })
        .collect()
}

fn app_matches(app: &App, needle: &str) -> bool {
    contains_folded(&app.name, needle)
        || contains_folded(&app.url, needle)
        || contains_folded(&app.description, needle)
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::filter_sections;
    use crate::model::section::{App, AppDraft, Section};

    fn section(id: i64, title: &str, apps: Vec<App>) -> Section {
        Section {
            id,
            title: title.to_string(),
            apps,
        }
    }

    fn app(id: i64, name: &str, url: &str, description: &str) -> App {
        App::from_draft(id, AppDraft::new(name, url).with_description(description))
    }

    #[test]
    fn title_match_keeps_every_app() {
        let sections = vec![section(
            1,
            "Video Picks",
            vec![app(2, "a", "https://a", ""), app(3, "b", "https://b", "")],
        )];
        let filtered = filter_sections(&sections, "VIDEO");
        assert_eq!(filtered, sections);
    }

    #[test]
    fn app_match_keeps_only_matching_apps() {
        let sections = vec![section(
            1,
            "Work",
            vec![
                app(2, "Tracker", "https://jira", ""),
                app(3, "Chat", "https://slack", "team rooms"),
            ],
        )];
        let filtered = filter_sections(&sections, "rooms");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].apps.len(), 1);
        assert_eq!(filtered[0].apps[0].id, 3);
    }

    #[test]
    fn url_matches_are_case_insensitive() {
        let sections = vec![section(1, "Work", vec![app(2, "x", "https://GitHub.com", "")])];
        assert_eq!(filter_sections(&sections, "github").len(), 1);
    }
}
