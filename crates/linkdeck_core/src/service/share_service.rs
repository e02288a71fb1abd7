//! Share intake: one-shot handling of links shared from other apps.
//!
//! # Responsibility
//! - Turn shared `title`/`text`/`url` parameters into one new app.
//! - Append it to the last persisted section and write the blob back.
//!
//! # Invariants
//! - Runs independently of any loaded `DashboardStore`; the persisted blob is
//!   the only coordination point (last writer wins).
//! - Corrupt or unreadable stored data is never overwritten by this flow.
//! - New ids stay above the persisted id high-water mark.
//! - Every outcome redirects to the main view.

use crate::model::defaults::SHARED_LINKS_SECTION_TITLE;
use crate::model::id::IdAllocator;
use crate::model::section::{App, Section};
use crate::repo::kv_store::KeyValueStore;
use crate::repo::section_repo::{SectionRepository, StoredSections};
use log::{error, info, warn};
use url::form_urlencoded;

/// Page the share target hands control back to.
pub const MAIN_VIEW: &str = "index.html";

/// Parameters delivered by the share target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareParams {
    pub title: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
}

impl ShareParams {
    /// Parses a `title=..&text=..&url=..` query string; a leading `?` is allowed.
    ///
    /// The first occurrence of each key wins.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            let slot = match &*key {
                "title" => &mut params.title,
                "text" => &mut params.text,
                "url" => &mut params.url,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// `url` when non-empty, else `text` (shared text often carries the link).
    pub fn resolved_url(&self) -> Option<String> {
        non_empty(self.url.as_deref())
            .or_else(|| non_empty(self.text.as_deref()))
            .map(str::to_string)
    }

    fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Result of one share intake run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Neither `url` nor `text` carried anything usable.
    NothingShared,
    /// Stored sections were corrupt or the backend failed; nothing was written.
    StoreUnreadable(String),
    /// App appended to the last section; `persisted` reports the write result.
    Added { app: App, persisted: bool },
}

impl ShareOutcome {
    /// Where the caller should navigate next. Always the main view.
    pub fn redirect_target(&self) -> &'static str {
        MAIN_VIEW
    }
}

/// Builds the shared app.
///
/// With a title, the title is the name and the shared text, stored verbatim,
/// the description.
/// Without one, the URL doubles as the name.
pub fn shared_app(id: i64, params: &ShareParams, url: String) -> App {
    let (name, description) = match params.title() {
        Some(title) => (
            title.to_string(),
            params.text.clone().unwrap_or_default(),
        ),
        None => (url.clone(), String::new()),
    };
    App {
        id,
        name,
        url,
        icon: String::new(),
        description,
    }
}

/// Appends the shared link to the last stored section and persists.
pub fn share_intake<S: KeyValueStore>(
    params: &ShareParams,
    repo: &SectionRepository<S>,
) -> ShareOutcome {
    let Some(url) = params.resolved_url() else {
        warn!("event=share_intake module=service status=skipped reason=no_url");
        return ShareOutcome::NothingShared;
    };

    let mut sections = match repo.read() {
        StoredSections::Loaded(sections) => sections,
        StoredSections::Absent => Vec::new(),
        StoredSections::Corrupt(reason) => {
            error!("event=share_intake module=service status=error reason=corrupt error={reason}");
            return ShareOutcome::StoreUnreadable(reason);
        }
        StoredSections::ReadFailed(reason) => {
            error!(
                "event=share_intake module=service status=error reason=read_failed error={reason}"
            );
            return ShareOutcome::StoreUnreadable(reason);
        }
    };

    let mut ids = IdAllocator::seeded_from(&sections);
    ids.observe(repo.read_id_high_water());
    if sections.is_empty() {
        sections.push(Section::new(ids.next_id(), SHARED_LINKS_SECTION_TITLE));
    }
    let app = shared_app(ids.next_id(), params, url);
    if let Some(last) = sections.last_mut() {
        last.apps.push(app.clone());
    }

    let persisted = repo.write(&sections, ids.high_water()).is_ok();
    info!(
        "event=share_intake module=service status=ok persisted={persisted} sections={}",
        sections.len()
    );
    ShareOutcome::Added { app, persisted }
}

#[cfg(test)]
mod tests {
    use super::{shared_app, ShareParams};

    #[test]
    fn titled_share_keeps_text_verbatim() {
        let params = ShareParams::from_query("title=Doc&text=+line+one%0Aline+two+");
        let app = shared_app(7, &params, "https://x".to_string());
        assert_eq!(app.name, "Doc");
        assert_eq!(app.description, " line one\nline two ");
    }

    #[test]
    fn query_parsing_decodes_and_keeps_first_value() {
        let params =
            ShareParams::from_query("?title=My+Doc&url=https%3A%2F%2Fx.org%2Fa&url=https://y");
        assert_eq!(params.title.as_deref(), Some("My Doc"));
        assert_eq!(params.url.as_deref(), Some("https://x.org/a"));
        assert_eq!(params.text, None);
    }

    #[test]
    fn url_falls_back_to_text() {
        let params = ShareParams::from_query("text=https://shared.example&url=");
        assert_eq!(
            params.resolved_url().as_deref(),
            Some("https://shared.example")
        );
        assert_eq!(ShareParams::from_query("title=only").resolved_url(), None);
    }
}
