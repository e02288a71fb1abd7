//! Section and app records.
//!
//! # Responsibility
//! - Define the canonical shape persisted in the sections blob.
//! - Validate user-supplied app fields before they reach the store.
//!
//! # Invariants
//! - `Section::title` and `App::name` are non-empty after trim.
//! - Every field except `Section::title` and `Section::apps` defaults when
//!   absent in JSON; missing ids deserialize as 0.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable section identifier (timestamp-derived).
pub type SectionId = i64;

/// Stable app identifier (timestamp-derived), unique across the whole store.
pub type AppId = i64;

const EMBEDDED_IMAGE_PREFIX: &str = "data:image";
const CLASS_TOKEN_PREFIX: &str = "fa";

/// Named, ordered group of app links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Missing in hand-written imports; 0 until `normalize_ids` assigns one.
    #[serde(default)]
    pub id: SectionId,
    pub title: String,
    pub apps: Vec<App>,
}

impl Section {
    /// Creates an empty section.
    pub fn new(id: SectionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            apps: Vec::new(),
        }
    }

    /// Returns the position of `app_id` within this section.
    pub fn position_of(&self, app_id: AppId) -> Option<usize> {
        self.apps.iter().position(|app| app.id == app_id)
    }
}

/// One launcher entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    #[serde(default)]
    pub id: AppId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    /// Empty, a class token (`fa...`), embedded image data, or a glyph.
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
}

/// How an app's `icon` field should be interpreted by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    /// No user icon; a link preview decides.
    None,
    /// `data:image/...` payload pasted by the user.
    EmbeddedImage,
    /// Icon font class list such as `fas fa-robot`.
    ClassToken,
    /// Emoji or short text shown verbatim.
    Glyph,
}

impl App {
    /// Builds an app from a validated draft.
    pub fn from_draft(id: AppId, draft: AppDraft) -> Self {
        Self {
            id,
            name: draft.name,
            url: draft.url,
            icon: draft.icon,
            description: draft.description,
        }
    }

    /// Overwrites all user-editable fields. `id` is untouched.
    pub fn apply_draft(&mut self, draft: AppDraft) {
        self.name = draft.name;
        self.url = draft.url;
        self.icon = draft.icon;
        self.description = draft.description;
    }

    pub fn icon_kind(&self) -> IconKind {
        if self.icon.is_empty() {
            IconKind::None
        } else if self.icon.starts_with(EMBEDDED_IMAGE_PREFIX) {
            IconKind::EmbeddedImage
        } else if self.icon.starts_with(CLASS_TOKEN_PREFIX) {
            IconKind::ClassToken
        } else {
            IconKind::Glyph
        }
    }
}

/// User-supplied app fields for add/edit forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppDraft {
    pub name: String,
    pub url: String,
    pub icon: String,
    pub description: String,
}

impl AppDraft {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Trims every field and checks required ones.
    ///
    /// # Errors
    /// - `EmptyAppName` / `EmptyUrl` when a required field is blank.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let normalized = Self {
            name: self.name.trim().to_string(),
            url: self.url.trim().to_string(),
            icon: self.icon.trim().to_string(),
            description: self.description.trim().to_string(),
        };
        if normalized.name.is_empty() {
            return Err(ValidationError::EmptyAppName);
        }
        if normalized.url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }
        Ok(normalized)
    }
}

/// Trims a section title and rejects blank values.
pub fn normalize_section_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptySectionTitle);
    }
    Ok(trimmed.to_string())
}

/// User-facing validation failures. The store is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptySectionTitle,
    EmptyAppName,
    EmptyUrl,
    /// Link is not an absolute URL.
    InvalidUrl(String),
    /// Snapshot root is not a JSON array.
    SnapshotNotArray,
    /// Snapshot element lacks a string `title` or an array `apps`.
    InvalidSection { index: usize },
    /// Snapshot is not valid JSON or does not match the record shape.
    MalformedSnapshot(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySectionTitle => write!(f, "section title must not be blank"),
            Self::EmptyAppName => write!(f, "app name must not be blank"),
            Self::EmptyUrl => write!(f, "url must not be blank"),
            Self::InvalidUrl(value) => write!(f, "invalid url format: `{value}`"),
            Self::SnapshotNotArray => {
                write!(f, "invalid format: snapshot must be an array of sections")
            }
            Self::InvalidSection { index } => write!(
                f,
                "invalid format: section #{index} must have a title and an apps array"
            ),
            Self::MalformedSnapshot(message) => write!(f, "malformed snapshot: {message}"),
        }
    }
}

impl Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::{normalize_section_title, App, AppDraft, IconKind, ValidationError};

    fn app_with_icon(icon: &str) -> App {
        App::from_draft(1, AppDraft::new("n", "u").with_icon(icon))
    }

    #[test]
    fn icon_kind_distinguishes_icon_sources() {
        assert_eq!(app_with_icon("").icon_kind(), IconKind::None);
        assert_eq!(
            app_with_icon("data:image/png;base64,AAAA").icon_kind(),
            IconKind::EmbeddedImage
        );
        assert_eq!(app_with_icon("fas fa-robot").icon_kind(), IconKind::ClassToken);
        assert_eq!(app_with_icon("✨").icon_kind(), IconKind::Glyph);
    }

    #[test]
    fn draft_normalization_trims_and_requires_name_and_url() {
        let draft = AppDraft::new("  Docs ", " https://x ")
            .with_description("  notes ")
            .normalized()
            .unwrap();
        assert_eq!(draft.name, "Docs");
        assert_eq!(draft.url, "https://x");
        assert_eq!(draft.description, "notes");

        assert_eq!(
            AppDraft::new(" ", "https://x").normalized(),
            Err(ValidationError::EmptyAppName)
        );
        assert_eq!(
            AppDraft::new("Docs", "").normalized(),
            Err(ValidationError::EmptyUrl)
        );
    }

    #[test]
    fn section_title_rejects_whitespace() {
        assert_eq!(
            normalize_section_title("   "),
            Err(ValidationError::EmptySectionTitle)
        );
        assert_eq!(normalize_section_title(" Work ").unwrap(), "Work");
    }

    #[test]
    fn missing_icon_and_description_deserialize_as_empty() {
        let app: App = serde_json::from_str(r#"{"id":7,"name":"a","url":"b"}"#).unwrap();
        assert!(app.icon.is_empty());
        assert!(app.description.is_empty());
    }
}
