//! Link classification for preview icons and thumbnails.
//!
//! # Responsibility
//! - Map a URL string to a content kind and an optional preview image URL.
//!
//! # Invariants
//! - Pure and deterministic: identical input yields identical output.
//! - Never fails; unparsable input classifies as `PreviewKind::Default`.
//! - Checks run in a fixed order and the first match wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(https?:|file:)").expect("valid scheme regex"));
static IMAGE_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(jpeg|jpg|gif|png|webp|svg)$").expect("valid image extension regex")
});
static PDF_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.pdf$").expect("valid pdf extension regex"));

const DEFAULT_SCHEME_PREFIX: &str = "https://";
const GOOGLE_DOCS_HOST: &str = "docs.google.com";
const YOUTUBE_SHORT_HOST: &str = "youtu.be";
const YOUTUBE_HOST_MARKERS: [&str; 2] = ["youtube.com", "youtu.be"];
const YOUTUBE_EMBED_SEGMENT: &str = "/embed/";

/// Content kind used to pick a card icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewKind {
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "pdf")]
    Pdf,
    #[serde(rename = "gdoc")]
    GoogleDoc,
    #[serde(rename = "gsheet")]
    GoogleSheet,
    #[serde(rename = "gslides")]
    GoogleSlides,
    #[serde(rename = "gforms")]
    GoogleForm,
    #[serde(rename = "video")]
    Video,
    #[serde(rename = "default")]
    Default,
}

impl PreviewKind {
    /// Stable lowercase label, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::GoogleDoc => "gdoc",
            Self::GoogleSheet => "gsheet",
            Self::GoogleSlides => "gslides",
            Self::GoogleForm => "gforms",
            Self::Video => "video",
            Self::Default => "default",
        }
    }
}

/// Classification result for one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPreview {
    pub kind: PreviewKind,
    /// Thumbnail source for `Image` and `Video`; `None` otherwise.
    pub preview_url: Option<String>,
}

impl LinkPreview {
    fn plain(kind: PreviewKind) -> Self {
        Self {
            kind,
            preview_url: None,
        }
    }

    fn default_kind() -> Self {
        Self::plain(PreviewKind::Default)
    }
}

/// Classifies `url` for preview rendering.
pub fn classify(url: &str) -> LinkPreview {
    if url.trim().is_empty() {
        return LinkPreview::default_kind();
    }

    let parsed = match Url::parse(&with_default_scheme(url)) {
        Ok(parsed) => parsed,
        Err(_) => return LinkPreview::default_kind(),
    };
    let path = parsed.path();
    let host = parsed.host_str().unwrap_or_default();

    if IMAGE_PATH_RE.is_match(path) {
        return LinkPreview {
            kind: PreviewKind::Image,
            preview_url: Some(url.to_string()),
        };
    }
    if PDF_PATH_RE.is_match(path) {
        return LinkPreview::plain(PreviewKind::Pdf);
    }
    if let Some(kind) = google_workspace_kind(host, path) {
        return LinkPreview::plain(kind);
    }
    if YOUTUBE_HOST_MARKERS
        .iter()
        .any(|marker| host.contains(marker))
    {
        if let Some(video_id) = youtube_video_id(&parsed) {
            return LinkPreview {
                kind: PreviewKind::Video,
                preview_url: Some(youtube_thumbnail_url(&video_id)),
            };
        }
    }

    LinkPreview::default_kind()
}

/// Deterministic thumbnail for a YouTube video id.
pub fn youtube_thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/mqdefault.jpg")
}

fn with_default_scheme(url: &str) -> String {
    if SCHEME_RE.is_match(url) {
        url.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{url}")
    }
}

fn google_workspace_kind(host: &str, path: &str) -> Option<PreviewKind> {
    if host != GOOGLE_DOCS_HOST {
        return None;
    }
    [
        ("/document/", PreviewKind::GoogleDoc),
        ("/spreadsheets/", PreviewKind::GoogleSheet),
        ("/presentation/", PreviewKind::GoogleSlides),
        ("/forms/", PreviewKind::GoogleForm),
    ]
    .into_iter()
    .find(|(segment, _)| path.contains(segment))
    .map(|(_, kind)| kind)
}

/// Extracts the video id from short-link, `v=` query or `/embed/` forms.
///
/// A present-but-empty `v` parameter yields no id; later forms are not tried.
fn youtube_video_id(parsed: &Url) -> Option<String> {
    let candidate = if parsed.host_str() == Some(YOUTUBE_SHORT_HOST) {
        parsed.path().get(1..).map(str::to_string)
    } else if let Some((_, value)) = parsed.query_pairs().find(|(key, _)| key == "v") {
        Some(value.into_owned())
    } else {
        parsed
            .path()
            .split_once(YOUTUBE_EMBED_SEGMENT)
            .and_then(|(_, rest)| rest.split('/').next())
            .map(str::to_string)
    };
    candidate.filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{classify, PreviewKind};

    #[test]
    fn short_link_yields_video_thumbnail() {
        let preview = classify("https://youtu.be/abc123");
        assert_eq!(preview.kind, PreviewKind::Video);
        assert_eq!(
            preview.preview_url.as_deref(),
            Some("https://img.youtube.com/vi/abc123/mqdefault.jpg")
        );
    }

    #[test]
    fn watch_and_embed_forms_extract_the_same_id() {
        let watch = classify("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10");
        let embed = classify("youtube.com/embed/dQw4w9WgXcQ/extra");
        assert_eq!(watch.kind, PreviewKind::Video);
        assert_eq!(watch, embed);
    }

    #[test]
    fn youtube_without_id_is_default() {
        assert_eq!(
            classify("https://www.youtube.com/feed/subscriptions").kind,
            PreviewKind::Default
        );
        assert_eq!(classify("https://youtu.be/").kind, PreviewKind::Default);
        assert_eq!(
            classify("https://www.youtube.com/watch?v=").kind,
            PreviewKind::Default
        );
    }

    #[test]
    fn google_workspace_kinds_match_path_segments() {
        let cases = [
            ("https://docs.google.com/document/d/1", PreviewKind::GoogleDoc),
            ("https://docs.google.com/spreadsheets/d/xyz", PreviewKind::GoogleSheet),
            ("https://docs.google.com/presentation/d/1", PreviewKind::GoogleSlides),
            ("https://docs.google.com/forms/d/1", PreviewKind::GoogleForm),
        ];
        for (url, kind) in cases {
            let preview = classify(url);
            assert_eq!(preview.kind, kind, "{url}");
            assert_eq!(preview.preview_url, None);
        }
    }

    #[test]
    fn image_keeps_original_input_as_preview() {
        let preview = classify("example.com/cat.PNG");
        assert_eq!(preview.kind, PreviewKind::Image);
        assert_eq!(preview.preview_url.as_deref(), Some("example.com/cat.PNG"));
    }

    #[test]
    fn image_extension_wins_over_google_host() {
        assert_eq!(
            classify("https://docs.google.com/document/d/1/cover.jpg").kind,
            PreviewKind::Image
        );
    }

    #[test]
    fn pdf_and_file_scheme() {
        assert_eq!(classify("file:///tmp/report.pdf").kind, PreviewKind::Pdf);
        assert_eq!(classify("HTTP://x.org/a.Pdf").kind, PreviewKind::Pdf);
    }

    #[test]
    fn garbage_and_empty_are_default() {
        let preview = classify("not a url at all");
        assert_eq!(preview.kind, PreviewKind::Default);
        assert_eq!(preview.preview_url, None);
        assert_eq!(classify("").kind, PreviewKind::Default);
    }

    #[test]
    fn classification_is_idempotent() {
        let url = "https://youtu.be/xyz?t=3";
        assert_eq!(classify(url), classify(url));
    }
}
