//! oEmbed lookups for video links.

use crate::model::section::AppDraft;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use url::Url;

static VIDEO_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)youtube\.com|youtu\.be").expect("valid video link regex"));

const OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

/// Default upper bound for one oEmbed request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fields consumed from an oEmbed document. Both are optional upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
}

impl VideoMetadata {
    /// `By <author>` line used as a description, when an author is known.
    pub fn byline(&self) -> Option<String> {
        self.author_name
            .as_deref()
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .map(|author| format!("By {author}"))
    }

    fn title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
    }

    /// Fills only the blank name/description fields of a form draft.
    pub fn fill_draft(&self, draft: &mut AppDraft) {
        if draft.name.trim().is_empty() {
            if let Some(title) = self.title() {
                draft.name = title.to_string();
            }
        }
        if draft.description.trim().is_empty() {
            if let Some(byline) = self.byline() {
                draft.description = byline;
            }
        }
    }

    /// Replaces name/description with fetched values where present.
    pub fn overwrite_draft(&self, draft: &mut AppDraft) {
        if let Some(title) = self.title() {
            draft.name = title.to_string();
        }
        if let Some(byline) = self.byline() {
            draft.description = byline;
        }
    }
}

/// Failure of an enrichment lookup. Callers treat every variant as "no data".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichError {
    /// Lookups are turned off (offline mode, tests).
    Disabled,
    /// Transport failure or request construction error.
    Http(String),
    /// Endpoint answered with a non-success status.
    Status(u16),
    /// Body was not a valid oEmbed JSON document.
    Decode(String),
}

impl Display for EnrichError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "metadata lookups are disabled"),
            Self::Http(message) => write!(f, "metadata request failed: {message}"),
            Self::Status(code) => write!(f, "metadata endpoint returned status {code}"),
            Self::Decode(message) => write!(f, "invalid metadata document: {message}"),
        }
    }
}

impl Error for EnrichError {}

/// Source of video metadata.
pub trait MetadataFetcher {
    fn fetch(&self, video_url: &str) -> Result<VideoMetadata, EnrichError>;
}

/// Fetcher that never performs network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetadataFetcher;

impl MetadataFetcher for NoopMetadataFetcher {
    fn fetch(&self, _video_url: &str) -> Result<VideoMetadata, EnrichError> {
        Err(EnrichError::Disabled)
    }
}

/// Blocking HTTP fetcher against the public oEmbed endpoint.
#[derive(Debug, Clone)]
pub struct HttpMetadataFetcher {
    client: reqwest::blocking::Client,
}

impl HttpMetadataFetcher {
    /// Builds a client whose requests give up after `timeout`.
    ///
    /// # Errors
    /// - `EnrichError::Http` when the TLS/HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, EnrichError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| EnrichError::Http(err.to_string()))?;
        Ok(Self { client })
    }
}

impl MetadataFetcher for HttpMetadataFetcher {
    fn fetch(&self, video_url: &str) -> Result<VideoMetadata, EnrichError> {
        let endpoint = oembed_endpoint(video_url)?;
        let response = self
            .client
            .get(endpoint)
            .send()
            .map_err(|err| EnrichError::Http(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::Status(status.as_u16()));
        }
        response
            .json::<VideoMetadata>()
            .map_err(|err| EnrichError::Decode(err.to_string()))
    }
}

/// Boxes `built`, or falls back to `NoopMetadataFetcher` when the HTTP client
/// could not be constructed. Enrichment then degrades to `Ignored`.
pub fn fetcher_or_noop(
    built: Result<HttpMetadataFetcher, EnrichError>,
) -> Box<dyn MetadataFetcher> {
    match built {
        Ok(fetcher) => Box::new(fetcher),
        Err(err) => {
            warn!("event=metadata_client module=enrich status=fallback error={err}");
            Box::new(NoopMetadataFetcher)
        }
    }
}

/// Outcome of a best-effort enrichment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    Applied(VideoMetadata),
    Ignored,
}

/// Returns whether `url` points at a supported video service.
pub fn is_video_link(url: &str) -> bool {
    VIDEO_LINK_RE.is_match(url)
}

/// Builds the oEmbed request URL for `video_url`.
///
/// # Errors
/// - `EnrichError::Http` if the endpoint cannot be assembled.
pub fn oembed_endpoint(video_url: &str) -> Result<Url, EnrichError> {
    Url::parse_with_params(OEMBED_ENDPOINT, &[("url", video_url), ("format", "json")])
        .map_err(|err| EnrichError::Http(err.to_string()))
}

/// Looks up metadata for video links; every failure is logged and swallowed.
pub fn enrich(url: &str, fetcher: &dyn MetadataFetcher) -> Enrichment {
    if !is_video_link(url) {
        return Enrichment::Ignored;
    }
    match fetcher.fetch(url) {
        Ok(metadata) => {
            info!(
                "event=metadata_fetch module=enrich status=ok has_title={} has_author={}",
                metadata.title.is_some(),
                metadata.author_name.is_some()
            );
            Enrichment::Applied(metadata)
        }
        Err(EnrichError::Disabled) => Enrichment::Ignored,
        Err(err) => {
            warn!("event=metadata_fetch module=enrich status=error error={err}");
            Enrichment::Ignored
        }
    }
}

/// Form "url entered" hook: fills blank draft fields from video metadata.
///
/// Returns `true` when the draft changed.
pub fn enrich_draft(draft: &mut AppDraft, fetcher: &dyn MetadataFetcher) -> bool {
    if !draft.name.trim().is_empty() {
        return false;
    }
    match enrich(draft.url.trim(), fetcher) {
        Enrichment::Applied(metadata) => {
            let before = draft.clone();
            metadata.fill_draft(draft);
            *draft != before
        }
        Enrichment::Ignored => false,
    }
}
