//! Core domain logic for LinkDeck, a local link launcher dashboard.
//! This crate is the single source of truth for section/app invariants.

pub mod db;
pub mod enrich;
pub mod logging;
pub mod model;
pub mod preview;
pub mod repo;
pub mod search;
pub mod service;

pub use enrich::oembed::{
    enrich, enrich_draft, fetcher_or_noop, is_video_link, EnrichError, Enrichment,
    HttpMetadataFetcher, MetadataFetcher, NoopMetadataFetcher, VideoMetadata,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::defaults::{
    default_sections, DEFAULT_INBOX_SECTION_TITLE, DEFAULT_SEED_SECTION_TITLE,
    SHARED_LINKS_SECTION_TITLE,
};
pub use model::id::IdAllocator;
pub use model::section::{App, AppDraft, AppId, IconKind, Section, SectionId, ValidationError};
pub use preview::card::{card_icon, CardIcon};
pub use preview::classify::{classify, LinkPreview, PreviewKind};
pub use repo::kv_store::{
    KeyValueStore, KvError, KvResult, MemoryKeyValueStore, SqliteKeyValueStore,
};
pub use repo::section_repo::{
    SectionRepository, StoredSections, ID_HIGH_WATER_KEY, SECTIONS_KEY,
};
pub use repo::theme_repo::{Theme, ThemeRepository, THEME_KEY};
pub use search::filter::filter_sections;
pub use service::dashboard_service::{
    AppLocation, Confirmation, DashboardStore, LoadSource, SnapshotExport, StoreError,
};
pub use service::share_service::{share_intake, ShareOutcome, ShareParams, MAIN_VIEW};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
