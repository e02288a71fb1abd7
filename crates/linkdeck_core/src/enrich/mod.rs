//! Optional metadata enrichment for recognized video links.
//!
//! # Responsibility
//! - Fetch oEmbed title/author for video links through a pluggable fetcher.
//! - Fold fetched metadata into app drafts without overriding user input.
//!
//! # Invariants
//! - Enrichment never gates a store mutation; every failure degrades to `Ignored`.
//! - No retries; a failed fetch leaves inputs at their prior values.

pub mod oembed;
