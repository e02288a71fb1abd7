//! Link previews for dashboard cards.
//!
//! # Responsibility
//! - Classify links into content kinds with optional thumbnails.
//! - Decide which icon a card shows given the user icon and the link kind.

pub mod card;
pub mod classify;
