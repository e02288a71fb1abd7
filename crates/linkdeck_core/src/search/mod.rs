//! Search over the in-memory dashboard.
//!
//! # Responsibility
//! - Provide the pure filter projection used by the search box.

pub mod filter;
