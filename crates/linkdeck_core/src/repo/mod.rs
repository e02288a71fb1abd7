//! Persistence layer: key-value contract and typed repositories on top of it.
//!
//! # Responsibility
//! - Define the `KeyValueStore` contract and its SQLite/in-memory backends.
//! - Map the sections blob and theme preference onto fixed keys.
//!
//! # Invariants
//! - The whole section list is written as one value under one key.
//! - Repositories report storage failures; callers decide whether to swallow them.

pub mod kv_store;
pub mod section_repo;
pub mod theme_repo;
