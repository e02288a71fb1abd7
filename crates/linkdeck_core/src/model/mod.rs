//! Dashboard domain model.
//!
//! # Responsibility
//! - Define the section/app records shared by store, search and share intake.
//! - Allocate unique integer ids and provide the built-in default dataset.
//!
//! # Invariants
//! - Every app is owned by exactly one section.
//! - Ids are unique per entity class and never reused after deletion.

pub mod defaults;
pub mod id;
pub mod section;
pub mod snapshot;
