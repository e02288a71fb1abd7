//! Dashboard use-case services.
//!
//! # Responsibility
//! - Orchestrate store mutations and persistence into caller-facing APIs.
//! - Keep CLI/UI layers decoupled from storage details.

pub mod dashboard_service;
pub mod share_service;
