//! Shared domain types for Buddy.
//!
//! This crate contains the types used across the Buddy client:
//! Companion, Category, CompanionDraft, client configuration, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod companion;
pub mod config;
pub mod error;
