//! Business logic and collaborator trait definitions for Buddy.
//!
//! This crate defines the "ports" (submission client, notifier, navigator)
//! that front-ends and the infrastructure layer implement, plus the pure
//! validation rules and the form controller that ties them together. It
//! depends only on `buddy-types` -- never on `buddy-infra` or any IO crate.

pub mod form;
pub mod navigate;
pub mod notify;
pub mod presentation;
pub mod submission;
pub mod validation;
