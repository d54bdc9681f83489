use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::companion::CompanionField;

/// Field-level validation failures for a companion draft.
///
/// Keyed by field, ordered the way the form lays fields out. An empty map
/// means the draft is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<CompanionField, &'static str>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: CompanionField, message: &'static str) {
        self.errors.insert(field, message);
    }

    pub fn remove(&mut self, field: CompanionField) {
        self.errors.remove(&field);
    }

    pub fn get(&self, field: CompanionField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (CompanionField, &'static str)> + '_ {
        self.errors.iter().map(|(field, msg)| (*field, *msg))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Errors from sending a draft to the backend.
///
/// The detail is for logs only. Users always see the same generic message.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend responded with status {0}")]
    Status(u16),

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// Unknown field name supplied on the command line or in a patch.
#[derive(Debug, Error)]
#[error("unknown companion field: '{0}'")]
pub struct FieldParseError(pub String);
