use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::FieldParseError;

/// Backend identifier for a companion record.
///
/// Opaque to the client: the backend assigns it and the client only echoes it
/// back in update URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanionId(pub String);

impl CompanionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CompanionId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

/// Backend identifier for a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A classification tag owned by the backend.
///
/// The client never creates or edits categories; it receives them as a
/// read-only ordered list and renders them as selectable options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A persisted companion persona.
///
/// Extra fields the backend may attach (owner, timestamps) are ignored on
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Companion {
    pub id: CompanionId,
    pub name: String,
    /// Short description shown in listings.
    pub description: String,
    /// System prompt / backstory.
    pub instructions: String,
    /// Example dialogue transcript.
    pub seed: String,
    /// Reference to the uploaded avatar image.
    pub src: String,
    pub category_id: CategoryId,
}

/// An in-progress, not yet persisted companion.
///
/// This is also the exact JSON body sent on create and update:
/// `{name, description, instructions, seed, src, categoryId}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub seed: String,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub category_id: String,
}

impl CompanionDraft {
    /// A draft with every field empty (create mode).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read a single field by name.
    pub fn get(&self, field: CompanionField) -> &str {
        match field {
            CompanionField::Name => &self.name,
            CompanionField::Description => &self.description,
            CompanionField::Instructions => &self.instructions,
            CompanionField::Seed => &self.seed,
            CompanionField::Src => &self.src,
            CompanionField::CategoryId => &self.category_id,
        }
    }

    /// Overwrite a single field.
    pub fn set(&mut self, field: CompanionField, value: String) {
        match field {
            CompanionField::Name => self.name = value,
            CompanionField::Description => self.description = value,
            CompanionField::Instructions => self.instructions = value,
            CompanionField::Seed => self.seed = value,
            CompanionField::Src => self.src = value,
            CompanionField::CategoryId => self.category_id = value,
        }
    }
}

impl From<&Companion> for CompanionDraft {
    fn from(companion: &Companion) -> Self {
        Self {
            name: companion.name.clone(),
            description: companion.description.clone(),
            instructions: companion.instructions.clone(),
            seed: companion.seed.clone(),
            src: companion.src.clone(),
            category_id: companion.category_id.0.clone(),
        }
    }
}

/// The six editable fields of a companion draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompanionField {
    Src,
    Name,
    Description,
    CategoryId,
    Instructions,
    Seed,
}

impl CompanionField {
    /// All fields in the order the form presents them.
    pub const ALL: [CompanionField; 6] = [
        CompanionField::Src,
        CompanionField::Name,
        CompanionField::Description,
        CompanionField::CategoryId,
        CompanionField::Instructions,
        CompanionField::Seed,
    ];

    /// Wire name of the field (the JSON key in request bodies).
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanionField::Src => "src",
            CompanionField::Name => "name",
            CompanionField::Description => "description",
            CompanionField::CategoryId => "categoryId",
            CompanionField::Instructions => "instructions",
            CompanionField::Seed => "seed",
        }
    }
}

impl fmt::Display for CompanionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanionField {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "src" | "image" => Ok(CompanionField::Src),
            "name" => Ok(CompanionField::Name),
            "description" => Ok(CompanionField::Description),
            "categoryId" | "category_id" | "category" => Ok(CompanionField::CategoryId),
            "instructions" => Ok(CompanionField::Instructions),
            "seed" => Ok(CompanionField::Seed),
            other => Err(FieldParseError(other.to_string())),
        }
    }
}
