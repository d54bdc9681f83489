//! Filesystem adapters for Buddy.
//!
//! Resolves the data directory and reads the JSON inputs the CLI works
//! from: category lists, existing companion records, and drafts.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;

use buddy_types::companion::{Category, Companion, CompanionDraft};

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `BUDDY_DATA_DIR` environment variable
/// 2. `~/.buddy`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BUDDY_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".buddy");
    }

    // Last resort: current directory
    PathBuf::from(".buddy")
}

async fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {what} from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {what} in {}", path.display()))
}

/// Read an ordered category list (`[{"id": .., "name": ..}, ..]`).
pub async fn load_categories(path: &Path) -> anyhow::Result<Vec<Category>> {
    read_json(path, "categories").await
}

/// Read an existing companion record (edit mode).
pub async fn load_companion(path: &Path) -> anyhow::Result<Companion> {
    read_json(path, "companion").await
}

/// Read a possibly partial draft. Missing fields default to empty.
pub async fn load_draft(path: &Path) -> anyhow::Result<CompanionDraft> {
    read_json(path, "draft").await
}

/// Read a free-text file, such as long instructions or a seed transcript.
pub async fn load_text(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}
