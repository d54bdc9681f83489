//! CLI command definitions for the `buddy` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `buddy create companion`, `buddy edit companion`).

pub mod categories;
pub mod companion;
pub mod template;
pub mod validate;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use buddy_types::error::ValidationErrors;

/// Create and edit your talking Buddies.
#[derive(Parser)]
#[command(name = "buddy", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Backend base URL (overrides config.toml and BUDDY_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new resource.
    Create {
        #[command(subcommand)]
        resource: CreateResource,
    },

    /// Edit an existing resource.
    Edit {
        #[command(subcommand)]
        resource: EditResource,
    },

    /// Check a draft file against the companion schema without submitting.
    Validate {
        /// JSON draft file (`{name, description, instructions, seed, src, categoryId}`).
        path: PathBuf,
    },

    /// List the category options from a categories file.
    Categories {
        /// JSON file with `[{"id": .., "name": ..}]`.
        #[arg(long)]
        categories_file: PathBuf,
    },

    /// Print the form layout with example instructions and conversation.
    Template,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CreateResource {
    /// Create a new companion.
    Companion {
        #[command(flatten)]
        fields: FieldArgs,
    },
}

#[derive(Subcommand)]
pub enum EditResource {
    /// Edit an existing companion; unspecified fields keep their current value.
    Companion {
        /// JSON file holding the current companion record (including `id`).
        #[arg(long)]
        from_file: PathBuf,

        #[command(flatten)]
        fields: FieldArgs,
    },
}

/// Field values supplied on the command line.
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    /// Companion name.
    #[arg(long)]
    pub name: Option<String>,

    /// Short description.
    #[arg(long)]
    pub description: Option<String>,

    /// Instructions (system prompt / backstory), at least 200 characters.
    #[arg(long, conflicts_with = "instructions_file")]
    pub instructions: Option<String>,

    /// Read instructions from a file.
    #[arg(long)]
    pub instructions_file: Option<PathBuf>,

    /// Example conversation, at least 200 characters.
    #[arg(long, conflicts_with = "seed_file")]
    pub seed: Option<String>,

    /// Read the example conversation from a file.
    #[arg(long)]
    pub seed_file: Option<PathBuf>,

    /// Image reference (URL or uploaded asset id).
    #[arg(long)]
    pub src: Option<String>,

    /// Category id.
    #[arg(long)]
    pub category: Option<String>,

    /// JSON file with the available categories (enables a picker).
    #[arg(long)]
    pub categories_file: Option<PathBuf>,
}

/// Field errors keyed by wire name, for `--json` output.
pub(crate) fn errors_json(errors: &ValidationErrors) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = errors
        .iter()
        .map(|(field, message)| (field.as_str().to_string(), message.into()))
        .collect();
    serde_json::Value::Object(map)
}
