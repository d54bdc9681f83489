//! Buddy CLI entry point.
//!
//! Binary name: `buddy`
//!
//! Parses CLI arguments, initializes tracing and client configuration, then
//! dispatches to the appropriate command handler.

mod cli;
mod state;
mod terminal;

use clap::Parser;
use clap_complete::generate;

use buddy_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};
use cli::{Cli, Commands, CreateResource, EditResource};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!(e))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        // Shell completions, templates, and offline checks don't need app state
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "buddy", &mut std::io::stdout());
            Ok(())
        }

        Commands::Template => cli::template::print_template(cli.json),

        Commands::Validate { path } => cli::validate::validate_draft(&path, cli.json).await,

        Commands::Categories { categories_file } => {
            cli::categories::list_categories(&categories_file, cli.json).await
        }

        Commands::Create { resource } => {
            let state = AppState::init(cli.api_url).await?;
            match resource {
                CreateResource::Companion { fields } => {
                    cli::companion::create_companion(&state, fields, cli.json, cli.quiet).await
                }
            }
        }

        Commands::Edit { resource } => {
            let state = AppState::init(cli.api_url).await?;
            match resource {
                EditResource::Companion { from_file, fields } => {
                    cli::companion::edit_companion(&state, from_file, fields, cli.json, cli.quiet)
                        .await
                }
            }
        }
    }
}
