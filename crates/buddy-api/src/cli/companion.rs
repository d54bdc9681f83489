//! Companion form CLI commands: create and edit.
//!
//! Both commands drive a [`FormController`] wired to the HTTP submission
//! client and the terminal notifier/navigator. Values come from flags first;
//! anything still invalid is prompted for when attached to a terminal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use console::style;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

use buddy_core::form::{FormController, SubmitOutcome};
use buddy_core::navigate::Navigator;
use buddy_core::notify::Notifier;
use buddy_core::presentation::{SECTIONS, category_options, field_spec, submit_label};
use buddy_core::submission::SubmissionClient;
use buddy_core::validation::validate_field;
use buddy_infra::filesystem::{load_categories, load_companion, load_text};
use buddy_types::companion::{Category, Companion, CompanionField};
use buddy_types::error::ValidationErrors;

use super::{FieldArgs, errors_json};
use crate::state::AppState;
use crate::terminal::{TerminalNavigator, TerminalNotifier};

/// Create a new companion via interactive prompts or one-shot flags.
///
/// # Examples
///
/// ```bash
/// # Interactive
/// buddy create companion --categories-file categories.json
///
/// # One-shot
/// buddy create companion --name "Ada Lovelace" --description "Mathematician" \
///     --instructions-file ada.txt --seed-file ada-chat.txt \
///     --src https://img.example/ada.png --category cat_science
/// ```
pub async fn create_companion(
    state: &AppState,
    fields: FieldArgs,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let categories = load_optional_categories(fields.categories_file.as_deref()).await?;
    run_form(state, None, categories, fields, json, quiet).await
}

/// Edit an existing companion loaded from a JSON record.
pub async fn edit_companion(
    state: &AppState,
    from_file: PathBuf,
    fields: FieldArgs,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let companion = load_companion(&from_file).await?;
    let categories = load_optional_categories(fields.categories_file.as_deref()).await?;
    run_form(state, Some(&companion), categories, fields, json, quiet).await
}

async fn load_optional_categories(path: Option<&Path>) -> Result<Vec<Category>> {
    match path {
        Some(path) => load_categories(path).await,
        None => Ok(Vec::new()),
    }
}

async fn run_form(
    state: &AppState,
    initial: Option<&Companion>,
    categories: Vec<Category>,
    fields: FieldArgs,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let client = state.submission_client()?;
    let spinner = ProgressBar::new_spinner();
    let notifier = Arc::new(TerminalNotifier::new(quiet || json).with_progress(spinner.clone()));
    let start_route = match initial {
        Some(companion) => format!("/companion/{}", companion.id),
        None => "/companion/new".to_string(),
    };
    let navigator = Arc::new(TerminalNavigator::new(start_route));

    let controller = FormController::new(
        client,
        Arc::clone(&notifier),
        Arc::clone(&navigator),
        categories,
        initial,
    );

    apply_field_args(&controller, fields).await?;

    let interactive = !json && !quiet && console::user_attended();
    if interactive {
        prompt_invalid_fields(&controller)?;
    }

    if !json && !quiet {
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("{}...", submit_label(&controller.mode())));
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    }

    let outcome = controller.submit().await;
    spinner.finish_and_clear();

    if json {
        print_json_outcome(&outcome, &notifier, &navigator)?;
    }

    match outcome {
        SubmitOutcome::Saved => {
            if !json && !quiet && navigator.is_home() {
                println!(
                    "  {} {}",
                    style("→").dim(),
                    style(format!("Returned to {}", navigator.route())).dim()
                );
            }
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            if !json {
                print_errors(&errors);
            }
            bail!("companion draft is invalid ({} field(s))", errors.len())
        }
        SubmitOutcome::Failed => {
            if !json && !quiet {
                println!(
                    "  {}",
                    style("Your draft was kept. Run the command again to retry.").dim()
                );
            }
            bail!("companion submission failed")
        }
        SubmitOutcome::Ignored => bail!("a submission is already in progress"),
    }
}

/// Feed every flag that was supplied into the controller.
async fn apply_field_args<C, N, V>(
    controller: &FormController<C, N, V>,
    fields: FieldArgs,
) -> Result<()>
where
    C: SubmissionClient,
    N: Notifier,
    V: Navigator,
{
    let instructions = match (fields.instructions, fields.instructions_file) {
        (Some(text), _) => Some(text),
        (None, Some(path)) => Some(load_text(&path).await?),
        (None, None) => None,
    };
    let seed = match (fields.seed, fields.seed_file) {
        (Some(text), _) => Some(text),
        (None, Some(path)) => Some(load_text(&path).await?),
        (None, None) => None,
    };

    let supplied = [
        (CompanionField::Src, fields.src),
        (CompanionField::Name, fields.name),
        (CompanionField::Description, fields.description),
        (CompanionField::CategoryId, fields.category),
        (CompanionField::Instructions, instructions),
        (CompanionField::Seed, seed),
    ];
    for (field, value) in supplied {
        if let Some(value) = value {
            controller.update(field, value);
        }
    }
    Ok(())
}

/// Prompt, section by section, for every field that is currently invalid.
///
/// Each answer goes through `update`, and its violation (if any) is shown
/// inline before asking again.
fn prompt_invalid_fields<C, N, V>(controller: &FormController<C, N, V>) -> Result<()>
where
    C: SubmissionClient,
    N: Notifier,
    V: Navigator,
{
    for section in &SECTIONS {
        let pending: Vec<CompanionField> = section
            .fields
            .iter()
            .copied()
            .filter(|field| validate_field(&controller.draft(), *field).is_some())
            .collect();
        if pending.is_empty() {
            continue;
        }

        println!();
        println!("  {}", style(section.title).bold());
        println!("  {}", style(section.description).dim());

        for field in pending {
            let spec = field_spec(field);
            println!();
            println!("  {}", style(spec.help).dim());
            if spec.multiline {
                println!(
                    "  {}",
                    style("Tip: pass a file with --instructions-file / --seed-file, or run `buddy template` for an example.").dim()
                );
            }

            loop {
                let value = if field == CompanionField::CategoryId && !controller.categories().is_empty() {
                    let options = category_options(controller.categories());
                    let labels: Vec<&str> = options.iter().map(|o| o.label).collect();
                    let selection = Select::new()
                        .with_prompt(spec.placeholder)
                        .items(&labels)
                        .default(0)
                        .interact()?;
                    options[selection].value.to_string()
                } else {
                    Input::<String>::new()
                        .with_prompt(spec.label)
                        .allow_empty(true)
                        .interact_text()?
                };

                match controller.update(field, value) {
                    None => break,
                    Some(message) => {
                        println!("  {} {}", style("!").yellow().bold(), style(message).yellow())
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_errors(errors: &ValidationErrors) {
    println!();
    for (field, message) in errors.iter() {
        println!(
            "  {} {}: {}",
            style("✗").red(),
            style(field_spec(field).label).bold(),
            message
        );
    }
    println!();
}

fn outcome_name(outcome: &SubmitOutcome) -> &'static str {
    match outcome {
        SubmitOutcome::Saved => "saved",
        SubmitOutcome::Invalid(_) => "invalid",
        SubmitOutcome::Failed => "failed",
        SubmitOutcome::Ignored => "ignored",
    }
}

fn print_json_outcome(
    outcome: &SubmitOutcome,
    notifier: &TerminalNotifier,
    navigator: &TerminalNavigator,
) -> Result<()> {
    let errors = match outcome {
        SubmitOutcome::Invalid(errors) => errors_json(errors),
        _ => serde_json::json!({}),
    };
    let output = serde_json::json!({
        "outcome": outcome_name(outcome),
        "errors": errors,
        "notification": notifier.latest().map(|n| n.message),
        "route": navigator.route(),
        "refreshed": navigator.refreshes() > 0,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
