//! Offline draft validation.

use std::path::Path;

use anyhow::{Result, bail};
use console::style;

use buddy_core::presentation::field_spec;
use buddy_core::validation::validate;
use buddy_infra::filesystem::load_draft;

use super::errors_json;

/// Run the companion schema against a draft file. Never touches the network.
pub async fn validate_draft(path: &Path, json: bool) -> Result<()> {
    let draft = load_draft(path).await?;

    let result = validate(&draft);

    if json {
        let errors = match &result {
            Ok(()) => serde_json::json!({}),
            Err(errors) => errors_json(errors),
        };
        let output = serde_json::json!({
            "valid": result.is_ok(),
            "errors": errors,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    match result {
        Ok(()) => {
            if !json {
                println!();
                println!("  {} Draft is valid.", style("✓").green().bold());
                println!();
            }
            Ok(())
        }
        Err(errors) => {
            if !json {
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
            bail!("draft is invalid ({} field(s))", errors.len())
        }
    }
}
