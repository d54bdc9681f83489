//! Form layout and example content.

use anyhow::Result;
use console::style;

use buddy_core::presentation::{PREAMBLE, SECTIONS, SEED_CHAT, field_spec};
use buddy_core::validation::MIN_PROMPT_CHARS;

/// Print the form sections, field help, and example instructions/conversation.
pub fn print_template(json: bool) -> Result<()> {
    if json {
        let sections: Vec<serde_json::Value> = SECTIONS
            .iter()
            .map(|section| {
                let fields: Vec<serde_json::Value> = section
                    .fields
                    .iter()
                    .map(|field| {
                        let spec = field_spec(*field);
                        serde_json::json!({
                            "field": field.as_str(),
                            "label": spec.label,
                            "help": spec.help,
                            "placeholder": spec.placeholder,
                        })
                    })
                    .collect();
                serde_json::json!({
                    "title": section.title,
                    "description": section.description,
                    "fields": fields,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    for section in &SECTIONS {
        println!();
        println!("  {}", style(section.title).bold().underlined());
        println!("  {}", style(section.description).dim());
        for field in section.fields {
            let spec = field_spec(*field);
            println!();
            println!("  {} ({})", style(spec.label).cyan().bold(), field.as_str());
            println!("  {}", style(spec.help).dim());
            if !spec.multiline {
                println!("  e.g. {}", spec.placeholder);
            }
        }
    }

    println!();
    println!(
        "  {}",
        style(format!("Instructions and the example conversation need at least {MIN_PROMPT_CHARS} characters each.")).yellow()
    );
    println!();
    println!("  {}", style("Example instructions").bold());
    println!();
    println!("{PREAMBLE}");
    println!();
    println!("  {}", style("Example conversation").bold());
    println!();
    println!("{SEED_CHAT}");
    println!();
    Ok(())
}
