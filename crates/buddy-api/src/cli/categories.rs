//! Category listing.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use buddy_core::presentation::category_options;
use buddy_infra::filesystem::load_categories;

/// Print the selectable category options in backend order.
pub async fn list_categories(path: &Path, json: bool) -> Result<()> {
    let categories = load_categories(path).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    if categories.is_empty() {
        println!();
        println!("  {}", style("No categories found.").dim());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Category").fg(Color::White),
        Cell::new("Id").fg(Color::White),
    ]);

    for option in category_options(&categories) {
        table.add_row(vec![Cell::new(option.label).fg(Color::Cyan), Cell::new(option.value)]);
    }

    println!("{table}");
    Ok(())
}
