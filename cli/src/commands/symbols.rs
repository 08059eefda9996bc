use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use alforge_symbols::{search_names, SymbolQuery};

use super::Session;
use crate::ui;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Keep the items whose name contains `filter`, case-insensitively.
fn filtered<T>(items: Vec<T>, filter: Option<&str>, name: impl Fn(&T) -> &str) -> Vec<T> {
    let Some(filter) = filter else {
        return items;
    };
    let keep: Vec<String> = search_names(items.iter().map(&name), filter)
        .into_iter()
        .map(str::to_string)
        .collect();
    items
        .into_iter()
        .filter(|item| keep.iter().any(|k| k == name(item)))
        .collect()
}

pub fn entities(session: &Session, filter: Option<&str>, json: bool) -> Result<()> {
    let symbols = session.load_symbols()?;
    let entities = filtered(symbols.dataverse_entities(), filter, |e| e.entity.as_str());

    if json {
        return print_json(&entities);
    }

    if entities.is_empty() {
        ui::print_warning("No Dataverse proxy tables found.");
        return Ok(());
    }

    ui::print_section(&format!("Dataverse entities ({})", entities.len()));
    for entity in &entities {
        println!(
            "  {} {} {}",
            entity.entity.green().bold(),
            entity.proxy_table,
            entity.publisher.dimmed()
        );
    }
    Ok(())
}

pub fn tables(session: &Session, filter: Option<&str>, json: bool) -> Result<()> {
    let symbols = session.load_symbols()?;
    let tables = filtered(symbols.tables_not_mapped_to_dataverse(), filter, |t| {
        t.name.as_str()
    });

    if json {
        return print_json(&tables);
    }

    if tables.is_empty() {
        ui::print_warning("No tables found.");
        return Ok(());
    }

    ui::print_section(&format!("Tables ({})", tables.len()));
    for table in &tables {
        println!("  {} {}", table.name.bold(), table.publisher.dimmed());
    }
    Ok(())
}

pub fn fields(session: &Session, table: &str, json: bool) -> Result<()> {
    let symbols = session.load_symbols()?;
    let fields = symbols.table_fields(table)?;

    if json {
        return print_json(&fields);
    }

    ui::print_section(&format!("Fields of {} ({})", table, fields.len()));
    for field in &fields {
        println!(
            "  {} {} {}",
            field.name.bold(),
            field.type_name.cyan(),
            field.publisher.dimmed()
        );
    }
    if let Some(key) = symbols.primary_key_field(table) {
        println!();
        ui::print_info(&format!("Primary key: {}", key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_order_and_matches_case_insensitively() {
        let names = vec!["Customer", "Vendor", "Customer Bank Account"];
        let kept = filtered(names.clone(), Some("customer"), |n| *n);
        assert_eq!(kept, vec!["Customer", "Customer Bank Account"]);
        assert_eq!(filtered(names.clone(), None, |n| *n), names);
    }
}
