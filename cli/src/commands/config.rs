use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::config::AlforgeConfig;
use crate::ui;

fn default_project_name() -> String {
    std::env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| "my-extension".to_string())
}

pub fn init(config_path: &str, name: Option<String>) -> Result<()> {
    let path = Path::new(config_path);

    if path.exists() {
        anyhow::bail!(
            "Configuration file already exists: {}\nUse a different path or remove the existing file.",
            path.display()
        );
    }

    ui::print_step("Initializing alforge project...");

    let config = AlforgeConfig::starter(&name.unwrap_or_else(default_project_name));
    let config_toml = toml::to_string_pretty(&config)?;
    fs::write(path, &config_toml)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    ui::print_success(&format!("Created {}", path.display()));
    println!();
    println!("{}", "Next steps:".bold());
    println!(
        "  1. Extract SymbolReference.json files into {}",
        config.symbols.paths.join(", ").cyan()
    );
    println!("  2. {} to verify your configuration", "alf config validate".cyan());
    println!("  3. {} to list the Dataverse entities", "alf entities".cyan());

    Ok(())
}

pub fn validate(config_path: &str) -> Result<()> {
    ui::print_step("Validating configuration...");

    let config = AlforgeConfig::load(config_path)
        .context("Failed to load configuration. Run `alf init` to create a configuration file.")?;

    ui::print_success("Configuration is valid!");
    println!();
    println!("  Project: {}", config.project.name.bold());
    println!("  Output: {}", config.project.output_dir);
    match config.generation.object_id {
        Some(id) => println!("  Object id: {}", id),
        None => println!("  Object id: {}", "proxy table id".dimmed()),
    }
    if config.generation.overwrite {
        ui::print_warning("Existing files will be overwritten");
    }

    println!();
    println!("  Symbols ({}):", config.symbols.paths.len());
    for dir in &config.symbols.paths {
        ui::print_item(dir);
    }

    Ok(())
}
