use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use alforge_model::generate::{self, CouplingTarget, FieldMapping};
use alforge_model::text::LINE_TERMINATOR;
use alforge_model::{write_object, AlObject};
use alforge_symbols::SymbolQuery;

use super::Session;
use crate::ui;

/// Where generated objects go.
pub struct OutputOptions {
    pub output: Option<PathBuf>,
    pub force: bool,
    pub stdout: bool,
}

/// Contents of a mappings file: one `[[field]]` table per mapped field.
#[derive(Debug, Deserialize)]
struct MappingsFile {
    #[serde(default, rename = "field")]
    fields: Vec<FieldMapping>,
}

fn load_mappings(path: &Path) -> Result<Vec<FieldMapping>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read mappings file: {}", path.display()))?;
    let file: MappingsFile = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse mappings file: {}", path.display()))?;
    Ok(file.fields)
}

/// The proxy table Dataverse binds to `entity`.
fn proxy_table_for(symbols: &impl SymbolQuery, entity: &str) -> Result<String> {
    symbols
        .dataverse_entities()
        .into_iter()
        .find(|e| e.entity.eq_ignore_ascii_case(entity))
        .map(|e| e.proxy_table)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No proxy table found for Dataverse entity '{}'\nRun `alf entities` to list the available entities.",
                entity
            )
        })
}

/// Source text of every object, each terminated and separated by a blank line.
fn stdout_text(objects: &[AlObject]) -> String {
    objects
        .iter()
        .map(|object| format!("{}{}", object.serialize(), LINE_TERMINATOR))
        .collect::<Vec<_>>()
        .join(LINE_TERMINATOR)
}

fn emit(session: &Session, objects: &[AlObject], options: &OutputOptions) -> Result<()> {
    if options.stdout {
        print!("{}", stdout_text(objects));
        return Ok(());
    }

    let dir = session.output_dir(options.output.clone());
    let overwrite = session.overwrite(options.force);
    for object in objects {
        let path = write_object(object, &dir, overwrite).with_context(|| {
            format!("Failed to write {} {}", object.kind(), object.name())
        })?;
        ui::print_success(&format!("Created {}", path.display()));
    }
    Ok(())
}

pub fn list_page(
    session: &Session,
    entity: &str,
    object_id: Option<u32>,
    options: &OutputOptions,
) -> Result<()> {
    let symbols = session.load_symbols()?;
    let proxy_table = proxy_table_for(&symbols, entity)?;

    if !options.stdout {
        ui::print_step(&format!("Generating list page for {}...", proxy_table));
    }
    let page = generate::list_page(&symbols, entity, &proxy_table, session.object_id(object_id))?;

    emit(session, &[AlObject::from(page)], options)
}

pub fn map(
    session: &Session,
    entity: &str,
    table: &str,
    mappings_path: &Path,
    object_id: Option<u32>,
    options: &OutputOptions,
) -> Result<()> {
    let mappings = load_mappings(mappings_path)?;
    let symbols = session.load_symbols()?;
    let proxy_table = proxy_table_for(&symbols, entity)?;

    if !options.stdout {
        ui::print_step(&format!(
            "Mapping {} to {} ({} field mappings)...",
            table,
            proxy_table,
            mappings.len()
        ));
    }

    let target = CouplingTarget::new(entity, table, &proxy_table)
        .with_object_id(session.object_id(object_id));
    let objects = generate::map_tables(&symbols, &target, &mappings)?;

    if objects.len() < 3 && !options.stdout {
        ui::print_info("Some objects were skipped. Run with --verbose for details.");
    }
    emit(session, &objects, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alforge_model::generate::{MappingSource, SyncDirection};
    use alforge_model::{Codeunit, Table, BANNER};

    #[test]
    fn test_stdout_text_keeps_objects_apart() {
        let objects: Vec<AlObject> = vec![
            Codeunit::new(50100, "Worker Map").unwrap().into(),
            Table::extension(50100, "Customer Ext", "Customer").unwrap().into(),
        ];
        let text = stdout_text(&objects);

        assert!(text.ends_with("}\r\n"));
        assert!(text.split("\r\n").all(|line| !line.starts_with("}//")));
        assert!(text.contains(&format!("}}\r\n\r\n{}\r\n", BANNER[0])));
        assert_eq!(text.matches(BANNER[0]).count(), 2);

        let single = stdout_text(&objects[..1]);
        assert_eq!(single, format!("{}\r\n", objects[0].serialize()));
    }

    #[test]
    fn test_mappings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.toml");
        fs::write(
            &path,
            r#"
[[field]]
bc_field = "Name"
value = "cdm_FirstName"

[[field]]
bc_field = "City"
source = "proxy-field"
value = "cdm_LastName"
direction = "to-bc"

[[field]]
bc_field = "No."
source = "constant"
value = "WRK"
"#,
        )
        .unwrap();

        let mappings = load_mappings(&path).unwrap();
        assert_eq!(mappings.len(), 3);
        assert_eq!(mappings[0].source, MappingSource::ProxyField);
        assert_eq!(mappings[0].direction, SyncDirection::Both);
        assert_eq!(mappings[1].direction, SyncDirection::ToBc);
        assert_eq!(mappings[2].source, MappingSource::Constant);
    }

    #[test]
    fn test_mappings_file_rejects_unknown_direction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.toml");
        fs::write(
            &path,
            "[[field]]\nbc_field = \"Name\"\nvalue = \"cdm_FirstName\"\ndirection = \"sideways\"\n",
        )
        .unwrap();

        let err = load_mappings(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse mappings file"));
    }
}
