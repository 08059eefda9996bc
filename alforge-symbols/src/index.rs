//! In-memory index over the symbols of many packages.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::SymbolError;
use crate::parse::{find_symbol_files, parse_symbol_file};
use crate::query::{property, PagePredicate, SymbolQuery, DATAVERSE_TABLE_TYPE};
use crate::search::suggest_similar;
use crate::types::{
    AppInfo, DataverseEntity, FieldInfo, FieldSymbol, HasProperties, ObjectSummary, PageSymbol,
    SymbolReference, TableExtensionSymbol, TableSymbol,
};

const MAX_SUGGESTION_DISTANCE: usize = 3;

/// An indexed object and the package that declares it.
#[derive(Debug, Clone)]
pub struct Declared<T> {
    pub body: T,
    pub app: AppInfo,
}

/// Tables, table extensions and pages keyed by name.
///
/// Keys are ordered, so every "first match" lookup is stable across runs.
/// When two packages declare an object with the same name the one loaded last
/// wins.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    tables: BTreeMap<String, Declared<TableSymbol>>,
    table_extensions: BTreeMap<String, Declared<TableExtensionSymbol>>,
    pages: BTreeMap<String, Declared<PageSymbol>>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_references(references: impl IntoIterator<Item = SymbolReference>) -> Self {
        let mut index = Self::new();
        for reference in references {
            index.add(reference);
        }
        index.log_summary();
        index
    }

    /// Load every symbol file found under `dir`.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, SymbolError> {
        Self::load_dirs(std::iter::once(dir))
    }

    pub fn load_dirs<P: AsRef<Path>>(
        dirs: impl IntoIterator<Item = P>,
    ) -> Result<Self, SymbolError> {
        let mut index = Self::new();
        for dir in dirs {
            let dir = dir.as_ref();
            let files = find_symbol_files(dir)?;
            if files.is_empty() {
                return Err(SymbolError::NoSymbols {
                    path: dir.to_path_buf(),
                });
            }
            for file in files {
                debug!(path = %file.display(), "Reading symbols");
                index.add(parse_symbol_file(&file)?);
            }
        }
        index.log_summary();
        Ok(index)
    }

    pub fn add(&mut self, mut reference: SymbolReference) {
        reference.flatten_namespaces();
        let app = reference.app();
        for table in reference.tables {
            self.tables.insert(
                table.name.clone(),
                Declared {
                    body: table,
                    app: app.clone(),
                },
            );
        }
        for ext in reference.table_extensions {
            self.table_extensions.insert(
                ext.name.clone(),
                Declared {
                    body: ext,
                    app: app.clone(),
                },
            );
        }
        for page in reference.pages {
            self.pages.insert(
                page.name.clone(),
                Declared {
                    body: page,
                    app: app.clone(),
                },
            );
        }
    }

    fn log_summary(&self) {
        info!(
            "Discovered {} tables, {} pages and {} table extensions",
            self.tables.len(),
            self.pages.len(),
            self.table_extensions.len()
        );
    }

    pub fn table(&self, name: &str) -> Option<&Declared<TableSymbol>> {
        self.tables.get(name)
    }

    pub fn page(&self, name: &str) -> Option<&Declared<PageSymbol>> {
        self.pages.get(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn page_names(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.pages.is_empty() && self.table_extensions.is_empty()
    }

    fn table_or_suggest(&self, name: &str) -> Result<&Declared<TableSymbol>, SymbolError> {
        self.tables.get(name).ok_or_else(|| {
            let candidates: Vec<&str> = self.table_names().collect();
            SymbolError::NotFound {
                kind: "table",
                name: name.to_string(),
                suggestions: suggest_similar(name, &candidates, MAX_SUGGESTION_DISTANCE),
            }
        })
    }

    fn is_dataverse_table(table: &TableSymbol) -> bool {
        table.property_matches(property::TABLE_TYPE, Some(DATAVERSE_TABLE_TYPE))
    }
}

fn push_fields(out: &mut Vec<FieldInfo>, fields: &[FieldSymbol], publisher: &str) {
    out.extend(fields.iter().map(|field| FieldInfo {
        name: field.name.clone(),
        type_name: field.type_definition.name.clone(),
        publisher: publisher.to_string(),
    }));
}

impl SymbolQuery for SymbolIndex {
    fn table_fields(&self, table: &str) -> Result<Vec<FieldInfo>, SymbolError> {
        let declared = self.table_or_suggest(table)?;
        let mut result = Vec::new();
        push_fields(&mut result, &declared.body.fields, &declared.app.to_string());

        for ext in self.table_extensions.values() {
            if ext.body.target_object.eq_ignore_ascii_case(table) {
                push_fields(&mut result, &ext.body.fields, &ext.app.to_string());
            }
        }
        Ok(result)
    }

    fn primary_key_field(&self, table: &str) -> Option<String> {
        self.tables
            .get(table)
            .and_then(|t| t.body.primary_key_field())
            .map(str::to_string)
    }

    fn table_id(&self, table: &str) -> Option<u32> {
        self.tables.get(table).map(|t| t.body.id)
    }

    fn find_page(&self, predicates: &[PagePredicate<'_>]) -> Option<String> {
        self.pages
            .iter()
            .find(|(_, page)| predicates.iter().all(|pred| pred(&page.body)))
            .map(|(name, _)| name.clone())
    }

    fn tables_not_mapped_to_dataverse(&self) -> Vec<ObjectSummary> {
        self.tables
            .iter()
            .filter(|(_, t)| !Self::is_dataverse_table(&t.body))
            .map(|(name, t)| ObjectSummary {
                name: name.clone(),
                publisher: t.app.to_string(),
            })
            .collect()
    }

    fn dataverse_entities(&self) -> Vec<DataverseEntity> {
        self.tables
            .iter()
            .filter(|(_, t)| Self::is_dataverse_table(&t.body))
            .filter_map(|(name, t)| {
                t.body
                    .property(property::EXTERNAL_NAME)
                    .map(|entity| DataverseEntity {
                        entity: entity.to_string(),
                        proxy_table: name.clone(),
                        publisher: t.app.to_string(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{page_type, source_table};

    fn reference(json: &str) -> SymbolReference {
        serde_json::from_str(json).unwrap()
    }

    fn sample_index() -> SymbolIndex {
        let base = reference(
            r#"{
                "AppId": "base",
                "Name": "Base Application",
                "Publisher": "Microsoft",
                "Tables": [
                    {
                        "Id": 5200,
                        "Name": "Employee",
                        "Fields": [
                            { "Id": 1, "Name": "No.", "TypeDefinition": { "Name": "Code" } },
                            { "Id": 2, "Name": "First Name", "TypeDefinition": { "Name": "Text" } }
                        ],
                        "Keys": [{ "Name": "Key1", "FieldNames": ["No."] }]
                    }
                ],
                "Pages": [
                    { "Id": 5200, "Name": "Employee Card", "Properties": [
                        { "Name": "PageType", "Value": "Card" },
                        { "Name": "SourceTable", "Value": "5200" }
                    ]},
                    { "Id": 5201, "Name": "Employee List", "Properties": [
                        { "Name": "PageType", "Value": "List" },
                        { "Name": "SourceTable", "Value": "Employee" }
                    ]}
                ]
            }"#,
        );
        let ext = reference(
            r#"{
                "AppId": "ext",
                "Name": "Dataverse Workers",
                "Publisher": "Contoso",
                "Tables": [
                    {
                        "Id": 50100,
                        "Name": "CDS Worker",
                        "Properties": [
                            { "Name": "TableType", "Value": "CDS" },
                            { "Name": "ExternalName", "Value": "cdm_worker" }
                        ],
                        "Fields": [
                            { "Id": 1, "Name": "cdm_workerId", "TypeDefinition": { "Name": "Guid" } }
                        ],
                        "Keys": [{ "Name": "PK", "FieldNames": ["cdm_workerId"] }]
                    }
                ],
                "TableExtensions": [
                    {
                        "Id": 50100,
                        "Name": "Employee Ext",
                        "TargetObject": "employee",
                        "Fields": [
                            { "Id": 50100, "Name": "Coupled to CRM", "TypeDefinition": { "Name": "Boolean" } }
                        ]
                    }
                ]
            }"#,
        );
        SymbolIndex::from_references([base, ext])
    }

    #[test]
    fn test_table_fields_include_extension_fields() {
        let index = sample_index();
        let fields = index.table_fields("Employee").unwrap();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "No.");
        assert_eq!(fields[0].publisher, "Base Application [Microsoft]");
        assert_eq!(fields[2].name, "Coupled to CRM");
        assert_eq!(fields[2].type_name, "Boolean");
        assert_eq!(fields[2].publisher, "Dataverse Workers [Contoso]");
    }

    #[test]
    fn test_table_fields_unknown_table_suggests() {
        let index = sample_index();
        let err = index.table_fields("Employe").unwrap_err();
        match err {
            SymbolError::NotFound { suggestions, .. } => {
                assert_eq!(suggestions[0].candidate, "Employee");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_primary_key_and_id() {
        let index = sample_index();
        assert_eq!(index.primary_key_field("CDS Worker").as_deref(), Some("cdm_workerId"));
        assert_eq!(index.table_id("CDS Worker"), Some(50100));
        assert_eq!(index.table_id("Missing"), None);
        assert_eq!(index.primary_key_field("Missing"), None);
    }

    #[test]
    fn test_find_page_by_source_table_id_and_type() {
        let index = sample_index();
        let on_employee = source_table("Employee", index.table_id("Employee"));
        let card = page_type("Card");
        let list = page_type("List");

        assert_eq!(
            index.find_page(&[&on_employee, &card]).as_deref(),
            Some("Employee Card")
        );
        assert_eq!(
            index.find_page(&[&on_employee, &list]).as_deref(),
            Some("Employee List")
        );
        assert_eq!(index.find_page(&[&page_type("Worksheet")]), None);
    }

    #[test]
    fn test_find_page_without_predicates_returns_first_by_name() {
        let index = sample_index();
        assert_eq!(index.find_page(&[]).as_deref(), Some("Employee Card"));
    }

    #[test]
    fn test_dataverse_partition() {
        let index = sample_index();

        let entities = index.dataverse_entities();
        assert_eq!(
            entities,
            vec![DataverseEntity {
                entity: "cdm_worker".to_string(),
                proxy_table: "CDS Worker".to_string(),
                publisher: "Dataverse Workers [Contoso]".to_string(),
            }]
        );

        let unmapped: Vec<String> = index
            .tables_not_mapped_to_dataverse()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(unmapped, vec!["Employee".to_string()]);
    }
}
