//! Core type definitions for SymbolReference.json
//!
//! Only the parts of the symbol file the generators query are modelled; every
//! other key is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// Root of one package's `SymbolReference.json`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SymbolReference {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub tables: Vec<TableSymbol>,
    #[serde(default)]
    pub table_extensions: Vec<TableExtensionSymbol>,
    #[serde(default)]
    pub pages: Vec<PageSymbol>,
    /// Newer compilers group objects by namespace; these nest arbitrarily.
    #[serde(default)]
    pub namespaces: Vec<NamespaceSymbol>,
}

impl SymbolReference {
    pub fn app(&self) -> AppInfo {
        AppInfo {
            app_id: self.app_id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }

    /// Move every object declared inside namespaces up to the root lists.
    pub fn flatten_namespaces(&mut self) {
        let mut pending = std::mem::take(&mut self.namespaces);
        while let Some(ns) = pending.pop() {
            self.tables.extend(ns.tables);
            self.table_extensions.extend(ns.table_extensions);
            self.pages.extend(ns.pages);
            pending.extend(ns.namespaces);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NamespaceSymbol {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tables: Vec<TableSymbol>,
    #[serde(default)]
    pub table_extensions: Vec<TableExtensionSymbol>,
    #[serde(default)]
    pub pages: Vec<PageSymbol>,
    #[serde(default)]
    pub namespaces: Vec<NamespaceSymbol>,
}

/// The package an object was declared in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppInfo {
    pub app_id: String,
    pub name: String,
    pub publisher: String,
}

impl std::fmt::Display for AppInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.name, self.publisher)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PropertySymbol {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Anything that carries a `Properties` array.
pub trait HasProperties {
    fn properties(&self) -> &[PropertySymbol];

    fn property(&self, name: &str) -> Option<&str> {
        self.properties()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// True when the property exists and, if `expected` is given, matches it
    /// case-insensitively.
    fn property_matches(&self, name: &str, expected: Option<&str>) -> bool {
        match (self.property(name), expected) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(value), Some(expected)) => value.eq_ignore_ascii_case(expected),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TypeDefinition {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldSymbol {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub type_definition: TypeDefinition,
    #[serde(default)]
    pub properties: Vec<PropertySymbol>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySymbol {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub field_names: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableSymbol {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertySymbol>,
    #[serde(default)]
    pub fields: Vec<FieldSymbol>,
    #[serde(default)]
    pub keys: Vec<KeySymbol>,
}

impl TableSymbol {
    /// First field of the first key.
    pub fn primary_key_field(&self) -> Option<&str> {
        self.keys
            .first()
            .and_then(|key| key.field_names.first())
            .map(String::as_str)
    }
}

impl HasProperties for TableSymbol {
    fn properties(&self) -> &[PropertySymbol] {
        &self.properties
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableExtensionSymbol {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub target_object: String,
    #[serde(default)]
    pub fields: Vec<FieldSymbol>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageSymbol {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertySymbol>,
}

impl HasProperties for PageSymbol {
    fn properties(&self) -> &[PropertySymbol] {
        &self.properties
    }
}

/// A field as reported by [`crate::SymbolQuery::table_fields`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub name: String,
    pub type_name: String,
    pub publisher: String,
}

/// An object name together with the package that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectSummary {
    pub name: String,
    pub publisher: String,
}

/// A proxy table bound to a Dataverse entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataverseEntity {
    pub entity: String,
    pub proxy_table: String,
    pub publisher: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_nested_namespaces() {
        let json = r#"{
            "Name": "Base Application",
            "Publisher": "Microsoft",
            "Tables": [{ "Id": 18, "Name": "Customer" }],
            "Namespaces": [
                {
                    "Name": "Microsoft",
                    "Namespaces": [
                        {
                            "Name": "Sales",
                            "Tables": [{ "Id": 36, "Name": "Sales Header" }],
                            "Pages": [{ "Id": 21, "Name": "Customer Card" }]
                        }
                    ]
                }
            ]
        }"#;
        let mut symbols: SymbolReference = serde_json::from_str(json).unwrap();
        symbols.flatten_namespaces();

        assert!(symbols.namespaces.is_empty());
        assert_eq!(symbols.tables.len(), 2);
        assert_eq!(symbols.pages.len(), 1);
        assert_eq!(symbols.tables[1].name, "Sales Header");
    }

    #[test]
    fn test_property_matches_is_case_insensitive() {
        let table = TableSymbol {
            id: 50100,
            name: "CDS Worker".to_string(),
            properties: vec![PropertySymbol {
                name: "TableType".to_string(),
                value: "CDS".to_string(),
            }],
            ..Default::default()
        };

        assert!(table.property_matches("TableType", Some("cds")));
        assert!(table.property_matches("TableType", None));
        assert!(!table.property_matches("ExternalName", None));
    }

    #[test]
    fn test_primary_key_field() {
        let table = TableSymbol {
            id: 50100,
            name: "CDS Worker".to_string(),
            keys: vec![KeySymbol {
                name: "PK".to_string(),
                field_names: vec!["workerId".to_string(), "name".to_string()],
            }],
            ..Default::default()
        };
        assert_eq!(table.primary_key_field(), Some("workerId"));
        assert_eq!(TableSymbol::default().primary_key_field(), None);
    }

    #[test]
    fn test_app_display() {
        let app = AppInfo {
            app_id: "437dbf0e".to_string(),
            name: "Base Application".to_string(),
            publisher: "Microsoft".to_string(),
        };
        assert_eq!(app.to_string(), "Base Application [Microsoft]");
    }
}
