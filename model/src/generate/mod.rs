//! Routines that turn symbol lookups into complete objects.
//!
//! Each routine asks the [`SymbolQuery`] for the facts it needs, converts
//! absent answers into [`GenerateError`]s and returns a validated object tree.

mod coupling;
mod list_page;
mod mapping;

pub use coupling::*;
pub use list_page::*;
pub use mapping::*;

use alforge_symbols::{page_type, source_table, PagePredicate, SymbolQuery};

use crate::error::GenerateError;
use crate::object::AlObject;

/// A Business Central table to be synchronized with a Dataverse proxy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouplingTarget {
    /// Dataverse entity logical name, e.g. `cdm_worker`.
    pub entity: String,
    pub bc_table: String,
    pub proxy_table: String,
    /// Id for the generated objects. Falls back to the proxy table's id.
    pub object_id: Option<u32>,
}

impl CouplingTarget {
    pub fn new(entity: &str, bc_table: &str, proxy_table: &str) -> Self {
        Self {
            entity: entity.to_string(),
            bc_table: bc_table.to_string(),
            proxy_table: proxy_table.to_string(),
            object_id: None,
        }
    }

    pub fn with_object_id(mut self, object_id: Option<u32>) -> Self {
        self.object_id = object_id;
        self
    }

    fn object_id(&self, symbols: &impl SymbolQuery) -> Result<u32, GenerateError> {
        object_id_for(symbols, &self.proxy_table, self.object_id)
    }
}

pub(crate) fn object_id_for(
    symbols: &impl SymbolQuery,
    proxy_table: &str,
    requested: Option<u32>,
) -> Result<u32, GenerateError> {
    requested
        .or_else(|| symbols.table_id(proxy_table))
        .ok_or_else(|| GenerateError::TableIdNotFound(proxy_table.to_string()))
}

/// First page of the given type whose source table is `table`.
pub(crate) fn page_on_table(symbols: &impl SymbolQuery, table: &str, kind: &str) -> Option<String> {
    let table_id = symbols.table_id(table);
    let on_table = source_table(table, table_id);
    let of_kind = page_type(kind);
    let predicates: [PagePredicate<'_>; 2] = [&on_table, &of_kind];
    symbols.find_page(&predicates)
}

/// Everything `alf map` writes: the mapping codeunit, the coupling table
/// extension and the page extension. The last two are skipped when they do
/// not apply.
pub fn map_tables(
    symbols: &impl SymbolQuery,
    target: &CouplingTarget,
    mappings: &[FieldMapping],
) -> Result<Vec<AlObject>, GenerateError> {
    let mut objects: Vec<AlObject> = vec![mapping_codeunit(symbols, target, mappings)?.into()];
    if let Some(table) = coupling_table_extension(symbols, target)? {
        objects.push(table.into());
    }
    if let Some(page) = card_page_extension(symbols, target)? {
        objects.push(page.into());
    }
    Ok(objects)
}
