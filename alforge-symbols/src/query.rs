//! The lookup contract generation routines depend on.

use crate::error::SymbolError;
use crate::types::{DataverseEntity, FieldInfo, HasProperties, ObjectSummary, PageSymbol};

/// Property names the queries look at.
pub mod property {
    pub const EXTERNAL_NAME: &str = "ExternalName";
    pub const PAGE_TYPE: &str = "PageType";
    pub const SOURCE_TABLE: &str = "SourceTable";
    pub const TABLE_TYPE: &str = "TableType";
}

/// `TableType` value marking a Dataverse proxy table.
pub const DATAVERSE_TABLE_TYPE: &str = "CDS";

/// A test over a page's symbol.
pub type PagePredicate<'a> = &'a dyn Fn(&PageSymbol) -> bool;

/// Read-only questions about previously compiled packages.
///
/// Every call is a synchronous lookup against data that is already loaded.
pub trait SymbolQuery {
    /// Fields of `table` followed by the fields every table extension adds to it.
    fn table_fields(&self, table: &str) -> Result<Vec<FieldInfo>, SymbolError>;

    fn primary_key_field(&self, table: &str) -> Option<String>;

    fn table_id(&self, table: &str) -> Option<u32>;

    /// Name of the first page, in a stable order, that satisfies every predicate.
    fn find_page(&self, predicates: &[PagePredicate<'_>]) -> Option<String>;

    fn tables_not_mapped_to_dataverse(&self) -> Vec<ObjectSummary>;

    fn dataverse_entities(&self) -> Vec<DataverseEntity>;
}

/// Matches pages whose `PageType` equals `expected`.
pub fn page_type(expected: &str) -> impl Fn(&PageSymbol) -> bool + '_ {
    move |page| page.property_matches(property::PAGE_TYPE, Some(expected))
}

/// Matches pages whose `SourceTable` names `table` or, when known, its id.
pub fn source_table(table: &str, table_id: Option<u32>) -> impl Fn(&PageSymbol) -> bool + '_ {
    move |page| {
        if page.property_matches(property::SOURCE_TABLE, Some(table)) {
            return true;
        }
        table_id.is_some_and(|id| {
            page.property_matches(property::SOURCE_TABLE, Some(&id.to_string()))
        })
    }
}
