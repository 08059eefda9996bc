//! Symbol metadata for alforge
//!
//! This crate reads the `SymbolReference.json` files extracted from compiled
//! Business Central packages and answers the lookups code generation needs:
//! table fields, primary keys, object ids and pages bound to a table.

pub mod error;
pub mod index;
pub mod parse;
pub mod query;
pub mod search;
pub mod types;

pub use error::*;
pub use index::*;
pub use query::*;
pub use search::*;
pub use types::*;
