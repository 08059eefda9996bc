//! # alforge
//!
//! Generate Business Central AL objects that couple tables with Dataverse
//! proxy tables.
//!
//! ## Features
//!
//! - **`model`** (default) - AL object model, serializer and generation routines
//! - **`symbols`** (default) - Symbol metadata index for compiled packages
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! alforge = "0.3"
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use alforge::prelude::*;
//!
//! let symbols = SymbolIndex::load_dir("./.alpackages/symbols")?;
//! let page = generate::list_page(&symbols, "cdm_worker", "CDS Worker", None)?;
//! write_object(&page.into(), Path::new("./generated"), false)?;
//! ```

// Re-export the object model and generation routines
#[cfg(feature = "model")]
pub use alforge_model as model;

// Re-export the symbol index
#[cfg(feature = "symbols")]
pub use alforge_symbols as symbols;

/// Prelude module for convenient imports
pub mod prelude {
    #[cfg(feature = "model")]
    pub use alforge_model::{
        generate::{self, CouplingTarget, FieldMapping, MappingSource, SyncDirection},
        write_object, AlObject, Codeunit, GenerateError, ModelError, ObjectKind, Page,
        Property, PropertyKind, Render, Table, WriteError,
    };

    #[cfg(feature = "symbols")]
    pub use alforge_symbols::{SymbolError, SymbolIndex, SymbolQuery};
}

#[cfg(all(test, feature = "model"))]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_builds_objects() {
        let codeunit = Codeunit::new(50100, "Sync Helper").unwrap();
        let object: AlObject = codeunit.into();
        assert_eq!(object.kind(), ObjectKind::Codeunit);
        assert_eq!(object.file_name(), "SyncHelper.codeunit.al");
    }
}
