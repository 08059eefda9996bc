use std::path::PathBuf;

use alforge_symbols::SymbolError;
use thiserror::Error;

use crate::object::ObjectKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error(
        "The name of the {kind} being created is {name} which is longer than the allowed limit of {limit} characters"
    )]
    NameTooLong {
        kind: ObjectKind,
        name: String,
        limit: usize,
    },
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("File {} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Symbols(#[from] SymbolError),

    #[error("No {kind} page based on the {table} table found")]
    PageNotFound { kind: &'static str, table: String },

    #[error("No id found for table {0}")]
    TableIdNotFound(String),

    #[error("No primary key found on table {0}")]
    PrimaryKeyNotFound(String),

    #[error("Invalid field mappings: {0}")]
    InvalidMappings(String),
}
