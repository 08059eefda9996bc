//! SymbolReference.json parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SymbolError;
use crate::types::SymbolReference;

/// Extension of the extracted symbol files.
pub const SYMBOL_FILE_EXTENSION: &str = "json";

pub fn parse_symbol_file<P: AsRef<Path>>(path: P) -> Result<SymbolReference, SymbolError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| SymbolError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_symbol_content(&content, path)
}

/// Parse the JSON text of a symbol file. `origin` is only used in errors.
pub fn parse_symbol_content(content: &str, origin: &Path) -> Result<SymbolReference, SymbolError> {
    // Extracted files start with a BOM and sometimes a newline.
    let trimmed = content.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(SymbolError::Empty {
            path: origin.to_path_buf(),
        });
    }

    let mut symbols: SymbolReference =
        serde_json::from_str(trimmed).map_err(|source| SymbolError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
    symbols.flatten_namespaces();
    Ok(symbols)
}

/// Every `*.json` file below `dir`, sorted so loading order is reproducible.
pub fn find_symbol_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, SymbolError> {
    let mut found = Vec::new();
    let mut pending = vec![dir.as_ref().to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = fs::read_dir(&current).map_err(|source| SymbolError::Read {
            path: current.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| SymbolError::Read {
                path: current.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(SYMBOL_FILE_EXTENSION))
            {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}
