//! Error types for symbol loading and lookup operations

use std::path::PathBuf;

use thiserror::Error;

use crate::search::Suggestion;

#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("Failed to read symbol file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse symbol file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Symbol file {} is empty", path.display())]
    Empty { path: PathBuf },

    #[error("No symbol files found under {}", path.display())]
    NoSymbols { path: PathBuf },

    #[error("Not found: {kind} '{name}'{}", did_you_mean(suggestions))]
    NotFound {
        kind: &'static str,
        name: String,
        suggestions: Vec<Suggestion>,
    },
}

fn did_you_mean(suggestions: &[Suggestion]) -> String {
    match suggestions.first() {
        Some(s) => format!(". Did you mean: {}?", s.candidate),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_mentions_closest_suggestion() {
        let err = SymbolError::NotFound {
            kind: "table",
            name: "Custmer".to_string(),
            suggestions: vec![Suggestion {
                candidate: "Customer".to_string(),
                distance: 1,
            }],
        };
        assert_eq!(
            err.to_string(),
            "Not found: table 'Custmer'. Did you mean: Customer?"
        );
    }

    #[test]
    fn test_not_found_without_suggestions() {
        let err = SymbolError::NotFound {
            kind: "table",
            name: "Xyz".to_string(),
            suggestions: vec![],
        };
        assert_eq!(err.to_string(), "Not found: table 'Xyz'");
    }
}
