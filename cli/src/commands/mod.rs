pub mod config;
pub mod generate;
pub mod symbols;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use alforge_symbols::SymbolIndex;

use crate::config::AlforgeConfig;
use crate::ui;

/// Configuration plus command-line overrides shared by every command that
/// reads symbols.
pub struct Session {
    config: Option<AlforgeConfig>,
    base_dir: PathBuf,
    symbol_overrides: Vec<PathBuf>,
}

impl Session {
    pub fn open(config_path: &str, symbol_overrides: Vec<PathBuf>) -> Result<Self> {
        let config = AlforgeConfig::load_optional(config_path)?;
        if config.is_none() {
            tracing::debug!("No configuration found at {}", config_path);
        }

        let base_dir = Path::new(config_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();

        Ok(Self {
            config,
            base_dir,
            symbol_overrides,
        })
    }

    fn symbol_paths(&self) -> Result<Vec<PathBuf>> {
        if !self.symbol_overrides.is_empty() {
            return Ok(self.symbol_overrides.clone());
        }
        match &self.config {
            Some(config) => Ok(config.symbol_paths(&self.base_dir)),
            None => anyhow::bail!(
                "No symbols configured.\nPass --symbols <DIR> or run `alf init` to create alforge.toml."
            ),
        }
    }

    /// Index every symbol file under the configured directories.
    pub fn load_symbols(&self) -> Result<SymbolIndex> {
        let paths = self.symbol_paths()?;
        let spinner = ui::create_spinner("Reading symbols...");
        let index = SymbolIndex::load_dirs(&paths);
        spinner.finish_and_clear();

        let listed = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        index.with_context(|| format!("Failed to load symbols from {}", listed))
    }

    pub fn output_dir(&self, override_dir: Option<PathBuf>) -> PathBuf {
        if let Some(dir) = override_dir {
            return dir;
        }
        self.config
            .as_ref()
            .map(|c| c.output_dir(&self.base_dir))
            .unwrap_or_else(|| self.base_dir.join("generated"))
    }

    pub fn object_id(&self, override_id: Option<u32>) -> Option<u32> {
        override_id.or_else(|| self.config.as_ref().and_then(|c| c.generation.object_id))
    }

    pub fn overwrite(&self, force: bool) -> bool {
        force || self.config.as_ref().is_some_and(|c| c.generation.overwrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_command_line_wins_over_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alforge.toml");
        fs::write(
            &path,
            r#"
[project]
name = "Contoso Sync"
output_dir = "out"

[symbols]
paths = ["symbols"]

[generation]
object_id = 50100
overwrite = true
"#,
        )
        .unwrap();

        let session = Session::open(path.to_str().unwrap(), vec![]).unwrap();
        assert_eq!(session.output_dir(None), dir.path().join("out"));
        assert_eq!(session.output_dir(Some("elsewhere".into())), PathBuf::from("elsewhere"));
        assert_eq!(session.object_id(None), Some(50100));
        assert_eq!(session.object_id(Some(50300)), Some(50300));
        assert!(session.overwrite(false));
        assert_eq!(session.symbol_paths().unwrap(), vec![dir.path().join("symbols")]);

        let session = Session::open(path.to_str().unwrap(), vec!["cli-symbols".into()]).unwrap();
        assert_eq!(session.symbol_paths().unwrap(), vec![PathBuf::from("cli-symbols")]);
    }

    #[test]
    fn test_missing_config_needs_symbols_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alforge.toml");
        let session = Session::open(path.to_str().unwrap(), vec![]).unwrap();
        assert!(session.symbol_paths().is_err());
        assert!(!session.overwrite(false));
        assert_eq!(session.object_id(None), None);
    }
}
