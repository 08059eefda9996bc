use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for alforge.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlforgeConfig {
    pub project: ProjectConfig,

    #[serde(default)]
    pub symbols: SymbolsConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_output_dir() -> String {
    "./generated".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SymbolsConfig {
    /// Directories holding extracted SymbolReference.json files
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationConfig {
    /// Id given to generated objects. Defaults to the proxy table's id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<u32>,

    #[serde(default)]
    pub overwrite: bool,
}

impl AlforgeConfig {
    /// Starter configuration written by `alf init`
    pub fn starter(name: &str) -> Self {
        Self {
            project: ProjectConfig {
                name: name.to_string(),
                output_dir: default_output_dir(),
            },
            symbols: SymbolsConfig {
                paths: vec!["./.alpackages/symbols".to_string()],
            },
            generation: GenerationConfig::default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AlforgeConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Try to load config, returning None if file doesn't exist
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            anyhow::bail!("Project name cannot be empty");
        }

        if self.symbols.paths.is_empty() {
            anyhow::bail!("At least one symbols path must be configured under [symbols]");
        }

        let mut seen = HashSet::new();
        for path in &self.symbols.paths {
            if !seen.insert(path.as_str()) {
                anyhow::bail!("Duplicate symbols path: {}", path);
            }
        }

        Ok(())
    }

    /// Symbol directories, relative paths resolved against `base`
    pub fn symbol_paths(&self, base: &Path) -> Vec<PathBuf> {
        self.symbols
            .paths
            .iter()
            .map(|p| resolve(base, p))
            .collect()
    }

    /// Get the output directory for generated files
    pub fn output_dir(&self, base: &Path) -> PathBuf {
        resolve(base, &self.project.output_dir)
    }
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_relative() {
        base.join(path)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> AlforgeConfig {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(
            r#"
[project]
name = "Contoso Sync"

[symbols]
paths = ["./.alpackages/symbols"]
"#,
        );
        assert_eq!(config.project.output_dir, "./generated");
        assert_eq!(config.generation.object_id, None);
        assert!(!config.generation.overwrite);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let mut config = AlforgeConfig::starter("Contoso Sync");
        config.symbols.paths.push("./.alpackages/symbols".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate symbols path"));

        config.symbols.paths.clear();
        assert!(config.validate().is_err());

        let config = AlforgeConfig::starter(" ");
        assert_eq!(config.validate().unwrap_err().to_string(), "Project name cannot be empty");
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let config = parse(
            r#"
[project]
name = "Contoso Sync"
output_dir = "src/generated"

[symbols]
paths = ["symbols", "/opt/bc/symbols"]

[generation]
object_id = 50100
overwrite = true
"#,
        );
        let base = Path::new("/work/app");
        assert_eq!(config.output_dir(base), PathBuf::from("/work/app/src/generated"));
        assert_eq!(
            config.symbol_paths(base),
            vec![PathBuf::from("/work/app/symbols"), PathBuf::from("/opt/bc/symbols")]
        );
        assert_eq!(config.generation.object_id, Some(50100));
        assert!(config.generation.overwrite);
    }

    #[test]
    fn test_load_optional_and_starter_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alforge.toml");
        assert!(AlforgeConfig::load_optional(&path).unwrap().is_none());

        let starter = AlforgeConfig::starter("Contoso Sync");
        fs::write(&path, toml::to_string_pretty(&starter).unwrap()).unwrap();
        let loaded = AlforgeConfig::load_optional(&path).unwrap().unwrap();
        assert_eq!(loaded.project.name, "Contoso Sync");
        assert_eq!(loaded.symbols.paths, vec!["./.alpackages/symbols"]);
    }
}
