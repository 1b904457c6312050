use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use icpcmap_core::MatcherConfig;
use icpcmap_terminology::{LocalRegistryConfig, SuggestConfig, TerminologyConfig};
use serde::{Deserialize, Serialize};

/// Contents of `config.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: Option<String>,
    pub matcher: MatcherConfig,
    pub registry: RegistrySection,
    pub terminology: TerminologyConfig,
    pub suggest: SuggestConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySection {
    /// Local ICPC-2 registry JSON file
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(flatten)]
    pub search: LocalRegistryConfig,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("icpcmap").join("config.toml"))
}

/// Load configuration.
///
/// An explicit path must exist; the default location is optional.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig> {
    match explicit {
        Some(path) => load_file(path),
        None => match default_config_path() {
            Some(path) if path.exists() => load_file(&path),
            _ => Ok(AppConfig::default()),
        },
    }
}

fn load_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Registry file from the command line, falling back to the config file.
pub fn resolve_registry(cli_registry: Option<&Path>, config: &AppConfig) -> Result<PathBuf> {
    if let Some(path) = cli_registry {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = &config.registry.path {
        return Ok(path.clone());
    }
    anyhow::bail!("No registry file configured. Use --registry or set registry.path in the config file")
}
