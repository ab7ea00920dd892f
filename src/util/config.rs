//! Configuration file support for Multitarget.
//!
//! Two configuration file locations are supported:
//! - Global: `~/.multitarget/config.toml` - User-wide defaults
//! - Project: `.multitarget/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::platform::HostOs;
use crate::core::publication::Repository;

/// Multitarget configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feature previews
    pub features: FeatureConfig,

    /// Publishing settings
    pub publishing: PublishingConfig,

    /// Host overrides
    pub host: HostConfig,
}

/// Feature preview flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FeatureConfig {
    /// Publish the root metadata publication. Unset means enabled.
    pub metadata_publishing: Option<bool>,
}

/// Publishing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishingConfig {
    /// Remote repositories, in addition to the local one
    pub repositories: Vec<RepositoryConfig>,
}

/// A remote repository declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub name: String,
    pub url: String,
}

/// Host settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Pretend to run on this OS when enumerating native presets
    pub os: Option<HostOs>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.features.metadata_publishing.is_some() {
            self.features.metadata_publishing = other.features.metadata_publishing;
        }

        // Repositories accumulate; a project entry replaces a global one of the same name
        for repo in other.publishing.repositories {
            self.publishing.repositories.retain(|r| r.name != repo.name);
            self.publishing.repositories.push(repo);
        }

        if other.host.os.is_some() {
            self.host.os = other.host.os;
        }
    }

    /// Whether the root metadata publication may be published.
    pub fn metadata_publishing_enabled(&self) -> bool {
        self.features.metadata_publishing.unwrap_or(true)
    }

    /// Host OS, honouring the override.
    pub fn host_os(&self) -> HostOs {
        self.host.os.unwrap_or_else(HostOs::current)
    }

    /// The local repository followed by configured remote repositories.
    pub fn repositories(&self) -> Vec<Repository> {
        std::iter::once(Repository::maven_local())
            .chain(
                self.publishing
                    .repositories
                    .iter()
                    .map(|r| Repository::remote(&r.name, &r.url)),
            )
            .collect()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.multitarget/config.toml)
/// 2. Global config (~/.multitarget/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global config directory (~/.multitarget).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".multitarget"))
}

/// Get the global config path (~/.multitarget/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.multitarget/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".multitarget").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.features.metadata_publishing.is_none());
        assert!(config.metadata_publishing_enabled());
        assert_eq!(config.repositories(), vec![Repository::maven_local()]);
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[features]
metadata-publishing = false

[[publishing.repositories]]
name = "internal"
url = "https://repo.acme.com/maven"

[host]
os = "macos"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert!(!config.metadata_publishing_enabled());
        assert_eq!(config.host_os(), HostOs::Macos);
        assert_eq!(
            config.repositories()[1],
            Repository::remote("internal", "https://repo.acme.com/maven")
        );
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.features.metadata_publishing = Some(false);
        base.publishing.repositories.push(RepositoryConfig {
            name: "internal".to_string(),
            url: "https://old".to_string(),
        });

        let mut override_cfg = Config::default();
        override_cfg.publishing.repositories.push(RepositoryConfig {
            name: "internal".to_string(),
            url: "https://new".to_string(),
        });

        base.merge(override_cfg);

        // Not overridden
        assert_eq!(base.features.metadata_publishing, Some(false));
        assert_eq!(base.publishing.repositories.len(), 1);
        assert_eq!(base.publishing.repositories[0].url, "https://new");
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[features]
metadata-publishing = false

[host]
os = "windows"
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[features]
metadata-publishing = true
"#,
        )
        .unwrap();

        let config = load_config(Some(&global_path), &project_path);

        assert!(config.metadata_publishing_enabled());
        assert_eq!(config.host_os(), HostOs::Windows);
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "features = 3").unwrap();

        assert!(Config::load(&path).is_err());
        assert!(Config::load_or_default(&path).metadata_publishing_enabled());
    }
}
