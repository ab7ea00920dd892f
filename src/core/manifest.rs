//! Multitarget.toml manifest parsing and schema.
//!
//! The manifest declares the project identity, the plugins present, the
//! targets to create from presets and extra source-set structure.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::attributes::{AttributeKey, AttributeValue};
use crate::core::project::ProjectIdentity;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Multitarget.toml";

/// Version used when the manifest does not declare one.
pub const UNSPECIFIED_VERSION: &str = "unspecified";

/// The `[project]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// Publication group
    #[serde(default)]
    pub group: String,

    /// Project name; also the root publication's artifact id
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    /// Plugins present in the host, e.g. `maven-publish`
    #[serde(default)]
    pub plugins: Vec<String>,
}

fn default_version() -> String {
    UNSPECIFIED_VERSION.to_string()
}

/// An attribute value as written in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ManifestAttribute {
    Flag(bool),
    Text(String),
}

impl ManifestAttribute {
    /// Typed key and value for the attribute `name`.
    pub fn to_entry(&self, name: &str) -> (AttributeKey, AttributeValue) {
        match self {
            ManifestAttribute::Flag(b) => (AttributeKey::flag(name), AttributeValue::Flag(*b)),
            ManifestAttribute::Text(s) => {
                (AttributeKey::text(name), AttributeValue::Text(s.clone()))
            }
        }
    }
}

/// A `[targets.<name>]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetSpec {
    /// Preset to create the target from. Defaults to the target name.
    #[serde(default)]
    pub preset: Option<String>,

    /// Override the preset's publishability
    #[serde(default)]
    pub publishable: Option<bool>,

    /// Compilations to add on top of the preset's
    #[serde(default)]
    pub compilations: Vec<String>,

    /// Attributes set on every compilation of the target
    #[serde(default)]
    pub attributes: BTreeMap<String, ManifestAttribute>,
}

/// A `[source-sets.<name>]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceSetSpec {
    /// Source roots relative to the project directory. Empty keeps the
    /// conventional roots.
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawManifest {
    project: ProjectSection,

    #[serde(default)]
    targets: BTreeMap<String, TargetSpec>,

    #[serde(default)]
    source_sets: BTreeMap<String, SourceSetSpec>,
}

/// The parsed Multitarget.toml manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub project: ProjectSection,

    /// Targets, sorted by name
    pub targets: BTreeMap<String, TargetSpec>,

    /// Source sets, sorted by name
    pub source_sets: BTreeMap<String, SourceSetSpec>,

    /// Directory containing the manifest
    pub manifest_dir: PathBuf,
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if raw.project.name.trim().is_empty() {
            anyhow::bail!("manifest at {} has an empty project name", path.display());
        }

        let manifest_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        Ok(Manifest {
            project: raw.project,
            targets: raw.targets,
            source_sets: raw.source_sets,
            manifest_dir,
        })
    }

    pub fn identity(&self) -> ProjectIdentity {
        ProjectIdentity::new(
            self.project.group.clone(),
            self.project.name.clone(),
            self.project.version.clone(),
        )
    }

    /// Preset name for `target`: explicit, else the target name.
    pub fn preset_for<'a>(&'a self, target: &'a str) -> &'a str {
        self.targets
            .get(target)
            .and_then(|t| t.preset.as_deref())
            .unwrap_or(target)
    }
}

/// Find the manifest in `start` or any parent directory.
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_NAME))
        .find(|candidate| candidate.is_file())
}

/// A minimal manifest with a JVM and a JS target.
pub fn generate_default_manifest(name: &str) -> String {
    format!(
        r#"[project]
group = "com.example"
name = "{name}"
version = "0.1.0"
plugins = ["maven-publish"]

[targets.jvm]

[targets.js]
"#
    )
}
