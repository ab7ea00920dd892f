//! Build a configured project from a manifest.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::manifest::Manifest;
use crate::core::project::Project;
use crate::core::target::TargetOptions;
use crate::ops::plugin::{self, Multiplatform, MULTIPLATFORM_PLUGIN};
use crate::ops::source_sets::declare_source_set;
use crate::util::config::Config;

/// A project that has passed the after-evaluate barrier.
#[derive(Debug)]
pub struct LoadedProject {
    pub project: Project,
    pub multiplatform: Multiplatform,
}

/// Options for loading.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Stop before the after-evaluate barrier
    pub skip_evaluation: bool,
}

/// Load the manifest at `manifest_path` and configure a project from it.
pub fn load_project(manifest_path: &Path, config: Config) -> Result<LoadedProject> {
    load_project_with_opts(manifest_path, config, &LoadOptions::default())
}

/// Load with explicit options.
pub fn load_project_with_opts(
    manifest_path: &Path,
    config: Config,
    opts: &LoadOptions,
) -> Result<LoadedProject> {
    let manifest = Manifest::load(manifest_path)?;
    configure_project(&manifest, config, opts)
}

/// Configure a project from an already parsed manifest.
pub fn configure_project(
    manifest: &Manifest,
    config: Config,
    opts: &LoadOptions,
) -> Result<LoadedProject> {
    let mut project = Project::new(manifest.identity(), &manifest.manifest_dir, config);

    // Host plugins first so activation can see them
    for id in &manifest.project.plugins {
        if id != MULTIPLATFORM_PLUGIN {
            project
                .apply_plugin(id)
                .with_context(|| format!("failed to apply plugin `{}`", id))?;
        }
    }
    let multiplatform =
        plugin::apply(&mut project).context("failed to activate the multiplatform plugin")?;

    for (name, spec) in &manifest.source_sets {
        declare_source_set(&mut project, name, &spec.roots)
            .with_context(|| format!("failed to declare source set `{}`", name))?;
    }

    for (name, spec) in &manifest.targets {
        let options = TargetOptions {
            publishable: spec.publishable,
        };
        multiplatform
            .create_target(
                &mut project,
                manifest.preset_for(name),
                name,
                &options,
                |scope| {
                    for compilation in &spec.compilations {
                        scope.add_compilation(compilation)?;
                    }
                    for (key, value) in &spec.attributes {
                        let (key, value) = value.to_entry(key);
                        scope.set_attribute_everywhere(&key, value)?;
                    }
                    Ok(())
                },
            )
            .with_context(|| format!("failed to configure target `{}`", name))?;
    }

    // Edges last: default source sets exist once targets are created
    for (name, spec) in &manifest.source_sets {
        for dependency in &spec.depends_on {
            project
                .source_sets_mut()
                .depends_on(name, dependency)
                .with_context(|| {
                    format!("failed to add dependsOn edge `{}` -> `{}`", name, dependency)
                })?;
        }
    }

    if !opts.skip_evaluation {
        project
            .evaluate()
            .context("failed to evaluate the project")?;
    }

    Ok(LoadedProject {
        project,
        multiplatform,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::MANIFEST_NAME;
    use crate::core::platform::HostOs;
    use crate::util::errors::ModelError;
    use tempfile::TempDir;

    fn write_manifest(content: &str) -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(MANIFEST_NAME);
        std::fs::write(&path, content).unwrap();
        (tmp, path)
    }

    fn linux() -> Config {
        let mut config = Config::default();
        config.host.os = Some(HostOs::Linux);
        config
    }

    #[test]
    fn test_load_and_evaluate() {
        let (_tmp, path) = write_manifest(
            r#"
[project]
group = "com.acme"
name = "lib"
version = "1.0"
plugins = ["maven-publish"]

[targets.jvm]

[targets.linux]
preset = "linuxX64"
compilations = ["benchmark"]

[targets.linux.attributes]
"com.acme.optimized" = true

[source-sets.nativeMain]
depends-on = ["commonMain"]

[source-sets.linuxMain]
depends-on = ["nativeMain"]
"#,
        );

        let loaded = load_project(&path, linux()).unwrap();
        let p = &loaded.project;

        assert!(p.is_evaluated());
        assert_eq!(p.target_names(), vec!["metadata", "jvm", "linux"]);
        assert!(p.compilation("linux", "benchmark").is_some());
        assert_eq!(
            p.source_sets().depends_on_closure("linuxMain").unwrap(),
            vec!["linuxMain", "nativeMain", "commonMain"]
        );
        assert!(p
            .configuration("linuxApiElements")
            .unwrap()
            .attributes()
            .contains("com.acme.optimized"));
        assert!(p.publication("linux").is_some());
    }

    #[test]
    fn test_cycle_reported_with_context() {
        let (_tmp, path) = write_manifest(
            r#"
[project]
name = "lib"

[targets.jvm]

[source-sets.commonMain]
depends-on = ["jvmMain"]
"#,
        );

        let err = load_project(&path, linux()).unwrap_err();
        assert!(format!("{:#}", err).contains("dependsOn edge"));
        assert!(matches!(
            err.downcast_ref::<ModelError>(),
            Some(ModelError::DependsOnCycle { .. })
        ));
    }

    #[test]
    fn test_skip_evaluation() {
        let (_tmp, path) = write_manifest("[project]\nname = \"lib\"\n\n[targets.js]\n");
        let opts = LoadOptions {
            skip_evaluation: true,
        };
        let loaded = load_project_with_opts(&path, linux(), &opts).unwrap();
        assert!(!loaded.project.is_evaluated());
    }

    #[test]
    fn test_unknown_preset() {
        let (_tmp, path) = write_manifest("[project]\nname = \"lib\"\n\n[targets.wasm]\n");
        let err = load_project(&path, linux()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModelError>(),
            Some(ModelError::UnknownPreset { .. })
        ));
    }
}
