//! Multiplatform plugin activation.
//!
//! Wires the preset registry, source-set DAG, attribute propagation,
//! sources archives and publishing into a project, in that order, then
//! creates the `metadata` target.

use crate::core::platform::HostManager;
use crate::core::preset::PresetRegistry;
use crate::core::project::Project;
use crate::core::target::TargetOptions;
use crate::ops::targets::{self, TargetScope};
use crate::ops::{attributes, publishing, source_sets, sources};
use crate::util::errors::ModelResult;

/// Id of the multiplatform plugin.
pub const MULTIPLATFORM_PLUGIN: &str = "multiplatform";

/// Plugins that make the Android preset available.
pub const ANDROID_PLUGINS: [&str; 2] = ["com.android.application", "com.android.library"];

/// The activated extension: the entry point for creating targets.
#[derive(Debug)]
pub struct Multiplatform {
    presets: PresetRegistry,
}

impl Multiplatform {
    pub fn presets(&self) -> &PresetRegistry {
        &self.presets
    }

    /// Create a target from a registered preset.
    pub fn create_target(
        &self,
        project: &mut Project,
        preset: &str,
        name: &str,
        options: &TargetOptions,
        configure: impl FnOnce(&mut TargetScope<'_>) -> ModelResult<()>,
    ) -> ModelResult<()> {
        targets::create_target_from_preset_name(
            project,
            &self.presets,
            preset,
            name,
            options,
            configure,
        )
    }
}

/// Activate the multiplatform model on `project`.
///
/// Android plugins must be applied before activation for the `android`
/// preset to be registered.
pub fn apply(project: &mut Project) -> ModelResult<Multiplatform> {
    project.apply_plugin(MULTIPLATFORM_PLUGIN)?;

    let host = HostManager::new(project.config().host_os());
    let android = ANDROID_PLUGINS.iter().any(|id| project.has_plugin(id));
    let presets = PresetRegistry::with_defaults(host, android)?;

    targets::register_configurations(project)?;
    source_sets::create_roots(project)?;
    source_sets::wire_default_source_sets(project)?;
    attributes::schedule_propagation(project)?;
    sources::configure_sources_archives(project)?;
    publishing::configure_publishing(project)?;
    targets::create_metadata_target(project)?;

    project.begin_configuration();
    tracing::info!(
        "Activated multiplatform with {} presets on {}",
        presets.len(),
        host.host()
    );
    Ok(Multiplatform { presets })
}
