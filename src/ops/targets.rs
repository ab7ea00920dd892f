//! Target graph builder.
//!
//! Creates targets from presets, registers them in the live target
//! collection and hands a [`TargetScope`] to the configure function.

use crate::core::attributes::{AttributeBag, AttributeKey, AttributeValue};
use crate::core::compilation::Compilation;
use crate::core::component::AGGREGATE_COMPONENT;
use crate::core::configuration::ConfigurationRole;
use crate::core::preset::{MetadataPreset, PresetRegistry, TargetPreset};
use crate::core::project::Project;
use crate::core::publication::{Publication, ROOT_PUBLICATION};
use crate::core::target::{PublicationAction, Target, TargetOptions, METADATA_TARGET_NAME};
use crate::util::errors::{ModelError, ModelResult};

/// Mutable handle on a freshly registered target.
pub struct TargetScope<'a> {
    project: &'a mut Project,
    target: String,
}

impl<'a> TargetScope<'a> {
    pub fn new(project: &'a mut Project, target: impl Into<String>) -> Self {
        TargetScope {
            project,
            target: target.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.target
    }

    pub fn target(&self) -> ModelResult<&Target> {
        self.project
            .target(&self.target)
            .ok_or_else(|| ModelError::UnknownTarget(self.target.clone()))
    }

    pub fn project(&mut self) -> &mut Project {
        self.project
    }

    /// Add a compilation carrying the target's platform attributes.
    pub fn add_compilation(&mut self, name: &str) -> ModelResult<()> {
        let target = self.target()?;
        let mut attributes = AttributeBag::new();
        attributes.set(&AttributeKey::platform_type(), target.platform())?;
        if let Some(native) = target.native_target() {
            attributes.set(&AttributeKey::native_target(), native.name)?;
        }

        let compilation = Compilation::new(self.target.as_str(), name).with_attributes(attributes);
        self.project.add_compilation(&self.target, compilation)
    }

    pub fn compilation(&mut self, name: &str) -> ModelResult<&mut Compilation> {
        self.project.compilation_mut(&self.target, name)
    }

    /// Set an attribute on one compilation.
    pub fn set_attribute(
        &mut self,
        compilation: &str,
        key: &AttributeKey,
        value: impl Into<AttributeValue>,
    ) -> ModelResult<()> {
        self.compilation(compilation)?.attributes_mut().set(key, value)
    }

    /// Set an attribute on every compilation the target has now.
    pub fn set_attribute_everywhere(
        &mut self,
        key: &AttributeKey,
        value: impl Into<AttributeValue>,
    ) -> ModelResult<()> {
        let value = value.into();
        for compilation in self.target()?.compilation_names() {
            self.set_attribute(&compilation, key, value.clone())?;
        }
        Ok(())
    }

    /// Declare an attribute without a value. Propagation fails unless a
    /// value is set before the project is evaluated.
    pub fn declare_attribute(&mut self, compilation: &str, key: &AttributeKey) -> ModelResult<()> {
        self.compilation(compilation)?.attributes_mut().declare(key)
    }

    /// Configure the target's publication, now or once it exists.
    pub fn on_publication(
        &mut self,
        action: impl Fn(&mut Publication) + 'static,
    ) -> ModelResult<()> {
        self.project
            .add_publication_action(&self.target, PublicationAction::new(action))
    }
}

/// Create a target named `name` from `preset` and run `configure` on it.
///
/// The name and every name the target claims elsewhere are checked before
/// the target is registered, so a conflict leaves nothing registered.
pub fn create_target(
    project: &mut Project,
    preset: &dyn TargetPreset,
    name: &str,
    options: &TargetOptions,
    configure: impl FnOnce(&mut TargetScope<'_>) -> ModelResult<()>,
) -> ModelResult<()> {
    if project.has_target(name) {
        return Err(ModelError::NamingConflict {
            kind: "target",
            name: name.to_string(),
        });
    }

    let target = preset.create_target(name, options)?;
    check_derived_names(project, &target)?;
    tracing::debug!("Creating target {} from preset {}", name, preset.name());
    project.add_target(target)?;

    configure(&mut TargetScope::new(project, name))
}

/// Names a target claims in other collections once registered: its
/// component, its publication and its sources archive task. The root
/// publication and aggregate component names are always reserved.
fn check_derived_names(project: &Project, target: &Target) -> ModelResult<()> {
    let conflict = |kind: &'static str, name: &str| ModelError::NamingConflict {
        kind,
        name: name.to_string(),
    };

    let component = target.component_name();
    if component == AGGREGATE_COMPONENT || project.component(component).is_some() {
        return Err(conflict("component", component));
    }
    if target.name() == ROOT_PUBLICATION || project.publication(target.name()).is_some() {
        return Err(conflict("publication", target.name()));
    }
    let task = target.sources_archive_task();
    if project.task(&task).is_some() {
        return Err(conflict("task", &task));
    }
    Ok(())
}

/// Create a target from the preset registered under `preset_name`.
pub fn create_target_from_preset_name(
    project: &mut Project,
    presets: &PresetRegistry,
    preset_name: &str,
    name: &str,
    options: &TargetOptions,
    configure: impl FnOnce(&mut TargetScope<'_>) -> ModelResult<()>,
) -> ModelResult<()> {
    let preset = presets.resolve(preset_name)?;
    create_target(project, preset, name, options, configure)
}

/// Create the reserved shared-code target.
pub fn create_metadata_target(project: &mut Project) -> ModelResult<()> {
    create_target(
        project,
        &MetadataPreset,
        METADATA_TARGET_NAME,
        &TargetOptions::default(),
        |_| Ok(()),
    )
}

/// Create the configurations the host keeps for every target and
/// compilation: the canonical elements configurations per target and the
/// dependency buckets per compilation.
pub fn register_configurations(project: &mut Project) -> ModelResult<()> {
    project.all_targets(|p, target| {
        let canonical = p
            .target(target)
            .ok_or_else(|| ModelError::UnknownTarget(target.to_string()))?
            .canonical_configurations();
        for name in canonical {
            p.maybe_create_configuration(&name, ConfigurationRole::Consumable)?;
        }

        let target_name = target.to_string();
        p.all_compilations(target, move |p, compilation| {
            let c = p.compilation(&target_name, compilation).ok_or_else(|| {
                ModelError::UnknownCompilation {
                    target: target_name.clone(),
                    compilation: compilation.to_string(),
                }
            })?;
            let buckets = [
                (c.api_configuration(), ConfigurationRole::Declarable),
                (c.implementation_configuration(), ConfigurationRole::Declarable),
                (c.compile_classpath_configuration(), ConfigurationRole::Resolvable),
                (c.runtime_classpath_configuration(), ConfigurationRole::Resolvable),
            ];
            for (name, role) in buckets {
                p.maybe_create_configuration(&name, role)?;
            }
            Ok(())
        })
    })
}
