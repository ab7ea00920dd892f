//! Attribute propagation.
//!
//! After evaluation every target's `main` compilation attributes are copied
//! into its elements configurations, and each compilation's attributes into
//! the dependency buckets named after it. The second copy is a live
//! subscription, so buckets registered later still receive the values.

use crate::core::compilation::MAIN_COMPILATION;
use crate::core::project::Project;
use crate::util::errors::{ModelError, ModelResult};

/// Schedule propagation for every current and future target.
pub fn schedule_propagation(project: &mut Project) -> ModelResult<()> {
    project.all_targets(|p, target| {
        let target = target.to_string();
        p.after_evaluate(move |p| propagate_target(p, &target))
    })
}

/// Propagate one target's attributes.
pub fn propagate_target(project: &mut Project, target: &str) -> ModelResult<()> {
    copy_main_attributes(project, target)?;

    let target_name = target.to_string();
    project.all_compilations(target, move |p, compilation| {
        let target = target_name.clone();
        let compilation = compilation.to_string();
        p.all_configurations(move |p, configuration| {
            copy_compilation_attributes(p, &target, &compilation, configuration)
        })
    })
}

/// Copy the `main` compilation's bag into the canonical configurations
/// that exist. A target without `main` is skipped.
fn copy_main_attributes(project: &mut Project, target: &str) -> ModelResult<()> {
    let Some(main) = project.compilation(target, MAIN_COMPILATION) else {
        tracing::debug!("Target {} has no main compilation, skipping", target);
        return Ok(());
    };
    let bag = main.attributes().clone();
    let source = format!("compilation `{}/{}`", target, MAIN_COMPILATION);

    let canonical = project
        .target(target)
        .ok_or_else(|| ModelError::UnknownTarget(target.to_string()))?
        .canonical_configurations();

    for name in canonical {
        if let Some(configuration) = project.configuration_mut(&name) {
            bag.copy_into(configuration.attributes_mut(), &source, target)?;
            tracing::debug!("Copied {} attributes into {}", bag.len(), name);
        }
    }
    Ok(())
}

/// Copy a compilation's bag into `configuration` if it is one of the
/// compilation's related configurations.
fn copy_compilation_attributes(
    project: &mut Project,
    target: &str,
    compilation: &str,
    configuration: &str,
) -> ModelResult<()> {
    let c = project
        .compilation(target, compilation)
        .ok_or_else(|| ModelError::UnknownCompilation {
            target: target.to_string(),
            compilation: compilation.to_string(),
        })?;
    if !c
        .related_configuration_names()
        .iter()
        .any(|n| n == configuration)
    {
        return Ok(());
    }

    let bag = c.attributes().clone();
    let source = format!("compilation `{}/{}`", target, compilation);
    if let Some(dest) = project.configuration_mut(configuration) {
        bag.copy_into(dest.attributes_mut(), &source, target)?;
        tracing::debug!("Copied {} attributes into {}", bag.len(), configuration);
    }
    Ok(())
}
