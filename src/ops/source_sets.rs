//! Source-set wiring.
//!
//! The common roots exist from activation. Default source sets are created
//! as compilations are discovered; `main` and `test` defaults then depend
//! on `commonMain` and `commonTest`.

use std::path::Path;

use crate::core::compilation::{MAIN_COMPILATION, TEST_COMPILATION};
use crate::core::project::Project;
use crate::core::source_set::{SourceSet, COMMON_MAIN, COMMON_TEST};
use crate::util::errors::{ModelError, ModelResult};

/// Create `commonMain` and `commonTest`.
pub fn create_roots(project: &mut Project) -> ModelResult<()> {
    let dir = project.dir().to_path_buf();
    for root in [COMMON_MAIN, COMMON_TEST] {
        project.source_sets_mut().maybe_create(root, &dir)?;
    }
    Ok(())
}

/// Root a compilation's default source set depends on, if any.
fn common_root_for(compilation: &str) -> Option<&'static str> {
    match compilation {
        MAIN_COMPILATION => Some(COMMON_MAIN),
        TEST_COMPILATION => Some(COMMON_TEST),
        _ => None,
    }
}

/// Create default source sets lazily and wire them to the common roots.
pub fn wire_default_source_sets(project: &mut Project) -> ModelResult<()> {
    project.all_targets(|p, target| {
        let target_name = target.to_string();
        p.all_compilations(target, move |p, compilation| {
            let default = p
                .compilation(&target_name, compilation)
                .map(|c| c.default_source_set().to_string())
                .ok_or_else(|| ModelError::UnknownCompilation {
                    target: target_name.clone(),
                    compilation: compilation.to_string(),
                })?;

            let dir = p.dir().to_path_buf();
            p.source_sets_mut().maybe_create(&default, &dir)?;

            match common_root_for(compilation) {
                Some(root) if root != default => {
                    if p.source_sets_mut().depends_on(&default, root)? {
                        tracing::debug!("Wired {} dependsOn {}", default, root);
                    }
                    Ok(())
                }
                _ => Ok(()),
            }
        })
    })
}

/// Declare a source set from configuration, replacing its roots when any
/// are given. Relative roots resolve against `project_dir`.
pub fn declare_source_set(
    project: &mut Project,
    name: &str,
    roots: &[impl AsRef<Path>],
) -> ModelResult<()> {
    let dir = project.dir().to_path_buf();
    let source_set = project.source_sets_mut().maybe_create(name, &dir)?;
    if !roots.is_empty() {
        *source_set = SourceSet::new(name, &dir)
            .with_roots(roots.iter().map(|r| dir.join(r.as_ref())).collect());
    }
    Ok(())
}
