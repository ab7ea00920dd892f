//! Sources archives.
//!
//! Every target with a `main` compilation gets a `{target}SourcesJar` task.
//! Its entries are resolved after evaluation from the `dependsOn` closure of
//! the main compilation's default source set. A default source set missing
//! from the graph contributes no entries.

use crate::core::compilation::MAIN_COMPILATION;
use crate::core::project::Project;
use crate::core::task::{ArchiveEntry, SourcesArchiveTask, Task, TaskKind};
use crate::util::errors::{ModelError, ModelResult};

/// Register sources archive tasks for every current and future target.
pub fn configure_sources_archives(project: &mut Project) -> ModelResult<()> {
    project.all_targets(|p, target| {
        let target_name = target.to_string();
        p.all_compilations(target, move |p, compilation| {
            if compilation != MAIN_COMPILATION {
                return Ok(());
            }
            let task_name = p
                .target(&target_name)
                .ok_or_else(|| ModelError::UnknownTarget(target_name.clone()))?
                .sources_archive_task();

            p.add_task(Task::new(
                task_name.as_str(),
                TaskKind::SourcesArchive(SourcesArchiveTask::new(
                    target_name.as_str(),
                    MAIN_COMPILATION,
                )),
            ))?;
            tracing::debug!("Registered {}", task_name);

            let target = target_name.clone();
            p.after_evaluate(move |p| resolve_entries(p, &target, &task_name))
        })
    })
}

/// Compute the archive entries of `task` from the source-set graph.
pub fn resolve_entries(project: &mut Project, target: &str, task: &str) -> ModelResult<()> {
    let default = project
        .compilation(target, MAIN_COMPILATION)
        .map(|c| c.default_source_set().to_string())
        .ok_or_else(|| ModelError::UnknownCompilation {
            target: target.to_string(),
            compilation: MAIN_COMPILATION.to_string(),
        })?;

    let graph = project.source_sets();
    let closure = if graph.contains(&default) {
        graph.depends_on_closure(&default)?
    } else {
        tracing::debug!("Source set {} is absent, {} has no entries", default, task);
        Vec::new()
    };
    let mut entries = Vec::new();
    for name in closure {
        let source_set = graph
            .get(&name)
            .ok_or_else(|| ModelError::UnknownSourceSet(name.clone()))?;
        entries.extend(source_set.roots().iter().map(|root| ArchiveEntry {
            source_set: name.clone(),
            root: root.clone(),
        }));
    }

    let count = entries.len();
    match project.task_mut(task).map(|t| &mut t.kind) {
        Some(TaskKind::SourcesArchive(archive)) => archive.resolve(entries),
        _ => return Err(ModelError::UnknownTask(task.to_string())),
    }
    tracing::debug!("Resolved {} entries for {}", count, task);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preset::{AndroidPreset, JvmPreset};
    use crate::core::project::ProjectIdentity;
    use crate::core::target::TargetOptions;
    use crate::ops::source_sets::{create_roots, declare_source_set, wire_default_source_sets};
    use crate::ops::targets::create_target;
    use crate::util::config::Config;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn project(dir: &std::path::Path) -> Project {
        let mut p = Project::new(
            ProjectIdentity::new("com.acme", "lib", "1.0"),
            dir,
            Config::default(),
        );
        create_roots(&mut p).unwrap();
        wire_default_source_sets(&mut p).unwrap();
        configure_sources_archives(&mut p).unwrap();
        p
    }

    #[test]
    fn test_absent_default_source_set_resolves_empty() {
        let mut p = Project::new(
            ProjectIdentity::new("com.acme", "lib", "1.0"),
            "/p",
            Config::default(),
        );
        configure_sources_archives(&mut p).unwrap();
        create_target(&mut p, &JvmPreset, "jvm", &TargetOptions::default(), |_| Ok(())).unwrap();
        p.evaluate().unwrap();

        let archive = p.task("jvmSourcesJar").unwrap().as_sources_archive().unwrap();
        assert!(archive.is_resolved());
        assert!(archive.entries().unwrap().is_empty());
    }

    #[test]
    fn test_no_task_without_main() {
        let mut p = project(std::path::Path::new("/p"));
        create_target(&mut p, &AndroidPreset, "android", &TargetOptions::default(), |_| Ok(()))
            .unwrap();
        assert!(p.task("androidSourcesJar").is_none());
    }

    #[test]
    fn test_entries_resolved_after_barrier() {
        let mut p = project(std::path::Path::new("/p"));
        create_target(&mut p, &JvmPreset, "jvm", &TargetOptions::default(), |_| Ok(())).unwrap();

        let archive = p.task("jvmSourcesJar").unwrap().as_sources_archive().unwrap();
        assert!(archive.entries().is_err());

        // Membership may still change before the barrier
        declare_source_set(&mut p, "jvmShared", &["src/shared"]).unwrap();
        p.source_sets_mut().depends_on("jvmMain", "jvmShared").unwrap();
        p.evaluate().unwrap();

        let archive = p.task("jvmSourcesJar").unwrap().as_sources_archive().unwrap();
        let mut source_sets: Vec<&str> = archive
            .entries()
            .unwrap()
            .iter()
            .map(|e| e.source_set.as_str())
            .collect();
        source_sets.dedup();
        assert_eq!(source_sets.first(), Some(&"jvmMain"));
        assert!(source_sets.contains(&"commonMain"));
        assert!(source_sets.contains(&"jvmShared"));
        assert!(!source_sets.contains(&"commonTest"));
    }

    #[test]
    fn test_files_grouped_by_source_set() {
        let tmp = TempDir::new().unwrap();
        let common = tmp.path().join("src/commonMain/kotlin");
        let jvm = tmp.path().join("src/jvmMain/kotlin");
        fs::create_dir_all(&common).unwrap();
        fs::create_dir_all(&jvm).unwrap();
        fs::write(common.join("Shared.kt"), "").unwrap();
        fs::write(jvm.join("Platform.kt"), "").unwrap();

        let mut p = project(tmp.path());
        create_target(&mut p, &JvmPreset, "jvm", &TargetOptions::default(), |_| Ok(())).unwrap();
        p.evaluate().unwrap();

        let mut files = p
            .task("jvmSourcesJar")
            .unwrap()
            .as_sources_archive()
            .unwrap()
            .files()
            .unwrap();
        files.sort();
        let archive_paths: Vec<PathBuf> = files.into_iter().map(|(path, _)| path).collect();
        assert_eq!(
            archive_paths,
            vec![
                PathBuf::from("commonMain/Shared.kt"),
                PathBuf::from("jvmMain/Platform.kt")
            ]
        );
    }
}
