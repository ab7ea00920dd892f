//! Task descriptions configured by the model.
//!
//! The model does not execute tasks. It declares what each task produces
//! and the conditions under which it runs; the host engine asks
//! `Project::decide` at task-decision time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::Serialize;

use crate::util::errors::{ModelError, ModelResult};
use crate::util::fs::walk_files;
use crate::util::live::Named;

/// Classifier of source archives.
pub const SOURCES_CLASSIFIER: &str = "sources";

/// A condition checked before a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskGate {
    /// Run only when metadata publishing is enabled
    MetadataPublishingEnabled,
}

/// Outcome of the run/skip decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "lowercase")]
pub enum TaskDecision {
    Run,
    Skip(String),
}

/// One source root placed into a sources archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    /// Source set the root belongs to; also the directory inside the archive
    pub source_set: String,
    pub root: PathBuf,
}

/// Packs the sources of a target's `main` compilation.
#[derive(Debug, Clone, Serialize)]
pub struct SourcesArchiveTask {
    pub target: String,
    pub compilation: String,
    pub classifier: String,
    entries: Option<Vec<ArchiveEntry>>,
}

impl SourcesArchiveTask {
    pub fn new(target: impl Into<String>, compilation: impl Into<String>) -> Self {
        SourcesArchiveTask {
            target: target.into(),
            compilation: compilation.into(),
            classifier: SOURCES_CLASSIFIER.to_string(),
            entries: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.entries.is_some()
    }

    pub(crate) fn resolve(&mut self, entries: Vec<ArchiveEntry>) {
        self.entries = Some(entries);
    }

    /// Resolved entries. Available only after evaluation.
    pub fn entries(&self) -> ModelResult<&[ArchiveEntry]> {
        self.entries
            .as_deref()
            .ok_or_else(|| ModelError::NotYetEvaluated {
                what: format!("the file set of the `{}` sources archive", self.target),
            })
    }

    /// `(path inside archive, file on disk)` for every existing file.
    ///
    /// Roots of one source set share its archive directory, so two files
    /// with the same relative path under different roots are an error.
    pub fn files(&self) -> Result<Vec<(PathBuf, PathBuf)>> {
        let mut files = Vec::new();
        let mut seen: HashMap<PathBuf, PathBuf> = HashMap::new();
        for entry in self.entries()? {
            for file in walk_files(&entry.root)? {
                let relative = file.strip_prefix(&entry.root).unwrap_or(Path::new(""));
                let archive_path = Path::new(&entry.source_set).join(relative);
                if let Some(previous) = seen.get(&archive_path) {
                    bail!(
                        "duplicate entry `{}` in the `{}` sources archive: {} and {}",
                        archive_path.display(),
                        self.target,
                        previous.display(),
                        file.display()
                    );
                }
                seen.insert(archive_path.clone(), file.clone());
                files.push((archive_path, file));
            }
        }
        Ok(files)
    }
}

/// Publishes one publication to one repository.
#[derive(Debug, Clone, Serialize)]
pub struct PublishTask {
    pub publication: String,
    pub repository: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
    SourcesArchive(SourcesArchiveTask),
    Publish(PublishTask),
}

/// A task registered in the project.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    name: String,
    pub kind: TaskKind,
    pub only_if: Vec<TaskGate>,
}

impl Task {
    pub fn new(name: impl Into<String>, kind: TaskKind) -> Self {
        Task {
            name: name.into(),
            kind,
            only_if: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a gate unless it is already present.
    pub fn only_if(&mut self, gate: TaskGate) {
        if !self.only_if.contains(&gate) {
            self.only_if.push(gate);
        }
    }

    pub fn as_sources_archive(&self) -> Option<&SourcesArchiveTask> {
        match &self.kind {
            TaskKind::SourcesArchive(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_publish(&self) -> Option<&PublishTask> {
        match &self.kind {
            TaskKind::Publish(t) => Some(t),
            _ => None,
        }
    }
}

impl Named for Task {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_entries_unavailable_before_resolution() {
        let task = SourcesArchiveTask::new("jvm", "main");
        assert!(matches!(
            task.entries(),
            Err(ModelError::NotYetEvaluated { .. })
        ));
    }

    #[test]
    fn test_files_placed_under_source_set_directory() {
        let tmp = TempDir::new().unwrap();
        let common = tmp.path().join("src/commonMain/kotlin");
        fs::create_dir_all(common.join("pkg")).unwrap();
        fs::write(common.join("pkg/Shared.kt"), "").unwrap();

        let mut task = SourcesArchiveTask::new("jvm", "main");
        task.resolve(vec![
            ArchiveEntry {
                source_set: "jvmMain".to_string(),
                root: tmp.path().join("src/jvmMain/kotlin"),
            },
            ArchiveEntry {
                source_set: "commonMain".to_string(),
                root: common.clone(),
            },
        ]);

        let files = task.files().unwrap();
        assert_eq!(
            files,
            vec![(
                PathBuf::from("commonMain/pkg/Shared.kt"),
                common.join("pkg/Shared.kt")
            )]
        );
    }

    #[test]
    fn test_duplicate_archive_path_rejected() {
        let tmp = TempDir::new().unwrap();
        let kotlin = tmp.path().join("src/jvmMain/kotlin");
        let resources = tmp.path().join("src/jvmMain/resources");
        fs::create_dir_all(&kotlin).unwrap();
        fs::create_dir_all(&resources).unwrap();
        fs::write(kotlin.join("app.properties"), "a").unwrap();
        fs::write(resources.join("app.properties"), "b").unwrap();

        let mut task = SourcesArchiveTask::new("jvm", "main");
        task.resolve(vec![
            ArchiveEntry {
                source_set: "jvmMain".to_string(),
                root: kotlin,
            },
            ArchiveEntry {
                source_set: "jvmMain".to_string(),
                root: resources,
            },
        ]);

        let err = task.files().unwrap_err();
        assert!(err.to_string().contains("duplicate entry `jvmMain/app.properties`"));
    }

    #[test]
    fn test_gates_not_duplicated() {
        let mut task = Task::new(
            "publishKotlinMultiplatformPublicationToMavenLocal",
            TaskKind::Publish(PublishTask {
                publication: "kotlinMultiplatform".to_string(),
                repository: "mavenLocal".to_string(),
            }),
        );
        task.only_if(TaskGate::MetadataPublishingEnabled);
        task.only_if(TaskGate::MetadataPublishingEnabled);
        assert_eq!(task.only_if.len(), 1);
    }
}
