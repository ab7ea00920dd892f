//! Serializable views of a configured project, used by the CLI.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use crate::core::platform::PlatformType;
use crate::core::preset::PresetRegistry;
use crate::core::project::Project;
use crate::core::publication::PublishedArtifact;
use crate::core::task::{TaskDecision, TaskKind};
use crate::util::errors::ModelResult;

#[derive(Debug, Clone, Serialize)]
pub struct CompilationReport {
    pub name: String,
    pub default_source_set: String,
    pub attributes: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub name: String,
    pub preset: Option<String>,
    pub platform: PlatformType,
    pub native_target: Option<&'static str>,
    pub publishable: bool,
    pub compilations: Vec<CompilationReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PresetReport {
    pub name: String,
    pub platform: PlatformType,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceSetReport {
    pub name: String,
    pub roots: Vec<PathBuf>,
    pub depends_on: Vec<String>,
    pub dependents: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicationReport {
    pub name: String,
    pub coordinates: String,
    pub component: Option<String>,
    pub variants: Vec<String>,
    pub artifacts: Vec<PublishedArtifact>,
    pub original_file_names: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub name: String,
    pub kind: &'static str,
    pub detail: String,
    pub decision: TaskDecision,
}

pub fn targets(project: &Project) -> Vec<TargetReport> {
    project
        .targets()
        .map(|t| TargetReport {
            name: t.name().to_string(),
            preset: t.preset().map(str::to_string),
            platform: t.platform(),
            native_target: t.native_target().map(|n| n.name),
            publishable: t.is_publishable(),
            compilations: t
                .compilations()
                .map(|c| CompilationReport {
                    name: c.name().to_string(),
                    default_source_set: c.default_source_set().to_string(),
                    attributes: c.attributes().to_map(),
                })
                .collect(),
        })
        .collect()
}

pub fn presets(registry: &PresetRegistry) -> Vec<PresetReport> {
    registry
        .iter()
        .map(|p| PresetReport {
            name: p.name().to_string(),
            platform: p.platform(),
        })
        .collect()
}

/// Source sets with dependencies listed before dependents.
pub fn source_sets(project: &Project) -> ModelResult<Vec<SourceSetReport>> {
    let graph = project.source_sets();
    graph
        .topological_order()
        .into_iter()
        .filter_map(|name| graph.get(&name).map(|s| (name, s.roots().to_vec())))
        .map(|(name, roots)| -> ModelResult<SourceSetReport> {
            Ok(SourceSetReport {
                depends_on: graph.dependencies(&name)?,
                dependents: graph.dependents(&name)?,
                roots,
                name,
            })
        })
        .collect()
}

pub fn publications(project: &Project) -> Vec<PublicationReport> {
    project
        .publications()
        .map(|p| {
            let variants = p
                .component
                .as_deref()
                .and_then(|c| project.component(c))
                .map(|c| c.variants().iter().map(|v| v.name.clone()).collect())
                .unwrap_or_default();
            PublicationReport {
                name: p.name().to_string(),
                coordinates: p.coordinates(),
                component: p.component.clone(),
                variants,
                artifacts: p.artifacts.clone(),
                original_file_names: p.original_file_names,
            }
        })
        .collect()
}

pub fn tasks(project: &Project) -> ModelResult<Vec<TaskReport>> {
    project
        .tasks()
        .map(|t| -> ModelResult<TaskReport> {
            let (kind, detail) = match &t.kind {
                TaskKind::SourcesArchive(a) => (
                    "sources-archive",
                    format!("{}/{} ({})", a.target, a.compilation, a.classifier),
                ),
                TaskKind::Publish(p) => ("publish", format!("{} -> {}", p.publication, p.repository)),
            };
            Ok(TaskReport {
                name: t.name().to_string(),
                kind,
                detail,
                decision: project.decide(t.name())?,
            })
        })
        .collect()
}

// =============================================================================
// Text output
// =============================================================================

pub fn format_targets(reports: &[TargetReport]) -> String {
    let mut out = String::new();
    for t in reports {
        let preset = t.preset.as_deref().unwrap_or("-");
        let publish = if t.publishable { "" } else { " (not published)" };
        let _ = writeln!(out, "{} [{}, preset {}]{}", t.name, t.platform, preset, publish);
        for c in &t.compilations {
            let _ = writeln!(out, "  {} -> {}", c.name, c.default_source_set);
            for (key, value) in &c.attributes {
                let value = value.as_deref().unwrap_or("<unset>");
                let _ = writeln!(out, "      {} = {}", key, value);
            }
        }
    }
    out
}

pub fn format_presets(reports: &[PresetReport]) -> String {
    let width = reports.iter().map(|p| p.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for p in reports {
        let _ = writeln!(out, "{:width$}  {}", p.name, p.platform, width = width);
    }
    out
}

pub fn format_source_sets(reports: &[SourceSetReport]) -> String {
    let mut out = String::new();
    for s in reports {
        if s.depends_on.is_empty() {
            let _ = writeln!(out, "{}", s.name);
        } else {
            let _ = writeln!(out, "{} -> {}", s.name, s.depends_on.join(", "));
        }
    }
    out
}

pub fn format_publications(reports: &[PublicationReport]) -> String {
    let mut out = String::new();
    for p in reports {
        let _ = writeln!(out, "{} ({})", p.name, p.coordinates);
        if !p.variants.is_empty() {
            let _ = writeln!(out, "  variants: {}", p.variants.join(", "));
        }
        for a in &p.artifacts {
            let classifier = a.classifier.as_deref().unwrap_or("-");
            let _ = writeln!(out, "  artifact: {} [{}.{}]", a.task, classifier, a.extension);
        }
    }
    out
}

pub fn format_tasks(reports: &[TaskReport]) -> String {
    let mut out = String::new();
    for t in reports {
        let decision = match &t.decision {
            TaskDecision::Run => "run".to_string(),
            TaskDecision::Skip(reason) => format!("skip: {}", reason),
        };
        let _ = writeln!(out, "{} [{}] {} ({})", t.name, t.kind, t.detail, decision);
    }
    out
}
