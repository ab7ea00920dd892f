//! Variant and publication assembly.
//!
//! Everything here runs only once the `maven-publish` plugin is present.
//! The aggregate `kotlin` component spans every target; the root
//! `kotlinMultiplatform` publication publishes it. Each publishable target
//! additionally gets a publication of its own.

use crate::core::component::{SoftwareComponent, Variant, AGGREGATE_COMPONENT};
use crate::core::compilation::MAIN_COMPILATION;
use crate::core::project::Project;
use crate::core::publication::{Publication, PublishedArtifact, Repository, ROOT_PUBLICATION};
use crate::core::task::{PublishTask, Task, TaskGate, TaskKind, SOURCES_CLASSIFIER};
use crate::util::errors::{ModelError, ModelResult};
use crate::util::naming::capitalize;

/// Id of the publishing plugin.
pub const MAVEN_PUBLISH_PLUGIN: &str = "maven-publish";

/// `publish{Publication}PublicationTo{Repository}`, with a `Repository`
/// suffix for remote repositories.
pub fn publish_task_name(publication: &str, repository: &Repository) -> String {
    let suffix = if repository.is_local() { "" } else { "Repository" };
    format!(
        "publish{}PublicationTo{}{}",
        capitalize(publication),
        capitalize(&repository.name),
        suffix
    )
}

/// Assemble publications whenever the publishing plugin is applied.
pub fn configure_publishing(project: &mut Project) -> ModelResult<()> {
    project.with_plugin(MAVEN_PUBLISH_PLUGIN, assemble)
}

fn assemble(project: &mut Project) -> ModelResult<()> {
    tracing::debug!("Assembling publications");

    register_publish_tasks(project)?;
    gate_root_publish_tasks(project)?;

    project.add_component(SoftwareComponent::aggregate())?;

    let identity = project.identity().clone();
    let mut root = Publication::new(
        ROOT_PUBLICATION,
        identity.group,
        identity.name,
        identity.version,
    );
    root.from_component(AGGREGATE_COMPONENT);
    root.original_file_names = true;
    project.add_publication(root)?;

    project.all_targets(|p, target| {
        register_target_component(p, target)?;
        create_target_publication(p, target)
    })
}

/// Publish tasks for every publication and repository.
fn register_publish_tasks(project: &mut Project) -> ModelResult<()> {
    project.all_publications(|p, publication| {
        let repositories = p.config().repositories();
        for repository in repositories {
            let name = publish_task_name(publication, &repository);
            p.add_task(Task::new(
                name,
                TaskKind::Publish(PublishTask {
                    publication: publication.to_string(),
                    repository: repository.name.clone(),
                }),
            ))?;
        }
        Ok(())
    })
}

/// The root publication's publish tasks run only when metadata publishing
/// is enabled.
fn gate_root_publish_tasks(project: &mut Project) -> ModelResult<()> {
    project.all_tasks(|p, name| {
        let is_root = p
            .task(name)
            .and_then(|t| t.as_publish())
            .is_some_and(|t| t.publication == ROOT_PUBLICATION);
        if is_root {
            if let Some(task) = p.task_mut(name) {
                task.only_if(TaskGate::MetadataPublishingEnabled);
            }
        }
        Ok(())
    })
}

/// Register the target's component and add its variant to the aggregate.
fn register_target_component(project: &mut Project, target: &str) -> ModelResult<()> {
    let t = project
        .target(target)
        .ok_or_else(|| ModelError::UnknownTarget(target.to_string()))?;
    let component = SoftwareComponent::for_target(t);
    let variant = Variant::for_target(t);

    project.add_component(component)?;
    if let Some(aggregate) = project.component_mut(AGGREGATE_COMPONENT) {
        aggregate.add_variant(variant);
    }
    Ok(())
}

/// Create the standalone publication of a publishable target.
fn create_target_publication(project: &mut Project, target: &str) -> ModelResult<()> {
    let t = project
        .target(target)
        .ok_or_else(|| ModelError::UnknownTarget(target.to_string()))?;
    if !t.is_publishable() {
        tracing::debug!("Target {} is not publishable", target);
        return Ok(());
    }

    let identity = project.identity();
    let mut publication = Publication::new(
        target,
        identity.group.clone(),
        t.default_artifact_id(&identity.name),
        identity.version.clone(),
    );
    publication.from_component(t.component_name());
    publication.target = Some(target.to_string());

    project.add_publication(publication)?;
    project.run_publication_actions(target)?;

    let target = target.to_string();
    project.after_evaluate(move |p| attach_sources_archive(p, &target))
}

/// Attach the sources archive of a target that has `main`.
fn attach_sources_archive(project: &mut Project, target: &str) -> ModelResult<()> {
    if project.compilation(target, MAIN_COMPILATION).is_none() {
        return Ok(());
    }
    let Some(task) = project.target(target).map(|t| t.sources_archive_task()) else {
        return Ok(());
    };
    if project.task(&task).is_none() {
        return Ok(());
    }

    if let Some(publication) = project.publication_mut(target) {
        publication.add_artifact(PublishedArtifact {
            task,
            classifier: Some(SOURCES_CLASSIFIER.to_string()),
            extension: "jar".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preset::{AndroidPreset, JsPreset, JvmPreset};
    use crate::core::project::ProjectIdentity;
    use crate::core::target::TargetOptions;
    use crate::core::task::TaskDecision;
    use crate::ops::source_sets::{create_roots, wire_default_source_sets};
    use crate::ops::sources::configure_sources_archives;
    use crate::ops::targets::create_target;
    use crate::util::config::{Config, RepositoryConfig};

    fn project(config: Config) -> Project {
        let mut p = Project::new(ProjectIdentity::new("com.acme", "lib", "1.0"), "/p", config);
        create_roots(&mut p).unwrap();
        wire_default_source_sets(&mut p).unwrap();
        configure_sources_archives(&mut p).unwrap();
        configure_publishing(&mut p).unwrap();
        p
    }

    #[test]
    fn test_task_names() {
        assert_eq!(
            publish_task_name("kotlinMultiplatform", &Repository::maven_local()),
            "publishKotlinMultiplatformPublicationToMavenLocal"
        );
        assert_eq!(
            publish_task_name("jvm", &Repository::remote("internal", "https://r")),
            "publishJvmPublicationToInternalRepository"
        );
    }

    #[test]
    fn test_nothing_without_plugin() {
        let mut p = project(Config::default());
        create_target(&mut p, &JvmPreset, "jvm", &TargetOptions::default(), |_| Ok(())).unwrap();
        p.evaluate().unwrap();

        assert_eq!(p.publications().count(), 0);
        assert!(p.component(AGGREGATE_COMPONENT).is_none());
    }

    #[test]
    fn test_plugin_applied_late_sees_existing_targets() {
        let mut p = project(Config::default());
        create_target(&mut p, &JvmPreset, "jvm", &TargetOptions::default(), |_| Ok(())).unwrap();
        p.apply_plugin(MAVEN_PUBLISH_PLUGIN).unwrap();

        let jvm = p.publication("jvm").unwrap();
        assert_eq!(jvm.artifact_id, "lib-jvm");
        assert_eq!(jvm.component.as_deref(), Some("jvm"));
        assert!(p.publication(ROOT_PUBLICATION).unwrap().original_file_names);
    }

    #[test]
    fn test_unpublishable_target_only_in_aggregate() {
        let mut p = project(Config::default());
        p.apply_plugin(MAVEN_PUBLISH_PLUGIN).unwrap();
        create_target(&mut p, &JvmPreset, "jvm", &TargetOptions::default(), |_| Ok(())).unwrap();
        let js = TargetOptions {
            publishable: Some(false),
        };
        create_target(&mut p, &JsPreset, "js", &js, |_| Ok(())).unwrap();

        assert!(p.publication("js").is_none());
        let aggregate = p.component(AGGREGATE_COMPONENT).unwrap();
        let names: Vec<&str> = aggregate.variants().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["jvm", "js"]);
        assert!(p.component("js").is_some());
    }

    #[test]
    fn test_publication_actions_run_once() {
        let mut p = project(Config::default());
        create_target(&mut p, &JvmPreset, "jvm", &TargetOptions::default(), |scope| {
            scope.on_publication(|publication| publication.version.push_str("-a"))
        })
        .unwrap();

        p.apply_plugin(MAVEN_PUBLISH_PLUGIN).unwrap();
        assert_eq!(p.publication("jvm").unwrap().version, "1.0-a");

        // Added after the publication exists: runs once, immediately
        p.add_publication_action(
            "jvm",
            crate::core::target::PublicationAction::new(|publication| {
                publication.version.push_str("-b")
            }),
        )
        .unwrap();
        p.evaluate().unwrap();
        assert_eq!(p.publication("jvm").unwrap().version, "1.0-a-b");
    }

    #[test]
    fn test_sources_attached_after_barrier() {
        let mut p = project(Config::default());
        p.apply_plugin(MAVEN_PUBLISH_PLUGIN).unwrap();
        create_target(&mut p, &JvmPreset, "jvm", &TargetOptions::default(), |_| Ok(())).unwrap();
        let android = TargetOptions {
            publishable: Some(true),
        };
        create_target(&mut p, &AndroidPreset, "android", &android, |_| Ok(())).unwrap();

        assert!(p.publication("jvm").unwrap().artifacts.is_empty());
        p.evaluate().unwrap();

        let jvm = p.publication("jvm").unwrap();
        assert_eq!(jvm.artifacts.len(), 1);
        assert_eq!(jvm.artifacts[0].task, "jvmSourcesJar");
        assert_eq!(jvm.artifacts[0].classifier.as_deref(), Some("sources"));
        assert!(p.publication("android").unwrap().artifacts.is_empty());
    }

    #[test]
    fn test_root_publish_gated() {
        let mut config = Config::default();
        config.features.metadata_publishing = Some(false);
        config.publishing.repositories.push(RepositoryConfig {
            name: "internal".to_string(),
            url: "https://repo.acme.com".to_string(),
        });
        let mut p = project(config);
        p.apply_plugin(MAVEN_PUBLISH_PLUGIN).unwrap();
        create_target(&mut p, &JvmPreset, "jvm", &TargetOptions::default(), |_| Ok(())).unwrap();

        for repo in ["MavenLocal", "InternalRepository"] {
            let root = format!("publishKotlinMultiplatformPublicationTo{}", repo);
            let jvm = format!("publishJvmPublicationTo{}", repo);
            assert!(matches!(p.decide(&root).unwrap(), TaskDecision::Skip(_)));
            assert_eq!(p.decide(&jvm).unwrap(), TaskDecision::Run);
        }
    }

    #[test]
    fn test_duplicate_publication_rejected() {
        let mut p = project(Config::default());
        p.apply_plugin(MAVEN_PUBLISH_PLUGIN).unwrap();
        let err = p
            .add_publication(Publication::new(ROOT_PUBLICATION, "g", "a", "1"))
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::NamingConflict {
                kind: "publication",
                ..
            }
        ));
    }
}
