//! Project - the host-side state the multiplatform model configures.
//!
//! The project owns every live collection (targets, configurations,
//! components, publications, tasks), the source-set graph, plugin presence
//! and the after-evaluate barrier. All registration is live: a subscriber
//! sees the elements present when it subscribes and every element added
//! later.

use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::compilation::Compilation;
use crate::core::component::SoftwareComponent;
use crate::core::configuration::{Configuration, ConfigurationRole};
use crate::core::publication::Publication;
use crate::core::source_set::SourceSetGraph;
use crate::core::target::{PublicationAction, Target};
use crate::core::task::{Task, TaskDecision, TaskGate};
use crate::util::config::Config;
use crate::util::errors::{ModelError, ModelResult};
use crate::util::live::{dispatch, Hook, LiveCollection, Named};

/// Identity used for publications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIdentity {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl ProjectIdentity {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        ProjectIdentity {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Lifecycle phase of the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Plugins register presets, hooks and built-in targets
    PluginApply,
    /// User configuration mutates targets, compilations and source sets
    Configuration,
    /// After-evaluate callbacks are running
    AfterEvaluate,
    /// Configuration is final
    Evaluated,
}

type Callback = Box<dyn FnOnce(&mut Project) -> ModelResult<()>>;
type PluginHook = Rc<dyn Fn(&mut Project) -> ModelResult<()>>;

fn targets_of(p: &mut Project) -> &mut LiveCollection<Target, Project> {
    &mut p.targets
}

fn configurations_of(p: &mut Project) -> &mut LiveCollection<Configuration, Project> {
    &mut p.configurations
}

fn components_of(p: &mut Project) -> &mut LiveCollection<SoftwareComponent, Project> {
    &mut p.components
}

fn publications_of(p: &mut Project) -> &mut LiveCollection<Publication, Project> {
    &mut p.publications
}

fn tasks_of(p: &mut Project) -> &mut LiveCollection<Task, Project> {
    &mut p.tasks
}

/// A project being configured.
pub struct Project {
    identity: ProjectIdentity,
    dir: PathBuf,
    config: Config,
    phase: Phase,
    plugins: Vec<String>,
    plugin_hooks: Vec<(String, PluginHook)>,
    after_evaluate: VecDeque<Callback>,
    /// First error raised while draining the barrier
    evaluation_failure: Option<String>,
    targets: LiveCollection<Target, Project>,
    source_sets: SourceSetGraph,
    configurations: LiveCollection<Configuration, Project>,
    components: LiveCollection<SoftwareComponent, Project>,
    publications: LiveCollection<Publication, Project>,
    tasks: LiveCollection<Task, Project>,
}

impl Project {
    /// Create a project rooted at `dir`. `config` is the typed configuration
    /// root every component reads its settings from.
    pub fn new(identity: ProjectIdentity, dir: impl Into<PathBuf>, config: Config) -> Self {
        Project {
            identity,
            dir: dir.into(),
            config,
            phase: Phase::PluginApply,
            plugins: Vec::new(),
            plugin_hooks: Vec::new(),
            after_evaluate: VecDeque::new(),
            evaluation_failure: None,
            targets: LiveCollection::new("target"),
            source_sets: SourceSetGraph::new(),
            configurations: LiveCollection::new("configuration"),
            components: LiveCollection::new("component"),
            publications: LiveCollection::new("publication"),
            tasks: LiveCollection::new("task"),
        }
    }

    pub fn identity(&self) -> &ProjectIdentity {
        &self.identity
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Leave the plugin-apply phase.
    pub fn begin_configuration(&mut self) {
        if self.phase == Phase::PluginApply {
            self.phase = Phase::Configuration;
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.phase == Phase::Evaluated
    }

    /// Fail unless the project has been evaluated.
    pub fn require_evaluated(&self, what: impl Into<String>) -> ModelResult<()> {
        if self.is_evaluated() {
            Ok(())
        } else {
            Err(ModelError::NotYetEvaluated { what: what.into() })
        }
    }

    /// Run `callback` once all configuration has been applied.
    ///
    /// Callbacks run in registration order. One registered while the barrier
    /// is draining runs in the same drain; one registered after evaluation
    /// runs immediately. Once evaluation has failed nothing is queued.
    pub fn after_evaluate(
        &mut self,
        callback: impl FnOnce(&mut Project) -> ModelResult<()> + 'static,
    ) -> ModelResult<()> {
        self.check_not_failed()?;
        if self.is_evaluated() {
            return callback(self);
        }
        self.after_evaluate.push_back(Box::new(callback));
        Ok(())
    }

    /// Pass the after-evaluate barrier.
    ///
    /// A failing callback is fatal: the project stays unevaluated and every
    /// later `evaluate` or `after_evaluate` call reports the first failure.
    pub fn evaluate(&mut self) -> ModelResult<()> {
        self.check_not_failed()?;
        match self.phase {
            Phase::Evaluated => {
                tracing::debug!("Project {} already evaluated", self.identity.name);
                return Ok(());
            }
            Phase::AfterEvaluate => {
                return Err(ModelError::EvaluationFailed {
                    reason: "evaluate was called while the barrier was draining".to_string(),
                });
            }
            Phase::PluginApply | Phase::Configuration => {}
        }

        self.phase = Phase::AfterEvaluate;
        tracing::debug!(
            "Running {} after-evaluate callbacks",
            self.after_evaluate.len()
        );
        while let Some(callback) = self.after_evaluate.pop_front() {
            if let Err(e) = callback(self) {
                self.evaluation_failure = Some(e.to_string());
                self.after_evaluate.clear();
                return Err(e);
            }
        }
        self.phase = Phase::Evaluated;

        tracing::info!(
            "Evaluated project {} ({} targets, {} publications)",
            self.identity.name,
            self.targets.len(),
            self.publications.len()
        );
        Ok(())
    }

    /// Whether the after-evaluate barrier failed.
    pub fn evaluation_failed(&self) -> bool {
        self.evaluation_failure.is_some()
    }

    fn check_not_failed(&self) -> ModelResult<()> {
        match &self.evaluation_failure {
            Some(reason) => Err(ModelError::EvaluationFailed {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Plugins
    // =========================================================================

    /// Mark a plugin as applied and run the hooks waiting for it.
    pub fn apply_plugin(&mut self, id: &str) -> ModelResult<()> {
        if self.has_plugin(id) {
            return Ok(());
        }
        tracing::debug!("Applying plugin {}", id);
        self.plugins.push(id.to_string());

        let hooks: Vec<PluginHook> = self
            .plugin_hooks
            .iter()
            .filter(|(plugin, _)| plugin == id)
            .map(|(_, hook)| hook.clone())
            .collect();
        for hook in hooks {
            hook(self)?;
        }
        Ok(())
    }

    pub fn has_plugin(&self, id: &str) -> bool {
        self.plugins.iter().any(|p| p == id)
    }

    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Run `hook` when plugin `id` is applied, now if it already is.
    pub fn with_plugin(
        &mut self,
        id: &str,
        hook: impl Fn(&mut Project) -> ModelResult<()> + 'static,
    ) -> ModelResult<()> {
        let hook: PluginHook = Rc::new(hook);
        self.plugin_hooks.push((id.to_string(), hook.clone()));
        if self.has_plugin(id) {
            hook(self)?;
        }
        Ok(())
    }

    // =========================================================================
    // Live collection plumbing
    // =========================================================================

    fn insert_live<T: Named>(
        &mut self,
        item: T,
        collection: fn(&mut Project) -> &mut LiveCollection<T, Project>,
    ) -> ModelResult<()> {
        let name = item.name().to_string();
        collection(self).insert(item)?;
        let hooks = collection(self).hooks();
        dispatch(self, &hooks, &[name])
    }

    fn subscribe_live<T: Named>(
        &mut self,
        hook: Hook<Project>,
        collection: fn(&mut Project) -> &mut LiveCollection<T, Project>,
    ) -> ModelResult<()> {
        let existing = collection(self).subscribe(hook.clone());
        dispatch(self, &[hook], &existing)
    }

    // =========================================================================
    // Targets and compilations
    // =========================================================================

    /// Register a target and notify target subscribers.
    pub fn add_target(&mut self, target: Target) -> ModelResult<()> {
        tracing::debug!("Registering target {}", target.name());
        self.insert_live(target, targets_of)
    }

    /// Subscribe to every current and future target.
    pub fn all_targets(
        &mut self,
        hook: impl Fn(&mut Project, &str) -> ModelResult<()> + 'static,
    ) -> ModelResult<()> {
        self.subscribe_live(Rc::new(hook), targets_of)
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    pub fn has_target(&self, name: &str) -> bool {
        self.targets.contains(name)
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn target_names(&self) -> Vec<String> {
        self.targets.names()
    }

    fn target_mut(&mut self, name: &str) -> ModelResult<&mut Target> {
        self.targets
            .get_mut(name)
            .ok_or_else(|| ModelError::UnknownTarget(name.to_string()))
    }

    /// Add a compilation to a registered target and notify its subscribers.
    pub fn add_compilation(&mut self, target: &str, compilation: Compilation) -> ModelResult<()> {
        let name = compilation.name().to_string();
        let collection = self.target_mut(target)?.compilation_collection();
        collection.insert(compilation)?;
        let hooks = collection.hooks();
        tracing::debug!("Registered compilation {}/{}", target, name);
        dispatch(self, &hooks, &[name])
    }

    /// Subscribe to every current and future compilation of `target`.
    pub fn all_compilations(
        &mut self,
        target: &str,
        hook: impl Fn(&mut Project, &str) -> ModelResult<()> + 'static,
    ) -> ModelResult<()> {
        let hook: Hook<Project> = Rc::new(hook);
        let existing = self
            .target_mut(target)?
            .compilation_collection()
            .subscribe(hook.clone());
        dispatch(self, &[hook], &existing)
    }

    pub fn compilation(&self, target: &str, name: &str) -> Option<&Compilation> {
        self.targets.get(target).and_then(|t| t.compilation(name))
    }

    pub fn compilation_mut(&mut self, target: &str, name: &str) -> ModelResult<&mut Compilation> {
        self.target_mut(target)?
            .compilation_mut(name)
            .ok_or_else(|| ModelError::UnknownCompilation {
                target: target.to_string(),
                compilation: name.to_string(),
            })
    }

    /// Register an action to run exactly once against the publication of
    /// `target`, whether that publication exists yet or not.
    pub fn add_publication_action(
        &mut self,
        target: &str,
        action: PublicationAction,
    ) -> ModelResult<()> {
        self.target_mut(target)?.push_publication_action(action);
        self.run_publication_actions(target)
    }

    /// Run the target's publication actions that have not yet run against
    /// its publication. No-op while the publication does not exist.
    pub(crate) fn run_publication_actions(&mut self, target: &str) -> ModelResult<()> {
        let actions = self.target_mut(target)?.publication_actions().to_vec();
        let Some(publication) = self.publications.get_mut(target) else {
            return Ok(());
        };
        if publication.target.as_deref() != Some(target) {
            return Ok(());
        }

        for action in &actions[publication.actions_applied()..] {
            action.execute(publication);
        }
        publication.set_actions_applied(actions.len());
        Ok(())
    }

    // =========================================================================
    // Source sets
    // =========================================================================

    pub fn source_sets(&self) -> &SourceSetGraph {
        &self.source_sets
    }

    pub fn source_sets_mut(&mut self) -> &mut SourceSetGraph {
        &mut self.source_sets
    }

    // =========================================================================
    // Configurations
    // =========================================================================

    pub fn add_configuration(&mut self, configuration: Configuration) -> ModelResult<()> {
        self.insert_live(configuration, configurations_of)
    }

    /// Create the configuration unless it exists. Returns true if created.
    pub fn maybe_create_configuration(
        &mut self,
        name: &str,
        role: ConfigurationRole,
    ) -> ModelResult<bool> {
        if self.configurations.contains(name) {
            return Ok(false);
        }
        self.add_configuration(Configuration::new(name, role))?;
        Ok(true)
    }

    pub fn all_configurations(
        &mut self,
        hook: impl Fn(&mut Project, &str) -> ModelResult<()> + 'static,
    ) -> ModelResult<()> {
        self.subscribe_live(Rc::new(hook), configurations_of)
    }

    pub fn configuration(&self, name: &str) -> Option<&Configuration> {
        self.configurations.get(name)
    }

    pub fn configuration_mut(&mut self, name: &str) -> Option<&mut Configuration> {
        self.configurations.get_mut(name)
    }

    pub fn configurations(&self) -> impl Iterator<Item = &Configuration> {
        self.configurations.iter()
    }

    // =========================================================================
    // Components and publications
    // =========================================================================

    pub fn add_component(&mut self, component: SoftwareComponent) -> ModelResult<()> {
        self.insert_live(component, components_of)
    }

    pub fn all_components(
        &mut self,
        hook: impl Fn(&mut Project, &str) -> ModelResult<()> + 'static,
    ) -> ModelResult<()> {
        self.subscribe_live(Rc::new(hook), components_of)
    }

    pub fn component(&self, name: &str) -> Option<&SoftwareComponent> {
        self.components.get(name)
    }

    pub fn component_mut(&mut self, name: &str) -> Option<&mut SoftwareComponent> {
        self.components.get_mut(name)
    }

    pub fn components(&self) -> impl Iterator<Item = &SoftwareComponent> {
        self.components.iter()
    }

    pub fn add_publication(&mut self, publication: Publication) -> ModelResult<()> {
        tracing::debug!(
            "Registering publication {} ({})",
            publication.name(),
            publication.coordinates()
        );
        self.insert_live(publication, publications_of)
    }

    pub fn all_publications(
        &mut self,
        hook: impl Fn(&mut Project, &str) -> ModelResult<()> + 'static,
    ) -> ModelResult<()> {
        self.subscribe_live(Rc::new(hook), publications_of)
    }

    pub fn publication(&self, name: &str) -> Option<&Publication> {
        self.publications.get(name)
    }

    pub fn publication_mut(&mut self, name: &str) -> Option<&mut Publication> {
        self.publications.get_mut(name)
    }

    pub fn publications(&self) -> impl Iterator<Item = &Publication> {
        self.publications.iter()
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    pub fn add_task(&mut self, task: Task) -> ModelResult<()> {
        self.insert_live(task, tasks_of)
    }

    pub fn all_tasks(
        &mut self,
        hook: impl Fn(&mut Project, &str) -> ModelResult<()> + 'static,
    ) -> ModelResult<()> {
        self.subscribe_live(Rc::new(hook), tasks_of)
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    pub fn task_mut(&mut self, name: &str) -> Option<&mut Task> {
        self.tasks.get_mut(name)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Decide whether `task` runs, checking its gates against the configuration.
    pub fn decide(&self, task: &str) -> ModelResult<TaskDecision> {
        let task = self
            .tasks
            .get(task)
            .ok_or_else(|| ModelError::UnknownTask(task.to_string()))?;

        for gate in &task.only_if {
            match gate {
                TaskGate::MetadataPublishingEnabled => {
                    if !self.config.metadata_publishing_enabled() {
                        return Ok(TaskDecision::Skip(
                            "metadata publishing is disabled".to_string(),
                        ));
                    }
                }
            }
        }
        Ok(TaskDecision::Run)
    }
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("identity", &self.identity)
            .field("dir", &self.dir)
            .field("phase", &self.phase)
            .field("plugins", &self.plugins)
            .field("targets", &self.targets.names())
            .field("source_sets", &self.source_sets.len())
            .field("publications", &self.publications.names())
            .field("pending_after_evaluate", &self.after_evaluate.len())
            .field("evaluation_failure", &self.evaluation_failure)
            .finish()
    }
}
