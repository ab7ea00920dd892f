//! Target definitions - what gets built for each platform.
//!
//! A Target is a named, platform-specific build output unit. It owns a
//! live collection of compilations and the configure actions that run
//! against its publication.

use std::fmt;
use std::rc::Rc;

use crate::core::compilation::{Compilation, MAIN_COMPILATION};
use crate::core::platform::{NativeTarget, PlatformType};
use crate::core::project::Project;
use crate::core::publication::Publication;
use crate::util::errors::ModelResult;
use crate::util::live::{LiveCollection, Named};
use crate::util::naming::lower_camel_case;

/// Reserved name of the shared-code target.
pub const METADATA_TARGET_NAME: &str = "metadata";

/// An action run once against a target's publication.
#[derive(Clone)]
pub struct PublicationAction(Rc<dyn Fn(&mut Publication)>);

impl PublicationAction {
    pub fn new(action: impl Fn(&mut Publication) + 'static) -> Self {
        PublicationAction(Rc::new(action))
    }

    pub fn execute(&self, publication: &mut Publication) {
        (self.0)(publication)
    }
}

impl fmt::Debug for PublicationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PublicationAction")
    }
}

/// Options a preset honours when creating a target.
#[derive(Debug, Clone, Default)]
pub struct TargetOptions {
    /// Override the preset's default publishability
    pub publishable: Option<bool>,
}

/// A build target.
#[derive(Debug)]
pub struct Target {
    name: String,
    platform: PlatformType,
    native_target: Option<NativeTarget>,
    preset: Option<String>,
    publishable: bool,
    compilations: LiveCollection<Compilation, Project>,
    publication_actions: Vec<PublicationAction>,
}

impl Target {
    pub fn new(name: impl Into<String>, platform: PlatformType) -> Self {
        Target {
            name: name.into(),
            platform,
            native_target: None,
            preset: None,
            publishable: true,
            compilations: LiveCollection::new("compilation"),
            publication_actions: Vec::new(),
        }
    }

    pub fn with_publishable(mut self, publishable: bool) -> Self {
        self.publishable = publishable;
        self
    }

    pub fn with_native_target(mut self, native_target: NativeTarget) -> Self {
        self.native_target = Some(native_target);
        self
    }

    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = Some(preset.into());
        self
    }

    /// Add a compilation before the target is registered.
    ///
    /// Once registered, compilations must go through
    /// `Project::add_compilation` so that subscribers observe them.
    pub fn with_compilation(mut self, compilation: Compilation) -> ModelResult<Self> {
        self.compilations.insert(compilation)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn platform(&self) -> PlatformType {
        self.platform
    }

    pub fn native_target(&self) -> Option<NativeTarget> {
        self.native_target
    }

    /// Name of the preset the target was created from.
    pub fn preset(&self) -> Option<&str> {
        self.preset.as_deref()
    }

    pub fn is_publishable(&self) -> bool {
        self.publishable
    }

    pub fn compilation(&self, name: &str) -> Option<&Compilation> {
        self.compilations.get(name)
    }

    pub fn main_compilation(&self) -> Option<&Compilation> {
        self.compilations.get(MAIN_COMPILATION)
    }

    pub fn compilations(&self) -> impl Iterator<Item = &Compilation> {
        self.compilations.iter()
    }

    pub fn compilation_names(&self) -> Vec<String> {
        self.compilations.names()
    }

    pub(crate) fn compilation_collection(&mut self) -> &mut LiveCollection<Compilation, Project> {
        &mut self.compilations
    }

    pub(crate) fn compilation_mut(&mut self, name: &str) -> Option<&mut Compilation> {
        self.compilations.get_mut(name)
    }

    pub fn publication_actions(&self) -> &[PublicationAction] {
        &self.publication_actions
    }

    pub(crate) fn push_publication_action(&mut self, action: PublicationAction) {
        self.publication_actions.push(action);
    }

    /// Name of the component describing this target's publishable artifacts.
    pub fn component_name(&self) -> &str {
        &self.name
    }

    pub fn api_elements_configuration(&self) -> String {
        lower_camel_case([self.name.as_str(), "apiElements"])
    }

    pub fn runtime_elements_configuration(&self) -> String {
        lower_camel_case([self.name.as_str(), "runtimeElements"])
    }

    pub fn default_configuration(&self) -> String {
        lower_camel_case([self.name.as_str(), "default"])
    }

    /// `apiElements`, `runtimeElements` and `default`, in that order.
    pub fn canonical_configurations(&self) -> [String; 3] {
        [
            self.api_elements_configuration(),
            self.runtime_elements_configuration(),
            self.default_configuration(),
        ]
    }

    /// `{projectName}-{lowercase(targetName)}`
    pub fn default_artifact_id(&self, project_name: &str) -> String {
        format!("{}-{}", project_name, self.name.to_lowercase())
    }

    pub fn sources_archive_task(&self) -> String {
        lower_camel_case([self.name.as_str(), "sourcesJar"])
    }
}

impl Named for Target {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_names() {
        let target = Target::new("iosArm64", PlatformType::Native);

        assert_eq!(target.api_elements_configuration(), "iosArm64ApiElements");
        assert_eq!(
            target.runtime_elements_configuration(),
            "iosArm64RuntimeElements"
        );
        assert_eq!(target.default_configuration(), "iosArm64Default");
        assert_eq!(target.default_artifact_id("lib"), "lib-iosarm64");
        assert_eq!(target.sources_archive_task(), "iosArm64SourcesJar");
    }

    #[test]
    fn test_duplicate_compilation_rejected() {
        let target = Target::new("jvm", PlatformType::Jvm)
            .with_compilation(Compilation::new("jvm", "main"))
            .unwrap();

        assert!(target
            .with_compilation(Compilation::new("jvm", "main"))
            .is_err());
    }

    #[test]
    fn test_main_compilation_lookup() {
        let target = Target::new("android", PlatformType::AndroidJvm)
            .with_compilation(Compilation::new("android", "debug"))
            .unwrap();

        assert!(target.main_compilation().is_none());
        assert!(target.compilation("debug").is_some());
    }
}
