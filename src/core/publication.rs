//! Publications - named, versioned aggregates of variants.

use serde::Serialize;

use crate::util::live::Named;

/// Name of the root publication aggregating all targets.
pub const ROOT_PUBLICATION: &str = "kotlinMultiplatform";

/// An extra artifact attached to a publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedArtifact {
    /// Task producing the artifact
    pub task: String,
    pub classifier: Option<String>,
    pub extension: String,
}

/// A maven-style publication.
#[derive(Debug, Clone, Serialize)]
pub struct Publication {
    name: String,
    pub group: String,
    pub artifact_id: String,
    pub version: String,
    /// Component whose variants make up the publication
    pub component: Option<String>,
    /// Target the publication was created for, if any
    pub target: Option<String>,
    pub artifacts: Vec<PublishedArtifact>,
    /// Publish artifacts under their original file names
    pub original_file_names: bool,
    #[serde(skip)]
    actions_applied: usize,
}

impl Publication {
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Publication {
            name: name.into(),
            group: group.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            component: None,
            target: None,
            artifacts: Vec::new(),
            original_file_names: false,
            actions_applied: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_root(&self) -> bool {
        self.name == ROOT_PUBLICATION
    }

    /// Attach the content of a component.
    pub fn from_component(&mut self, component: impl Into<String>) {
        self.component = Some(component.into());
    }

    /// Attach an artifact, ignoring an identical one already attached.
    pub fn add_artifact(&mut self, artifact: PublishedArtifact) {
        if !self.artifacts.contains(&artifact) {
            self.artifacts.push(artifact);
        }
    }

    /// `group:artifactId:version`
    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group, self.artifact_id, self.version)
    }

    /// Number of target publication actions already run against this publication.
    pub(crate) fn actions_applied(&self) -> usize {
        self.actions_applied
    }

    pub(crate) fn set_actions_applied(&mut self, n: usize) {
        self.actions_applied = n;
    }
}

impl Named for Publication {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A repository publications are uploaded to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    pub name: String,
    /// `None` for the local repository
    pub url: Option<String>,
}

impl Repository {
    pub fn maven_local() -> Self {
        Repository {
            name: "mavenLocal".to_string(),
            url: None,
        }
    }

    pub fn remote(name: impl Into<String>, url: impl Into<String>) -> Self {
        Repository {
            name: name.into(),
            url: Some(url.into()),
        }
    }

    pub fn is_local(&self) -> bool {
        self.url.is_none()
    }
}
