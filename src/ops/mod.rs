//! High-level operations.
//!
//! This module wires the model together the way the multiplatform plugin
//! does, and builds projects from manifests.

pub mod attributes;
pub mod load;
pub mod plugin;
pub mod publishing;
pub mod report;
pub mod source_sets;
pub mod sources;
pub mod targets;

pub use load::{
    configure_project, load_project, load_project_with_opts, LoadOptions, LoadedProject,
};
pub use plugin::{apply, Multiplatform, ANDROID_PLUGINS, MULTIPLATFORM_PLUGIN};
pub use publishing::{configure_publishing, publish_task_name, MAVEN_PUBLISH_PLUGIN};
pub use targets::{create_target, create_target_from_preset_name, TargetScope};
