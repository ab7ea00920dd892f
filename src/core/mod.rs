//! Core data structures for Multitarget.
//!
//! This module contains the foundational types of the build model:
//! - Platforms, presets and targets
//! - Compilations, attribute bags and configurations
//! - The source-set graph
//! - Components, publications and task descriptions
//! - The project that owns them all

pub mod attributes;
pub mod compilation;
pub mod component;
pub mod configuration;
pub mod manifest;
pub mod platform;
pub mod preset;
pub mod project;
pub mod publication;
pub mod source_set;
pub mod target;
pub mod task;

pub use attributes::{AttributeBag, AttributeKey, AttributeKind, AttributeValue};
pub use compilation::Compilation;
pub use component::{SoftwareComponent, Variant};
pub use configuration::{Configuration, ConfigurationRole};
pub use manifest::{find_manifest, Manifest, MANIFEST_NAME};
pub use platform::{HostManager, HostOs, NativeTarget, PlatformType};
pub use preset::{PresetRegistry, TargetPreset};
pub use project::{Phase, Project, ProjectIdentity};
pub use publication::{Publication, Repository};
pub use source_set::{SourceSet, SourceSetGraph};
pub use target::{Target, TargetOptions};
pub use task::{Task, TaskDecision, TaskKind};
