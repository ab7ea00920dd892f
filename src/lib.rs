//! Multitarget - a multiplatform build model
//!
//! This crate models a project that declares several compilation targets
//! (JVM, JS, native, Android) sharing common sources: targets created from
//! presets, the source-set `dependsOn` graph, attribute propagation into
//! configurations, and the variants and publications derived from them.

pub mod core;
pub mod ops;
pub mod util;

pub use core::{
    project::{Project, ProjectIdentity},
    source_set::SourceSetGraph,
    target::Target,
};

pub use util::context::GlobalContext;
pub use util::errors::{ModelError, ModelResult};
