//! Model error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Error raised while building the target/source-set/publication model.
///
/// Every variant is fatal for the configuration pass. Missing compilations
/// are not represented here: they are a skip condition, not a failure.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ModelError {
    #[error("{kind} with name `{name}` already exists")]
    #[diagnostic(code(multitarget::naming_conflict))]
    NamingConflict { kind: &'static str, name: String },

    #[error("attribute `{key}` of {source_name} has no value (target `{target}`)")]
    #[diagnostic(code(multitarget::attributes::missing_value))]
    MissingAttributeValue {
        key: String,
        source_name: String,
        target: String,
    },

    #[error("attribute `{key}` expects a {expected} value, found {found}")]
    #[diagnostic(code(multitarget::attributes::type_mismatch))]
    AttributeTypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("source set `{from}` cannot depend on `{to}`: this would create a cycle")]
    #[diagnostic(
        code(multitarget::source_sets::cycle),
        help("Remove one of the dependsOn edges along the cycle")
    )]
    DependsOnCycle {
        from: String,
        to: String,
        path: Vec<String>,
    },

    #[error("source set `{0}` does not exist")]
    #[diagnostic(code(multitarget::source_sets::unknown))]
    UnknownSourceSet(String),

    #[error("target `{0}` does not exist")]
    #[diagnostic(code(multitarget::targets::unknown))]
    UnknownTarget(String),

    #[error("compilation `{compilation}` does not exist in target `{target}`")]
    #[diagnostic(code(multitarget::compilations::unknown))]
    UnknownCompilation { target: String, compilation: String },

    #[error("preset `{name}` does not exist")]
    #[diagnostic(code(multitarget::presets::unknown))]
    UnknownPreset { name: String, available: Vec<String> },

    #[error("task `{0}` does not exist")]
    #[diagnostic(code(multitarget::tasks::unknown))]
    UnknownTask(String),

    #[error("{what} is only available after the project has been evaluated")]
    #[diagnostic(code(multitarget::lifecycle::not_evaluated))]
    NotYetEvaluated { what: String },

    #[error("project evaluation failed: {reason}")]
    #[diagnostic(code(multitarget::lifecycle::evaluation_failed))]
    EvaluationFailed { reason: String },

    #[error("invalid {kind} name `{name}`: {reason}")]
    #[diagnostic(code(multitarget::invalid_name))]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: &'static str,
    },
}

impl ModelError {
    /// Convert to a user-facing diagnostic with context and suggestions.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            ModelError::NamingConflict { kind, name } => diag
                .with_context(format!("a {} named `{}` was registered earlier", kind, name))
                .with_suggestion(format!("Pick a different name for the {}", kind)),

            ModelError::MissingAttributeValue { source_name, .. } => diag
                .with_context(format!(
                    "attributes are copied from {} after all configuration has run",
                    source_name
                ))
                .with_suggestion("Give the attribute a value or remove it from the compilation"),

            ModelError::AttributeTypeMismatch { key, .. } => diag
                .with_suggestion(format!("Use the value type declared by `{}`", key)),

            ModelError::DependsOnCycle { path, .. } => {
                diag.with_context(format!("cycle: {}", path.join(" -> ")))
                    .with_suggestion("Break the cycle by removing a dependsOn edge")
            }

            ModelError::UnknownPreset { available, .. } => {
                let diag = if available.is_empty() {
                    diag
                } else {
                    diag.with_context(format!("available presets: {}", available.join(", ")))
                };
                diag.with_suggestion(super::diagnostic::suggestions::LIST_PRESETS)
            }

            ModelError::UnknownTarget(_) => {
                diag.with_suggestion(super::diagnostic::suggestions::LIST_TARGETS)
            }

            ModelError::EvaluationFailed { .. } => diag
                .with_context("after-evaluate callbacks stop at the first failure")
                .with_suggestion("Fix the first reported error and configure the project again"),

            ModelError::NotYetEvaluated { .. } => {
                diag.with_suggestion("Read this value from an after-evaluate callback")
            }

            _ => diag,
        }
    }
}
