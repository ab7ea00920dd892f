//! Software components and variants.
//!
//! Each target exposes one component describing its publishable artifacts.
//! The aggregate component spans every target's variant and backs the root
//! publication.

use serde::Serialize;

use crate::core::target::Target;
use crate::util::live::Named;

/// Name of the aggregate component.
pub const AGGREGATE_COMPONENT: &str = "kotlin";

/// A usage of a variant, backed by a consumable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Usage {
    /// Usage name, e.g. `kotlin-api`
    pub name: String,
    /// Configuration providing the usage's attributes and artifacts
    pub configuration: String,
}

/// A publishable representation of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub name: String,
    pub target: String,
    pub publishable: bool,
    pub usages: Vec<Usage>,
}

impl Variant {
    pub fn for_target(target: &Target) -> Self {
        Variant {
            name: target.name().to_string(),
            target: target.name().to_string(),
            publishable: target.is_publishable(),
            usages: vec![
                Usage {
                    name: "kotlin-api".to_string(),
                    configuration: target.api_elements_configuration(),
                },
                Usage {
                    name: "kotlin-runtime".to_string(),
                    configuration: target.runtime_elements_configuration(),
                },
            ],
        }
    }
}

/// An entry in the project's component registry.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SoftwareComponent {
    /// A single target's artifacts
    Target { name: String, variant: Variant },
    /// All targets' variants
    Aggregate { name: String, variants: Vec<Variant> },
}

impl SoftwareComponent {
    pub fn for_target(target: &Target) -> Self {
        SoftwareComponent::Target {
            name: target.component_name().to_string(),
            variant: Variant::for_target(target),
        }
    }

    pub fn aggregate() -> Self {
        SoftwareComponent::Aggregate {
            name: AGGREGATE_COMPONENT.to_string(),
            variants: Vec::new(),
        }
    }

    /// Variants in this component.
    pub fn variants(&self) -> Vec<&Variant> {
        match self {
            SoftwareComponent::Target { variant, .. } => vec![variant],
            SoftwareComponent::Aggregate { variants, .. } => variants.iter().collect(),
        }
    }

    /// Add a variant to an aggregate. Returns false for target components
    /// and for variants already present.
    pub fn add_variant(&mut self, variant: Variant) -> bool {
        match self {
            SoftwareComponent::Aggregate { variants, .. } => {
                if variants.iter().any(|v| v.name == variant.name) {
                    return false;
                }
                variants.push(variant);
                true
            }
            SoftwareComponent::Target { .. } => false,
        }
    }
}

impl Named for SoftwareComponent {
    fn name(&self) -> &str {
        match self {
            SoftwareComponent::Target { name, .. } | SoftwareComponent::Aggregate { name, .. } => {
                name
            }
        }
    }
}
