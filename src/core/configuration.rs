//! Configurations - named dependency buckets that carry attributes.

use serde::Serialize;

use crate::core::attributes::AttributeBag;
use crate::util::live::Named;

/// How a configuration takes part in dependency resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationRole {
    /// Exposed to consumers (`apiElements`, `runtimeElements`, `default`)
    Consumable,
    /// Resolved by the build (`compileClasspath`, `runtimeClasspath`)
    Resolvable,
    /// Holds declared dependencies only (`api`, `implementation`)
    Declarable,
}

/// A named, host-owned resolution bucket.
#[derive(Debug, Clone, Serialize)]
pub struct Configuration {
    name: String,
    role: ConfigurationRole,
    attributes: AttributeBag,
}

impl Configuration {
    pub fn new(name: impl Into<String>, role: ConfigurationRole) -> Self {
        Configuration {
            name: name.into(),
            role,
            attributes: AttributeBag::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: AttributeBag) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> ConfigurationRole {
        self.role
    }

    pub fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeBag {
        &mut self.attributes
    }
}

impl Named for Configuration {
    fn name(&self) -> &str {
        &self.name
    }
}
