//! Compilations - named build units within a target.

use serde::Serialize;

use crate::core::attributes::AttributeBag;
use crate::util::live::Named;
use crate::util::naming::lower_camel_case;

/// Name of the production compilation.
pub const MAIN_COMPILATION: &str = "main";

/// Name of the test compilation.
pub const TEST_COMPILATION: &str = "test";

/// A named build unit belonging to exactly one target.
#[derive(Debug, Clone, Serialize)]
pub struct Compilation {
    name: String,
    target: String,
    default_source_set: String,
    attributes: AttributeBag,
}

impl Compilation {
    /// Create a compilation whose default source set is `{target}{Name}`.
    pub fn new(target: impl Into<String>, name: impl Into<String>) -> Self {
        let target = target.into();
        let name = name.into();
        let default_source_set = lower_camel_case([target.as_str(), name.as_str()]);
        Compilation {
            name,
            target,
            default_source_set,
            attributes: AttributeBag::new(),
        }
    }

    /// Override the default source set name.
    pub fn with_default_source_set(mut self, source_set: impl Into<String>) -> Self {
        self.default_source_set = source_set.into();
        self
    }

    pub fn with_attributes(mut self, attributes: AttributeBag) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the owning target.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn default_source_set(&self) -> &str {
        &self.default_source_set
    }

    pub fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeBag {
        &mut self.attributes
    }

    pub fn is_main(&self) -> bool {
        self.name == MAIN_COMPILATION
    }

    /// Prefix for configuration names: `jvm` for `main`, `jvmTest` otherwise.
    fn configuration_prefix(&self) -> String {
        if self.is_main() {
            self.target.clone()
        } else {
            lower_camel_case([self.target.as_str(), self.name.as_str()])
        }
    }

    pub fn compile_classpath_configuration(&self) -> String {
        lower_camel_case([self.configuration_prefix().as_str(), "compileClasspath"])
    }

    pub fn runtime_classpath_configuration(&self) -> String {
        lower_camel_case([self.configuration_prefix().as_str(), "runtimeClasspath"])
    }

    pub fn api_configuration(&self) -> String {
        lower_camel_case([self.configuration_prefix().as_str(), "api"])
    }

    pub fn implementation_configuration(&self) -> String {
        lower_camel_case([self.configuration_prefix().as_str(), "implementation"])
    }

    /// Dependency buckets this compilation contributes to.
    pub fn related_configuration_names(&self) -> Vec<String> {
        vec![
            self.api_configuration(),
            self.implementation_configuration(),
            self.compile_classpath_configuration(),
            self.runtime_classpath_configuration(),
        ]
    }
}

impl Named for Compilation {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source_set_name() {
        assert_eq!(Compilation::new("jvm", "main").default_source_set(), "jvmMain");
        assert_eq!(
            Compilation::new("linuxX64", "test").default_source_set(),
            "linuxX64Test"
        );
        assert_eq!(
            Compilation::new("metadata", "main")
                .with_default_source_set("commonMain")
                .default_source_set(),
            "commonMain"
        );
    }

    #[test]
    fn test_related_configuration_names() {
        let main = Compilation::new("jvm", "main");
        assert_eq!(
            main.related_configuration_names(),
            vec![
                "jvmApi",
                "jvmImplementation",
                "jvmCompileClasspath",
                "jvmRuntimeClasspath"
            ]
        );

        let test = Compilation::new("jvm", "test");
        assert_eq!(test.compile_classpath_configuration(), "jvmTestCompileClasspath");
    }
}
