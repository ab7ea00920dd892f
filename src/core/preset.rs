//! Target presets - factories that produce targets of one kind.
//!
//! The registry is filled once when the multiplatform plugin activates.
//! Presets are immutable after registration; one preset may back any
//! number of targets.

use std::collections::HashMap;
use std::fmt;

use crate::core::attributes::{AttributeBag, AttributeKey};
use crate::core::compilation::{Compilation, MAIN_COMPILATION, TEST_COMPILATION};
use crate::core::platform::{HostManager, NativeTarget, PlatformType};
use crate::core::source_set::{COMMON_MAIN, COMMON_TEST};
use crate::core::target::{Target, TargetOptions, METADATA_TARGET_NAME};
use crate::util::errors::{ModelError, ModelResult};
use crate::util::naming::validate_name;

/// Produces a target from a name and options.
pub trait TargetPreset {
    /// Registry key, e.g. `jvm` or `iosArm64`.
    fn name(&self) -> &str;

    /// Platform of the targets this preset creates.
    fn platform(&self) -> PlatformType;

    /// Build an unregistered target. The caller registers it.
    fn create_target(&self, name: &str, options: &TargetOptions) -> ModelResult<Target>;
}

/// Attributes every compilation of a `platform` target starts with.
fn platform_attributes(
    platform: PlatformType,
    native: Option<NativeTarget>,
) -> ModelResult<AttributeBag> {
    let mut bag = AttributeBag::new();
    bag.set(&AttributeKey::platform_type(), platform)?;
    if let Some(native) = native {
        bag.set(&AttributeKey::native_target(), native.name)?;
    }
    Ok(bag)
}

/// Shared construction: validate, apply options, add the compilations.
fn build_target(
    preset: &dyn TargetPreset,
    name: &str,
    options: &TargetOptions,
    default_publishable: bool,
    native: Option<NativeTarget>,
    compilations: &[&str],
) -> ModelResult<Target> {
    validate_name("target", name)?;

    let platform = preset.platform();
    let mut target = Target::new(name, platform)
        .with_preset(preset.name())
        .with_publishable(options.publishable.unwrap_or(default_publishable));
    if let Some(native) = native {
        target = target.with_native_target(native);
    }

    for compilation in compilations {
        let attributes = platform_attributes(platform, native)?;
        target = target.with_compilation(
            Compilation::new(name, *compilation).with_attributes(attributes),
        )?;
    }
    Ok(target)
}

/// Standard JVM targets.
#[derive(Debug, Default)]
pub struct JvmPreset;

impl TargetPreset for JvmPreset {
    fn name(&self) -> &str {
        "jvm"
    }

    fn platform(&self) -> PlatformType {
        PlatformType::Jvm
    }

    fn create_target(&self, name: &str, options: &TargetOptions) -> ModelResult<Target> {
        build_target(
            self,
            name,
            options,
            true,
            None,
            &[MAIN_COMPILATION, TEST_COMPILATION],
        )
    }
}

/// JavaScript targets.
#[derive(Debug, Default)]
pub struct JsPreset;

impl TargetPreset for JsPreset {
    fn name(&self) -> &str {
        "js"
    }

    fn platform(&self) -> PlatformType {
        PlatformType::Js
    }

    fn create_target(&self, name: &str, options: &TargetOptions) -> ModelResult<Target> {
        build_target(
            self,
            name,
            options,
            true,
            None,
            &[MAIN_COMPILATION, TEST_COMPILATION],
        )
    }
}

/// JVM targets whose compilations also carry Java sources.
#[derive(Debug, Default)]
pub struct JvmWithJavaPreset;

impl TargetPreset for JvmWithJavaPreset {
    fn name(&self) -> &str {
        "jvmWithJava"
    }

    fn platform(&self) -> PlatformType {
        PlatformType::Jvm
    }

    fn create_target(&self, name: &str, options: &TargetOptions) -> ModelResult<Target> {
        let mut target = build_target(
            self,
            name,
            options,
            true,
            None,
            &[MAIN_COMPILATION, TEST_COMPILATION],
        )?;

        // Java sources live next to Kotlin ones in the default source sets
        for compilation in target.compilation_names() {
            if let Some(c) = target.compilation_mut(&compilation) {
                c.attributes_mut()
                    .set(&AttributeKey::flag("org.jetbrains.kotlin.jvm.withJava"), true)?;
            }
        }
        Ok(target)
    }
}

/// Android targets. Compilations follow build variants (`debug`,
/// `release`), so there is no `main` compilation.
#[derive(Debug, Default)]
pub struct AndroidPreset;

impl TargetPreset for AndroidPreset {
    fn name(&self) -> &str {
        "android"
    }

    fn platform(&self) -> PlatformType {
        PlatformType::AndroidJvm
    }

    fn create_target(&self, name: &str, options: &TargetOptions) -> ModelResult<Target> {
        // Variants are published by the Android plugin itself
        build_target(self, name, options, false, None, &["debug", "release"])
    }
}

/// Kotlin/Native targets for one triple.
#[derive(Debug)]
pub struct NativePreset {
    native: NativeTarget,
}

impl NativePreset {
    pub fn new(native: NativeTarget) -> Self {
        NativePreset { native }
    }

    pub fn native_target(&self) -> NativeTarget {
        self.native
    }
}

impl TargetPreset for NativePreset {
    fn name(&self) -> &str {
        self.native.preset_name
    }

    fn platform(&self) -> PlatformType {
        PlatformType::Native
    }

    fn create_target(&self, name: &str, options: &TargetOptions) -> ModelResult<Target> {
        build_target(
            self,
            name,
            options,
            true,
            Some(self.native),
            &[MAIN_COMPILATION, TEST_COMPILATION],
        )
    }
}

/// The shared-code target. Not part of the user-selectable registry.
#[derive(Debug, Default)]
pub struct MetadataPreset;

impl TargetPreset for MetadataPreset {
    fn name(&self) -> &str {
        METADATA_TARGET_NAME
    }

    fn platform(&self) -> PlatformType {
        PlatformType::Common
    }

    fn create_target(&self, name: &str, options: &TargetOptions) -> ModelResult<Target> {
        let attributes = platform_attributes(PlatformType::Common, None)?;
        Target::new(name, PlatformType::Common)
            .with_preset(METADATA_TARGET_NAME)
            .with_publishable(options.publishable.unwrap_or(false))
            .with_compilation(
                Compilation::new(name, MAIN_COMPILATION)
                    .with_default_source_set(COMMON_MAIN)
                    .with_attributes(attributes.clone()),
            )?
            .with_compilation(
                Compilation::new(name, TEST_COMPILATION)
                    .with_default_source_set(COMMON_TEST)
                    .with_attributes(attributes),
            )
    }
}

/// Registry of user-selectable presets.
///
/// Registration order is preserved for listing, but nothing in the model
/// depends on it.
pub struct PresetRegistry {
    presets: Vec<Box<dyn TargetPreset>>,
    index: HashMap<String, usize>,
}

impl PresetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        PresetRegistry {
            presets: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create a registry with the default preset set.
    ///
    /// `jvm`, `js`, `jvmWithJava`, then `android` when an Android plugin is
    /// present, then one native preset per triple the host enables.
    pub fn with_defaults(host: HostManager, android_available: bool) -> ModelResult<Self> {
        let mut registry = Self::new();

        registry.register(Box::new(JvmPreset))?;
        registry.register(Box::new(JsPreset))?;
        registry.register(Box::new(JvmWithJavaPreset))?;
        if android_available {
            registry.register(Box::new(AndroidPreset))?;
        }
        for native in host.enabled() {
            registry.register(Box::new(NativePreset::new(*native)))?;
        }

        tracing::debug!(
            "Registered {} presets for host {}",
            registry.len(),
            host.host()
        );
        Ok(registry)
    }

    /// Register a preset. Preset names are unique.
    pub fn register(&mut self, preset: Box<dyn TargetPreset>) -> ModelResult<()> {
        let name = preset.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ModelError::NamingConflict {
                kind: "preset",
                name,
            });
        }
        self.index.insert(name, self.presets.len());
        self.presets.push(preset);
        Ok(())
    }

    /// Get a preset by name.
    pub fn get(&self, name: &str) -> Option<&dyn TargetPreset> {
        self.index.get(name).map(|&i| self.presets[i].as_ref())
    }

    /// Get a preset by name, failing with the list of known presets.
    pub fn resolve(&self, name: &str) -> ModelResult<&dyn TargetPreset> {
        self.get(name).ok_or_else(|| ModelError::UnknownPreset {
            name: name.to_string(),
            available: self.names(),
        })
    }

    /// Preset names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.presets.iter().map(|p| p.name().to_string()).collect()
    }

    /// All presets in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn TargetPreset> + '_ {
        self.presets.iter().map(|p| p.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PresetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresetRegistry")
            .field("presets", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::AttributeValue;
    use crate::core::platform::HostOs;

    #[test]
    fn test_default_order() {
        let registry = PresetRegistry::with_defaults(HostManager::new(HostOs::Linux), false).unwrap();
        let names = registry.names();

        assert_eq!(&names[..3], &["jvm", "js", "jvmWithJava"]);
        assert!(!registry.contains("android"));
        assert!(!registry.contains(METADATA_TARGET_NAME));
        assert!(registry.contains("linuxX64"));
        assert!(!registry.contains("iosArm64"));
        assert_eq!(
            registry.len(),
            3 + HostManager::new(HostOs::Linux).enabled().len()
        );
    }

    #[test]
    fn test_android_requires_plugin() {
        let registry = PresetRegistry::with_defaults(HostManager::new(HostOs::Macos), true).unwrap();
        assert_eq!(registry.names()[3], "android");
        assert!(registry.contains("iosArm64"));
    }

    #[test]
    fn test_duplicate_preset_rejected() {
        let mut registry = PresetRegistry::new();
        registry.register(Box::new(JvmPreset)).unwrap();
        assert!(matches!(
            registry.register(Box::new(JvmPreset)),
            Err(ModelError::NamingConflict { kind: "preset", .. })
        ));
    }

    #[test]
    fn test_unknown_preset_lists_available() {
        let mut registry = PresetRegistry::new();
        registry.register(Box::new(JsPreset)).unwrap();

        match registry.resolve("wasm") {
            Err(ModelError::UnknownPreset { available, .. }) => {
                assert_eq!(available, vec!["js"]);
            }
            other => panic!("unexpected: {:?}", other.map(|p| p.name().to_string())),
        }
    }

    #[test]
    fn test_jvm_target_shape() {
        let target = JvmPreset
            .create_target("backend", &TargetOptions::default())
            .unwrap();

        assert_eq!(target.preset(), Some("jvm"));
        assert!(target.is_publishable());
        assert_eq!(target.compilation_names(), vec!["main", "test"]);
        let main = target.main_compilation().unwrap();
        assert_eq!(main.default_source_set(), "backendMain");
        assert_eq!(
            main.attributes()
                .get(AttributeKey::platform_type().name()),
            Some(&AttributeValue::Platform(PlatformType::Jvm))
        );
    }

    #[test]
    fn test_publishable_override() {
        let options = TargetOptions {
            publishable: Some(false),
        };
        let target = JsPreset.create_target("js", &options).unwrap();
        assert!(!target.is_publishable());
    }

    #[test]
    fn test_native_target_attribute() {
        let preset = NativePreset::new(NativeTarget::IOS_ARM64);
        let target = preset
            .create_target("ios", &TargetOptions::default())
            .unwrap();

        assert_eq!(target.native_target(), Some(NativeTarget::IOS_ARM64));
        assert_eq!(
            target
                .main_compilation()
                .unwrap()
                .attributes()
                .get(AttributeKey::native_target().name()),
            Some(&AttributeValue::Text("ios_arm64".to_string()))
        );
    }

    #[test]
    fn test_android_has_no_main() {
        let target = AndroidPreset
            .create_target("android", &TargetOptions::default())
            .unwrap();
        assert!(target.main_compilation().is_none());
        assert!(!target.is_publishable());
    }

    #[test]
    fn test_metadata_uses_common_source_sets() {
        let target = MetadataPreset
            .create_target(METADATA_TARGET_NAME, &TargetOptions::default())
            .unwrap();

        assert!(!target.is_publishable());
        assert_eq!(target.platform(), PlatformType::Common);
        assert_eq!(
            target.main_compilation().unwrap().default_source_set(),
            COMMON_MAIN
        );
        assert_eq!(
            target.compilation("test").unwrap().default_source_set(),
            COMMON_TEST
        );
    }

    #[test]
    fn test_invalid_target_name() {
        assert!(matches!(
            JvmPreset.create_target("my target", &TargetOptions::default()),
            Err(ModelError::InvalidName { .. })
        ));
    }
}
