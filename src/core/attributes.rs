//! Typed attribute bags used for dependency matching.
//!
//! An [`AttributeKey`] is an opaque token: a name plus the kind of value it
//! accepts. Bags store at most one value per key name. A key may be
//! *declared* without a value; copying such a key out of a bag is a
//! propagation fault rather than a silent skip.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::platform::PlatformType;
use crate::util::errors::{ModelError, ModelResult};

/// The kind of value an attribute key accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Text,
    Flag,
    Platform,
}

impl AttributeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Text => "text",
            AttributeKind::Flag => "flag",
            AttributeKind::Platform => "platform",
        }
    }
}

/// Attribute identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeKey {
    name: String,
    kind: AttributeKind,
}

impl AttributeKey {
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        AttributeKey {
            name: name.into(),
            kind,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Text)
    }

    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Flag)
    }

    /// `org.jetbrains.kotlin.platform.type`
    pub fn platform_type() -> Self {
        Self::new("org.jetbrains.kotlin.platform.type", AttributeKind::Platform)
    }

    /// `org.gradle.usage`
    pub fn usage() -> Self {
        Self::text("org.gradle.usage")
    }

    /// `org.jetbrains.kotlin.native.target`
    pub fn native_target() -> Self {
        Self::text("org.jetbrains.kotlin.native.target")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Platform(PlatformType),
    Text(String),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Flag(_) => AttributeKind::Flag,
            AttributeValue::Platform(_) => AttributeKind::Platform,
            AttributeValue::Text(_) => AttributeKind::Text,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Flag(b) => write!(f, "{}", b),
            AttributeValue::Platform(p) => write!(f, "{}", p),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<PlatformType> for AttributeValue {
    fn from(p: PlatformType) -> Self {
        AttributeValue::Platform(p)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Flag(b)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    kind: AttributeKind,
    value: Option<AttributeValue>,
}

/// A set of typed key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBag {
    entries: BTreeMap<String, Entry>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any earlier value.
    pub fn set(&mut self, key: &AttributeKey, value: impl Into<AttributeValue>) -> ModelResult<()> {
        let value = value.into();
        self.check_kind(key, value.kind())?;
        self.entries.insert(
            key.name.clone(),
            Entry {
                kind: key.kind,
                value: Some(value),
            },
        );
        Ok(())
    }

    /// Declare `key` without a value. An existing value is left untouched.
    pub fn declare(&mut self, key: &AttributeKey) -> ModelResult<()> {
        self.check_kind(key, key.kind)?;
        self.entries.entry(key.name.clone()).or_insert(Entry {
            kind: key.kind,
            value: None,
        });
        Ok(())
    }

    fn check_kind(&self, key: &AttributeKey, found: AttributeKind) -> ModelResult<()> {
        let expected = self
            .entries
            .get(&key.name)
            .map(|e| e.kind)
            .unwrap_or(key.kind);
        if expected != found || key.kind != found {
            return Err(ModelError::AttributeTypeMismatch {
                key: key.name.clone(),
                expected: expected.as_str(),
                found: found.as_str(),
            });
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries.get(name).and_then(|e| e.value.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All keys, sorted by name.
    pub fn keys(&self) -> Vec<AttributeKey> {
        self.entries
            .iter()
            .map(|(name, e)| AttributeKey::new(name.clone(), e.kind))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every key/value into `dest`, overwriting what is there.
    ///
    /// Fails without touching `dest` if any key lacks a value. `source` and
    /// `target` only feed the error message.
    pub fn copy_into(&self, dest: &mut AttributeBag, source: &str, target: &str) -> ModelResult<()> {
        if let Some((name, _)) = self.entries.iter().find(|(_, e)| e.value.is_none()) {
            return Err(ModelError::MissingAttributeValue {
                key: name.clone(),
                source_name: source.to_string(),
                target: target.to_string(),
            });
        }

        for (name, entry) in &self.entries {
            let key = AttributeKey::new(name.clone(), entry.kind);
            if let Some(value) = &entry.value {
                dest.set(&key, value.clone())?;
            }
        }
        Ok(())
    }

    /// True if every key of `self` is present in `other` with the same value.
    pub fn is_subset_of(&self, other: &AttributeBag) -> bool {
        self.entries
            .iter()
            .all(|(name, e)| other.entries.get(name).map(|o| &o.value) == Some(&e.value))
    }

    /// Display form: key name to value, `None` for declared-only keys.
    pub fn to_map(&self) -> BTreeMap<String, Option<String>> {
        self.entries
            .iter()
            .map(|(name, e)| (name.clone(), e.value.as_ref().map(|v| v.to_string())))
            .collect()
    }
}

impl Serialize for AttributeBag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut bag = AttributeBag::new();
        bag.set(&AttributeKey::platform_type(), PlatformType::Jvm)
            .unwrap();
        bag.set(&AttributeKey::text("custom"), "x").unwrap();

        assert_eq!(
            bag.get("org.jetbrains.kotlin.platform.type"),
            Some(&AttributeValue::Platform(PlatformType::Jvm))
        );
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let mut bag = AttributeBag::new();
        let err = bag
            .set(&AttributeKey::platform_type(), "jvm")
            .unwrap_err();
        assert!(matches!(err, ModelError::AttributeTypeMismatch { .. }));

        bag.set(&AttributeKey::text("k"), "v").unwrap();
        let err = bag.set(&AttributeKey::flag("k"), true).unwrap_err();
        assert!(matches!(err, ModelError::AttributeTypeMismatch { .. }));
    }

    #[test]
    fn test_copy_overwrites_and_keeps_foreign_keys() {
        let mut source = AttributeBag::new();
        source
            .set(&AttributeKey::platform_type(), PlatformType::Js)
            .unwrap();

        let mut dest = AttributeBag::new();
        dest.set(&AttributeKey::platform_type(), PlatformType::Jvm)
            .unwrap();
        dest.set(&AttributeKey::usage(), "kotlin-api").unwrap();

        source.copy_into(&mut dest, "compilation `main`", "js").unwrap();

        assert_eq!(
            dest.get("org.jetbrains.kotlin.platform.type"),
            Some(&AttributeValue::Platform(PlatformType::Js))
        );
        assert_eq!(
            dest.get("org.gradle.usage"),
            Some(&AttributeValue::Text("kotlin-api".to_string()))
        );
        assert!(source.is_subset_of(&dest));
    }

    #[test]
    fn test_copy_fails_on_declared_key_without_touching_dest() {
        let mut source = AttributeBag::new();
        source.set(&AttributeKey::text("a"), "1").unwrap();
        source.declare(&AttributeKey::text("b")).unwrap();

        let mut dest = AttributeBag::new();
        let err = source
            .copy_into(&mut dest, "compilation `main`", "jvm")
            .unwrap_err();

        match err {
            ModelError::MissingAttributeValue { key, target, .. } => {
                assert_eq!(key, "b");
                assert_eq!(target, "jvm");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(dest.is_empty());
    }

    #[test]
    fn test_declare_keeps_existing_value() {
        let mut bag = AttributeBag::new();
        let key = AttributeKey::text("a");
        bag.set(&key, "1").unwrap();
        bag.declare(&key).unwrap();
        assert_eq!(bag.get("a"), Some(&AttributeValue::Text("1".to_string())));
    }
}
