//! Name derivation for targets, compilations, configurations and tasks.

use crate::util::errors::{ModelError, ModelResult};

/// Join non-empty parts in lowerCamelCase: `("jvm", "apiElements")` ->
/// `jvmApiElements`. The first part is kept as written.
pub fn lower_camel_case<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for part in parts.into_iter().filter(|p| !p.is_empty()) {
        if out.is_empty() {
            out.push_str(part);
        } else {
            out.push_str(&capitalize(part));
        }
    }
    out
}

/// Uppercase the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Check that a user supplied name can be used to derive other names.
pub fn validate_name(kind: &'static str, name: &str) -> ModelResult<()> {
    let reason = if name.is_empty() {
        Some("name must not be empty")
    } else if name.chars().any(char::is_whitespace) {
        Some("name must not contain whitespace")
    } else if name.contains([':', '/', '\\']) {
        Some("name must not contain path separators")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ModelError::InvalidName {
            kind,
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_camel_case() {
        assert_eq!(lower_camel_case(["jvm", "apiElements"]), "jvmApiElements");
        assert_eq!(lower_camel_case(["jvm", "", "main"]), "jvmMain");
        assert_eq!(lower_camel_case(["", "test"]), "test");
        assert_eq!(
            lower_camel_case(["linuxX64", "integrationTest", "compileClasspath"]),
            "linuxX64IntegrationTestCompileClasspath"
        );
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("kotlinMultiplatform"), "KotlinMultiplatform");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("target", "jvm").is_ok());
        assert!(validate_name("target", "").is_err());
        assert!(validate_name("target", "my target").is_err());
        assert!(validate_name("target", "a:b").is_err());
    }
}
