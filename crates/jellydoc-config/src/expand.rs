//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present,
/// so a lone bare `$VAR` is never expanded.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    if let Some(var) = first_unset_required(value) {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{var}}} not set"),
        });
    }

    Ok(shellexpand::env_with_context_no_errors(value, |var| std::env::var(var).ok()).into_owned())
}

/// First `${VAR}` reference without a default whose variable is unset.
fn first_unset_required(value: &str) -> Option<&str> {
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let end = after.find('}')?;
        let reference = &after[..end];
        if !reference.contains(":-") && std::env::var(reference).is_err() {
            return Some(reference);
        }
        rest = &after[end + 1..];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: each test uses its own variable name
        unsafe {
            std::env::set_var("JELLYDOC_TEST_TARGET", "build");
        }
        let result = expand_env("${JELLYDOC_TEST_TARGET}/out", "output.dir").unwrap();
        assert_eq!(result, "build/out");
        unsafe {
            std::env::remove_var("JELLYDOC_TEST_TARGET");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: each test uses its own variable name
        unsafe {
            std::env::remove_var("JELLYDOC_TEST_UNSET");
        }
        let result = expand_env("${JELLYDOC_TEST_UNSET:-target}", "output.dir").unwrap();
        assert_eq!(result, "target");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: each test uses its own variable name
        unsafe {
            std::env::remove_var("JELLYDOC_TEST_MISSING");
        }
        let err = expand_env("${JELLYDOC_TEST_MISSING}", "source.model").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("JELLYDOC_TEST_MISSING"));
        assert!(err.to_string().contains("source.model"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("target/$classes", "output.dir").unwrap();
        assert_eq!(result, "target/$classes");
    }
}
