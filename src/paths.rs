//! Path template resolution.
//!
//! Cache targets are declared as templates containing environment
//! placeholders (`${LOCALAPPDATA}`, `${TEMP}`, `~`). Resolution substitutes
//! the current environment; a template referencing an unset variable is
//! returned verbatim, and the caller simply observes it as not-found on the
//! filesystem. Resolution happens on demand and is never cached, so a run
//! always sees the current environment.

use std::path::{Path, PathBuf};

/// Expand `~` and environment variables in a path template.
///
/// This is the canonical expansion function for fivekit. All modules should
/// use this instead of calling shellexpand directly.
///
/// # Examples
///
/// ```
/// use fivekit::paths;
///
/// // Expands ~ to home directory
/// let home_path = paths::resolve("~/Downloads");
///
/// // Unset variables leave the template untouched
/// let raw = paths::resolve("${FIVEKIT_NO_SUCH_VAR}/cache");
/// ```
pub fn resolve(template: &str) -> PathBuf {
    let expanded = shellexpand::full(template).unwrap_or(std::borrow::Cow::Borrowed(template));
    PathBuf::from(expanded.as_ref())
}

/// Whether a resolved path is something the cleaner must never touch:
/// a filesystem root (`/`, `C:\`) or the user's home directory itself.
pub fn is_protected(path: &Path) -> bool {
    if path.parent().is_none() {
        return true;
    }
    dirs::home_dir().is_some_and(|home| path == home)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    /// Helper to run a test with a temporary env var.
    ///
    /// # Safety
    /// Uses unsafe env::set_var/remove_var; only safe because tests here
    /// don't read environment variables concurrently.
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Tests run in isolation and don't read env vars concurrently
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: Tests run in isolation
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    #[test]
    fn test_resolve_with_tilde() {
        let result = resolve("~/test/path");
        let home = dirs::home_dir().unwrap();
        assert_eq!(result, home.join("test").join("path"));
    }

    #[test]
    fn test_resolve_absolute() {
        let result = resolve("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_resolve_with_env_var() {
        with_env_var("FIVEKIT_TEST_VAR", "test_value", || {
            let result = resolve("/path/${FIVEKIT_TEST_VAR}/file");
            assert_eq!(result, PathBuf::from("/path/test_value/file"));
        });
    }

    #[test]
    fn test_resolve_unknown_env_var_unchanged() {
        // shellexpand::full errors on unset vars; we fall back to the
        // verbatim template so the path reads as not-found downstream.
        let result = resolve("${FIVEKIT_NONEXISTENT_VAR_12345}/FiveM/cache");
        assert_eq!(
            result,
            PathBuf::from("${FIVEKIT_NONEXISTENT_VAR_12345}/FiveM/cache")
        );
    }

    #[test]
    fn test_resolve_plain_relative() {
        assert_eq!(resolve("plain/dir"), PathBuf::from("plain/dir"));
    }

    #[test]
    fn test_protected_root() {
        assert!(is_protected(Path::new("/")));
    }

    #[test]
    fn test_protected_home() {
        let home = dirs::home_dir().unwrap();
        assert!(is_protected(&home));
    }

    #[test]
    fn test_not_protected_subdir() {
        let home = dirs::home_dir().unwrap();
        assert!(!is_protected(&home.join(".cache").join("fivekit")));
    }
}
