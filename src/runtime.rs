//! Host lookups used by the CLI: executable detection, PATH search and the
//! `JAVA_HOME` convention.

use crate::error::DetectError;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Returns true when a file exists and has any execute bit set.
pub fn is_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = std::fs::metadata(path) {
            return meta.permissions().mode() & 0o111 != 0;
        }
        false
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Find an executable by name in a PATH-style list of directories.
pub fn find_in_paths(paths: &OsStr, name: &str) -> Option<PathBuf> {
    env::split_paths(paths)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

/// Resolve the Java installation: `JAVA_HOME` when set, otherwise the
/// directory above the `bin/java` found on PATH.
pub fn java_home() -> Result<PathBuf, DetectError> {
    java_home_from(env_non_empty("JAVA_HOME"), env::var_os("PATH"))
}

fn java_home_from(
    java_home_env: Option<String>,
    path_var: Option<OsString>,
) -> Result<PathBuf, DetectError> {
    if let Some(home) = java_home_env {
        return Ok(PathBuf::from(home));
    }

    let java = path_var
        .as_deref()
        .and_then(|paths| find_in_paths(paths, "java"))
        .ok_or(DetectError::JavaHomeNotFound)?;
    tracing::debug!(java = %java.display(), "resolved java from PATH");

    Ok(strip_bin_java(&java))
}

fn strip_bin_java(java: &Path) -> PathBuf {
    match java.parent() {
        Some(bin) if bin.file_name() == Some(OsStr::new("bin")) => bin
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| java.to_path_buf()),
        _ => java.to_path_buf(),
    }
}

pub fn env_non_empty(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
