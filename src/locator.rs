//! Finds candidate archives under an installation root.
//!
//! Candidate subdirectories are probed in priority order. Missing or
//! unreadable directories are skipped rather than reported: Tomcat layouts
//! differ across major versions and most installs only have some of them.

use std::fs;
use std::path::{Path, PathBuf};

/// Where `catalina.jar` lives: `lib/` on Tomcat 6+, `server/lib/` before that.
pub const MAIN_ARCHIVE_DIRS: &[&str] = &["lib", "server/lib"];

/// Where bundled library jars live across Tomcat generations.
pub const LIBRARY_DIRS: &[&str] = &["lib", "common/lib", "shared/lib"];

pub const MAIN_ARCHIVE_NAME: &str = "catalina.jar";
pub const ARCHIVE_SUFFIX: &str = ".jar";

/// Return the path of the first entry named `exact_name`, honoring the order
/// of `candidate_dirs`.
pub fn find_first_match(root: &Path, candidate_dirs: &[&str], exact_name: &str) -> Option<PathBuf> {
    candidate_dirs.iter().find_map(|dir| {
        list_dir(&root.join(dir))
            .into_iter()
            .find(|(name, _)| name == exact_name)
            .map(|(_, path)| path)
    })
}

/// Collect every entry whose name ends with `suffix`, directory order first,
/// then listing order within each directory.
pub fn collect_by_suffix(root: &Path, candidate_dirs: &[&str], suffix: &str) -> Vec<PathBuf> {
    candidate_dirs
        .iter()
        .flat_map(|dir| list_dir(&root.join(dir)))
        .filter(|(name, _)| name.ends_with(suffix))
        .map(|(_, path)| path)
        .collect()
}

/// Sorted `(file name, path)` pairs for one directory; empty when unreadable.
fn list_dir(dir: &Path) -> Vec<(String, PathBuf)> {
    let Ok(read_dir) = fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "skipping unreadable candidate directory");
        return Vec::new();
    };

    let mut entries: Vec<(String, PathBuf)> = read_dir
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            Some((name, entry.path()))
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}
