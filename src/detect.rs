//! The two detection operations, composed from the locator and the scanner.
//!
//! `server_info` reads the banner out of `catalina.jar`; `search_for_classes`
//! sweeps the library jars for the catalog classes and only succeeds when
//! every catalog group was satisfied.

use crate::archive::{ArchiveSource, ZipSource};
use crate::catalog::{Catalog, MatchMap};
use crate::error::DetectError;
use crate::locator::{
    ARCHIVE_SUFFIX, LIBRARY_DIRS, MAIN_ARCHIVE_DIRS, MAIN_ARCHIVE_NAME, collect_by_suffix,
    find_first_match,
};
use crate::scanner::{extract_property, scan};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SERVER_INFO_ENTRY_SUFFIX: &str = "ServerInfo.properties";
pub const SERVER_INFO_PROPERTY: &str = "server.info";

/// Servlet API generation implied by which namespace the matched classes use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServletNamespace {
    Javax,
    Jakarta,
    /// Both namespaces bundled, typically a migration shim next to the API jars.
    Mixed,
}

impl ServletNamespace {
    pub fn classify(matches: &MatchMap) -> Option<Self> {
        let javax = matches.keys().any(|name| name.starts_with("javax."));
        let jakarta = matches.keys().any(|name| name.starts_with("jakarta."));
        match (javax, jakarta) {
            (true, false) => Some(ServletNamespace::Javax),
            (false, true) => Some(ServletNamespace::Jakarta),
            (true, true) => Some(ServletNamespace::Mixed),
            (false, false) => None,
        }
    }
}

/// Strip trailing separators from a user-supplied installation path.
pub fn normalize_home(raw: &str) -> PathBuf {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() && raw.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::from(trimmed)
    }
}

/// Read `server.info` from the installation's `catalina.jar`.
pub fn server_info(home: &Path) -> Result<String, DetectError> {
    server_info_with(&ZipSource, home)
}

pub fn server_info_with<S: ArchiveSource>(source: &S, home: &Path) -> Result<String, DetectError> {
    ensure_home(home)?;
    let catalina = find_first_match(home, MAIN_ARCHIVE_DIRS, MAIN_ARCHIVE_NAME).ok_or_else(|| {
        DetectError::NoCandidateFound {
            wanted: MAIN_ARCHIVE_NAME.to_string(),
            home: home.to_path_buf(),
        }
    })?;
    tracing::debug!(archive = %catalina.display(), "reading server info");
    extract_property(
        source,
        &catalina,
        SERVER_INFO_ENTRY_SUFFIX,
        SERVER_INFO_PROPERTY,
    )
}

/// Locate the jars providing every catalog group.
///
/// Partial results are never returned: an incomplete scan becomes
/// `IncompleteDetection` naming the capabilities still missing.
pub fn search_for_classes(home: &Path, catalog: &Catalog) -> Result<MatchMap, DetectError> {
    search_for_classes_with(&ZipSource, home, catalog)
}

pub fn search_for_classes_with<S: ArchiveSource>(
    source: &S,
    home: &Path,
    catalog: &Catalog,
) -> Result<MatchMap, DetectError> {
    ensure_home(home)?;
    let jars = collect_by_suffix(home, LIBRARY_DIRS, ARCHIVE_SUFFIX);
    if jars.is_empty() {
        return Err(DetectError::NoCandidateFound {
            wanted: format!("*{ARCHIVE_SUFFIX} in {}", LIBRARY_DIRS.join(", ")),
            home: home.to_path_buf(),
        });
    }
    tracing::debug!(candidates = jars.len(), "collected library jars");

    let outcome = scan(source, &jars, catalog);
    if !outcome.complete {
        let missing = catalog
            .unsatisfied(&outcome.matches)
            .map(|group| {
                group
                    .entries
                    .iter()
                    .map(|entry| entry.capability_name.clone())
                    .collect()
            })
            .collect();
        return Err(DetectError::IncompleteDetection { missing });
    }
    Ok(outcome.matches)
}

fn ensure_home(home: &Path) -> Result<(), DetectError> {
    match fs::read_dir(home) {
        Ok(_) => Ok(()),
        Err(err) => {
            tracing::debug!(home = %home.display(), "home unreadable: {err}");
            Err(DetectError::HomeUnreadable(home.to_path_buf()))
        }
    }
}
