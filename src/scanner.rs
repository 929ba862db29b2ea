//! Entry scanning over opened archives.
//!
//! `scan` walks archives in order and records where each catalog class lives,
//! stopping the moment every catalog group has a match. `extract_property`
//! reads a `key=value` line out of one entry of a single archive.

use crate::archive::{Archive, ArchiveSource};
use crate::catalog::{Catalog, MatchMap};
use crate::error::DetectError;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Result of one multi-archive scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub matches: MatchMap,
    /// True iff every catalog group has at least one recorded capability.
    pub complete: bool,
}

/// Record which archive supplies each catalog entry.
///
/// Archives that fail to open are logged and skipped. The scan returns as soon
/// as the catalog is complete, so later archives are never opened.
pub fn scan<S: ArchiveSource>(
    source: &S,
    archive_paths: &[PathBuf],
    catalog: &Catalog,
) -> ScanOutcome {
    if archive_paths.is_empty() {
        return ScanOutcome::default();
    }
    let mut matches = MatchMap::new();

    'archives: for path in archive_paths {
        if catalog.is_complete(&matches) {
            break;
        }
        let archive = match source.open(path) {
            Ok(archive) => archive,
            Err(err) => {
                tracing::warn!("skipping archive: {err}");
                continue;
            }
        };
        tracing::debug!(archive = %path.display(), entries = archive.len(), "scanning archive");

        for index in 0..archive.len() {
            let Some(name) = archive.entry_name(index) else {
                continue;
            };
            for entry in catalog.entries() {
                if name != entry.entry_path {
                    continue;
                }
                tracing::debug!(
                    capability = %entry.capability_name,
                    archive = %path.display(),
                    "matched catalog entry"
                );
                matches.insert(entry.capability_name.clone(), path.clone());
                if catalog.is_complete(&matches) {
                    tracing::info!(archive = %path.display(), "all catalog groups satisfied");
                    break 'archives;
                }
            }
        }
    }

    let complete = catalog.is_complete(&matches);
    ScanOutcome { matches, complete }
}

/// Extract the value of a `prefix...=value` line from the entry ending in
/// `entry_suffix`.
///
/// Every matching entry and every line is read; when several lines qualify the
/// last one wins. Lines that start with the prefix but carry no `=` are
/// ignored.
pub fn extract_property<S: ArchiveSource>(
    source: &S,
    archive_path: &Path,
    entry_suffix: &str,
    property_prefix: &str,
) -> Result<String, DetectError> {
    let mut archive = source.open(archive_path)?;
    let mut value = None;

    for index in 0..archive.len() {
        let Some(name) = archive.entry_name(index) else {
            continue;
        };
        if !name.ends_with(entry_suffix) {
            continue;
        }
        let entry_name = name.to_string();
        let reader = archive.open_entry(index).map_err(|err| {
            DetectError::unreadable(archive_path, format!("{entry_name}: {err}"))
        })?;

        for line in BufReader::new(reader).split(b'\n') {
            let line = line.map_err(|err| {
                DetectError::unreadable(archive_path, format!("{entry_name}: {err}"))
            })?;
            if let Some(found) = property_value(&line, property_prefix) {
                value = Some(found);
            }
        }
    }

    value.ok_or_else(|| DetectError::PropertyNotFound {
        property: property_prefix.to_string(),
        archive: archive_path.to_path_buf(),
    })
}

fn property_value(raw: &[u8], prefix: &str) -> Option<String> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let line = String::from_utf8_lossy(raw);
    if !line.starts_with(prefix) {
        return None;
    }
    line.split_once('=').map(|(_, value)| value.to_string())
}
