//! Error kinds surfaced by detection.
//!
//! Every failure is returned as a value. The CLI decides how to render it; the
//! scanner itself only raises `ArchiveUnreadable` for single-archive work and
//! swallows it when sweeping many archives.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("Unable to find {}. Tomcat path: {}", .wanted, .home.display())]
    NoCandidateFound { wanted: String, home: PathBuf },

    #[error("Failed to read {}: {}", .path.display(), .reason)]
    ArchiveUnreadable { path: PathBuf, reason: String },

    #[error("Unable to find \"{}\" property in {}", .property, .archive.display())]
    PropertyNotFound { property: String, archive: PathBuf },

    /// `missing` holds the variant names of each unsatisfied group.
    #[error("Unable to find all required classes (missing {})", format_groups(.missing))]
    IncompleteDetection { missing: Vec<Vec<String>> },

    #[error("Tomcat path is not a readable directory: {}", .0.display())]
    HomeUnreadable(PathBuf),

    #[error("Unable to detect JAVA_HOME")]
    JavaHomeNotFound,

    #[error("Invalid catalog {}: {}", .path.display(), .reason)]
    Catalog { path: PathBuf, reason: String },
}

fn format_groups(groups: &[Vec<String>]) -> String {
    groups
        .iter()
        .map(|names| format!("[{}]", names.join(" | ")))
        .collect::<Vec<_>>()
        .join(", ")
}

impl DetectError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DetectError::ArchiveUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
