//! Catalog types: capability names paired with the archive entry that proves
//! the capability is bundled.
//!
//! A `CatalogGroup` collects the namespace variants of one class (for example
//! the `javax` and `jakarta` spellings of `Servlet`); the group is satisfied as
//! soon as any variant turns up in a scanned archive.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;

/// One class that may be present in an archive.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Dotted class name, used as the key in a `MatchMap`.
    pub capability_name: String,
    /// Exact entry path inside the archive (`javax/servlet/Servlet.class`).
    pub entry_path: String,
}

/// Mutually exclusive variants of the same capability.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CatalogGroup {
    pub name: String,
    pub entries: Vec<CatalogEntry>,
}

/// Ordered set of groups a scan must satisfy.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub groups: Vec<CatalogGroup>,
}

/// Capability name -> archive path that supplied it.
pub type MatchMap = BTreeMap<String, PathBuf>;

// JSP page base class, then the generic servlet interface. Legacy namespace first.
const BUILTIN_GROUPS: &[(&str, &[(&str, &str)])] = &[
    (
        "jsp-page",
        &[
            ("javax.servlet.jsp.JspPage", "javax/servlet/jsp/JspPage.class"),
            ("jakarta.servlet.jsp.JspPage", "jakarta/servlet/jsp/JspPage.class"),
        ],
    ),
    (
        "servlet",
        &[
            ("javax.servlet.Servlet", "javax/servlet/Servlet.class"),
            ("jakarta.servlet.Servlet", "jakarta/servlet/Servlet.class"),
        ],
    ),
];

impl CatalogEntry {
    pub fn new(capability_name: impl Into<String>, entry_path: impl Into<String>) -> Self {
        Self {
            capability_name: capability_name.into(),
            entry_path: entry_path.into(),
        }
    }
}

impl CatalogGroup {
    pub fn new(name: impl Into<String>, entries: Vec<CatalogEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// True when any variant of this group has been recorded.
    pub fn is_satisfied_by(&self, matches: &MatchMap) -> bool {
        self.entries
            .iter()
            .any(|entry| matches.contains_key(&entry.capability_name))
    }
}

impl Catalog {
    pub fn new(groups: Vec<CatalogGroup>) -> Self {
        Self { groups }
    }

    /// The two-group servlet/JSP catalog, built once per process.
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Catalog::new(
                BUILTIN_GROUPS
                    .iter()
                    .map(|(name, entries)| {
                        CatalogGroup::new(
                            *name,
                            entries
                                .iter()
                                .map(|(class, path)| CatalogEntry::new(*class, *path))
                                .collect(),
                        )
                    })
                    .collect(),
            )
        })
    }

    /// Every group has at least one matched capability.
    ///
    /// An empty catalog is trivially complete.
    pub fn is_complete(&self, matches: &MatchMap) -> bool {
        self.groups.iter().all(|group| group.is_satisfied_by(matches))
    }

    /// Groups with no matched variant yet.
    pub fn unsatisfied<'a>(
        &'a self,
        matches: &'a MatchMap,
    ) -> impl Iterator<Item = &'a CatalogGroup> + 'a {
        self.groups
            .iter()
            .filter(move |group| !group.is_satisfied_by(matches))
    }

    /// Iterates every entry, group order first.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.groups.iter().flat_map(|group| group.entries.iter())
    }
}
