//! Shared library for the catalina-probe CLI.
//!
//! The crate identifies a Tomcat installation without starting it: the server
//! banner is read from `catalina.jar`, and the bundled servlet/JSP API jars are
//! located by scanning library jars for a small catalog of marker classes.
//! Public functions here are the contract the binary depends on; they return
//! structured values and never print.

pub mod archive;
pub mod catalog;
pub mod detect;
pub mod error;
pub mod locator;
pub mod runtime;
pub mod scanner;

pub use archive::{Archive, ArchiveSource, ZipContainer, ZipSource};
pub use catalog::{
    CATALOG_SCHEMA_VERSION, Catalog, CatalogEntry, CatalogGroup, MatchMap, load_catalog_from_path,
};
pub use detect::{
    SERVER_INFO_ENTRY_SUFFIX, SERVER_INFO_PROPERTY, ServletNamespace, normalize_home,
    search_for_classes, search_for_classes_with, server_info, server_info_with,
};
pub use error::DetectError;
pub use locator::{
    ARCHIVE_SUFFIX, LIBRARY_DIRS, MAIN_ARCHIVE_DIRS, MAIN_ARCHIVE_NAME, collect_by_suffix,
    find_first_match,
};
pub use runtime::java_home;
pub use scanner::{ScanOutcome, extract_property, scan};
