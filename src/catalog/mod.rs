//! Class catalog wiring.
//!
//! The built-in catalog lists the servlet and JSP marker classes in both their
//! `javax` and `jakarta` namespaces. Callers can swap in a JSON catalog through
//! `load_catalog_from_path`; both paths yield the same immutable `Catalog`.

pub mod loader;
pub mod model;

pub use loader::{CATALOG_SCHEMA_VERSION, load_catalog_from_path};
pub use model::{Catalog, CatalogEntry, CatalogGroup, MatchMap};
