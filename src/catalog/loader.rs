//! Loads a replacement catalog from a JSON file.
//!
//! Files are validated against the embedded `schema/catalog_v1.schema.json`
//! before deserialization, then checked for duplicate capability names and
//! entry paths so a scan cannot record ambiguous results.

use crate::catalog::{Catalog, CatalogGroup};
use crate::error::DetectError;
use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::OnceLock;

pub const CATALOG_SCHEMA_VERSION: &str = "catalina_catalog_v1";

const CATALOG_SCHEMA: &str = include_str!("../../schema/catalog_v1.schema.json");

#[derive(Deserialize)]
struct CatalogFile {
    #[allow(dead_code)]
    schema_version: String,
    groups: Vec<CatalogGroup>,
}

/// Read, validate and index a catalog file.
pub fn load_catalog_from_path(path: &Path) -> Result<Catalog, DetectError> {
    load(path).map_err(|err| DetectError::Catalog {
        path: path.to_path_buf(),
        reason: format!("{err:#}"),
    })
}

fn load(path: &Path) -> Result<Catalog> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;

    validate_against_schema(&value)?;

    let parsed: CatalogFile = serde_json::from_value(value)?;
    let catalog = Catalog::new(parsed.groups);
    validate_unique(&catalog)?;
    Ok(catalog)
}

fn catalog_schema() -> Result<&'static Value> {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    if let Some(schema) = SCHEMA.get() {
        return Ok(schema);
    }
    let parsed: Value =
        serde_json::from_str(CATALOG_SCHEMA).context("parsing embedded catalog schema")?;
    Ok(SCHEMA.get_or_init(|| parsed))
}

fn validate_against_schema(value: &Value) -> Result<()> {
    let schema = catalog_schema()?;
    let compiled = JSONSchema::compile(schema)
        .map_err(|err| anyhow!("compiling embedded catalog schema: {err}"))?;

    if let Err(errors) = compiled.validate(value) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!("failed schema validation:\n{details}");
    }
    Ok(())
}

fn validate_unique(catalog: &Catalog) -> Result<()> {
    let mut names = BTreeSet::new();
    let mut paths = BTreeSet::new();
    for entry in catalog.entries() {
        if !names.insert(entry.capability_name.as_str()) {
            bail!("duplicate capability_name {}", entry.capability_name);
        }
        if !paths.insert(entry.entry_path.as_str()) {
            bail!("duplicate entry_path {}", entry.entry_path);
        }
    }
    Ok(())
}
