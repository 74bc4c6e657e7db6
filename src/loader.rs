//! Input Loading
//!
//! Reads the processed schema export and the optional variable spec sheet,
//! hashing every byte read so callers can key caches on the bundle.

use anyhow::Context;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::config::ExplorerConfig;
use crate::dto::{SchemaDto, VariableDto};
use crate::error::Result;

/// Raw inputs for [`SchemaModel::build_with`](crate::model::SchemaModel::build_with)
#[derive(Debug, Clone)]
pub struct LoadedBundle {
    pub schema: SchemaDto,
    /// Rows from the variable spec sheet, if one was configured
    pub variables: Vec<VariableDto>,
    /// SHA-256 over all loaded file contents, hex
    pub bundle_hash: String,
}

/// Parse a processed schema export
pub fn parse_schema(content: &[u8]) -> Result<SchemaDto> {
    Ok(serde_json::from_slice(content)?)
}

/// Parse a tab-separated variable spec sheet with a header row.
///
/// Rows with an empty label are dropped; unknown columns are ignored.
pub fn parse_variable_specs<R: Read>(reader: R) -> Result<Vec<VariableDto>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.deserialize::<VariableDto>() {
        let row = record?;
        if row.label.is_empty() {
            tracing::debug!(class = %row.class_id, "variable row without label skipped");
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

pub fn load_schema_file(path: &Path) -> anyhow::Result<SchemaDto> {
    decode_schema(path, &read_input(path, "schema file")?)
}

pub fn load_variable_specs(path: &Path) -> anyhow::Result<Vec<VariableDto>> {
    decode_variables(path, &read_input(path, "variable specs")?)
}

/// Load everything the configuration points at
pub fn load_bundle(config: &ExplorerConfig) -> anyhow::Result<LoadedBundle> {
    let mut hasher = Sha256::new();

    let schema_path = config.schema_path();
    let bytes = read_input(&schema_path, "schema file")?;
    hasher.update(&bytes);
    let schema = decode_schema(&schema_path, &bytes)?;

    let variables = match config.variables_path() {
        Some(path) => {
            let bytes = read_input(&path, "variable specs")?;
            hasher.update(&bytes);
            decode_variables(&path, &bytes)?
        }
        None => Vec::new(),
    };

    let bundle_hash = format!("{:x}", hasher.finalize());

    tracing::info!(
        classes = schema.classes.len(),
        enums = schema.enums.len(),
        slots = schema.slots.len(),
        types = schema.types.len(),
        variables = schema.variables.len() + variables.len(),
        hash = %&bundle_hash[..12],
        "loaded schema bundle"
    );

    Ok(LoadedBundle {
        schema,
        variables,
        bundle_hash,
    })
}

fn read_input(path: &Path, what: &str) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {} {}", what, path.display()))
}

fn decode_schema(path: &Path, bytes: &[u8]) -> anyhow::Result<SchemaDto> {
    parse_schema(bytes).with_context(|| format!("Failed to parse schema JSON in {}", path.display()))
}

fn decode_variables(path: &Path, bytes: &[u8]) -> anyhow::Result<Vec<VariableDto>> {
    parse_variable_specs(bytes).with_context(|| format!("Failed to parse variable specs in {}", path.display()))
}
