//! Raw Schema Records
//!
//! Loosely-typed shapes of the processed LinkML export and the variable spec
//! sheet, exactly as they arrive from the data-loading layer. No behavior
//! lives here; the serde renames and aliases double as the DTO -> entity
//! field mapping.
//!
//! Maps are [`IndexMap`]s so that attribute and permissible-value order in
//! the export survives into the model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The whole schema export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDto {
    #[serde(default)]
    pub classes: IndexMap<String, ClassDto>,
    #[serde(default)]
    pub slots: IndexMap<String, SlotDto>,
    #[serde(default)]
    pub enums: IndexMap<String, EnumDto>,
    #[serde(default)]
    pub types: IndexMap<String, TypeDto>,
    #[serde(default)]
    pub variables: Vec<VariableDto>,
}

/// Class record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Superclass name (`is_a` in raw LinkML)
    #[serde(default, alias = "is_a", skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// Inline attributes
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, AttributeDto>,
    /// Class-specific overrides of shared slots
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub slot_usage: IndexMap<String, SlotUsageDto>,
    /// Bare references to shared slots
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<String>,
}

/// Inline class attribute
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multivalued: Option<bool>,
    #[serde(default, alias = "slotId", skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
    /// Set by the processed export when an ancestor owns this attribute
    #[serde(default, alias = "inheritedFrom", skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<String>,
}

/// `slot_usage` entry; every field is an optional override
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotUsageDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multivalued: Option<bool>,
}

/// Shared slot record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, alias = "uri", skip_serializing_if = "Option::is_none")]
    pub slot_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multivalued: Option<bool>,
    /// Present on per-class override instances (`{slot}-{Class}`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<String>,
}

/// Enum record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Values may be `null` in the export
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub permissible_values: IndexMap<String, Option<PermissibleValueDto>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissibleValueDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
}

/// Type record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, alias = "typeof", skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
}

/// One row of the variable spec sheet
///
/// Headers follow the published sheet (`bdchmElement`, `variableLabel`, ...);
/// snake_case spellings are accepted too.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariableDto {
    #[serde(rename = "bdchmElement", alias = "class_id", alias = "classId", default)]
    pub class_id: String,
    #[serde(rename = "variableLabel", alias = "label", default)]
    pub label: String,
    #[serde(rename = "dataType", alias = "data_type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(rename = "ucumUnit", alias = "ucum_unit", default, skip_serializing_if = "Option::is_none")]
    pub ucum_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curie: Option<String>,
    #[serde(rename = "variableDescription", alias = "description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
