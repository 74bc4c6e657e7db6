//! Schema Entities
//!
//! Typed, normalized representations of everything the explorer shows.
//! Each kind is a plain struct owned by its collection; [`Element`] is the
//! closed sum over borrowed entities that the query layer dispatches on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::class_slot::ClassSlot;
use crate::error::ModelError;
use crate::model::SchemaModel;

// =============================================================================
// Entity Type
// =============================================================================

/// Discriminator over entity kinds (colors, icons, graph node typing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Class,
    Enum,
    Slot,
    Type,
    Variable,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Class,
        EntityType::Enum,
        EntityType::Slot,
        EntityType::Type,
        EntityType::Variable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Enum => "enum",
            Self::Slot => "slot",
            Self::Type => "type",
            Self::Variable => "variable",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "class" | "classes" => Ok(Self::Class),
            "enum" | "enums" => Ok(Self::Enum),
            "slot" | "slots" => Ok(Self::Slot),
            "type" | "types" => Ok(Self::Type),
            "variable" | "variables" => Ok(Self::Variable),
            _ => Err(ModelError::InvalidEntityType(s.to_string())),
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

/// A class in the single-inheritance tree
#[derive(Debug, Clone, Serialize)]
pub struct ClassEntity {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared superclass name, as found in the export
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Resolved superclass; `None` for roots and for demoted classes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Direct subclasses, alphabetical
    pub children: Vec<String>,
    /// Dotted ancestry, root first (`Entity.Specimen.Material`)
    pub node_path: String,
    pub is_abstract: bool,
    /// Slots declared on this class, before inheritance is folded in
    pub class_slots: Vec<ClassSlot>,
    /// Labels of variables mapped to this class
    pub variables: Vec<String>,
}

impl ClassEntity {
    pub fn class_slot(&self, name: &str) -> Option<&ClassSlot> {
        self.class_slots.iter().find(|s| s.name == name)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// One permissible value of an enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissibleValue {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumEntity {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissible_values: Vec<PermissibleValue>,
}

/// Shared slot definition, or the synthetic stand-in for an inline attribute
#[derive(Debug, Clone, Serialize)]
pub struct SlotEntity {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multivalued: Option<bool>,
    /// Fabricated from an inline attribute; never registered in a collection
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeEntity {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
}

/// A data-entry variable mapped onto a class
#[derive(Debug, Clone, Serialize)]
pub struct VariableEntity {
    /// Variable label
    pub name: String,
    pub class_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ucum_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =============================================================================
// Element
// =============================================================================

/// Borrowed view over any entity
#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    Class(&'a ClassEntity),
    Enum(&'a EnumEntity),
    Slot(&'a SlotEntity),
    Type(&'a TypeEntity),
    Variable(&'a VariableEntity),
}

impl<'a> Element<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Self::Class(c) => &c.name,
            Self::Enum(e) => &e.name,
            Self::Slot(s) => &s.name,
            Self::Type(t) => &t.name,
            Self::Variable(v) => &v.name,
        }
    }

    pub fn description(&self) -> Option<&'a str> {
        match self {
            Self::Class(c) => c.description.as_deref(),
            Self::Enum(e) => e.description.as_deref(),
            Self::Slot(s) => s.description.as_deref(),
            Self::Type(t) => t.description.as_deref(),
            Self::Variable(v) => v.description.as_deref(),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Class(_) => EntityType::Class,
            Self::Enum(_) => EntityType::Enum,
            Self::Slot(_) => EntityType::Slot,
            Self::Type(_) => EntityType::Type,
            Self::Variable(_) => EntityType::Variable,
        }
    }

    /// Tree parent: superclass for classes, owning class for variables
    pub fn parent(&self) -> Option<&'a str> {
        match self {
            Self::Class(c) => c.parent.as_deref(),
            Self::Variable(v) => Some(&v.class_id),
            Self::Enum(_) | Self::Slot(_) | Self::Type(_) => None,
        }
    }

    pub fn children(&self) -> &'a [String] {
        match self {
            Self::Class(c) => &c.children,
            Self::Enum(_) | Self::Slot(_) | Self::Type(_) | Self::Variable(_) => &[],
        }
    }

    /// Count shown next to the entity in list panels
    pub fn badge(&self, model: &SchemaModel) -> Option<usize> {
        match self {
            Self::Class(c) => Some(model.classes().collect_all_slots(&c.name).len()),
            Self::Enum(e) => Some(e.permissible_values.len()),
            Self::Slot(_) | Self::Type(_) | Self::Variable(_) => None,
        }
    }
}
