//! Range Classification
//!
//! Decides what an attribute's range points at. Only enum and class ranges
//! become relationship edges; primitives and schema types stay scalar.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::collection::{ClassCollection, Collection, EnumCollection, SlotCollection, TypeCollection};
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::entity::EntityType;

/// Built-in primitive range names, matched case-insensitively
pub const PRIMITIVE_TYPES: &[&str] = &[
    "string",
    "integer",
    "float",
    "double",
    "decimal",
    "boolean",
    "date",
    "datetime",
    "time",
    "uri",
    "uriorcurie",
];

/// What a range resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeKind {
    Primitive,
    /// A schema-declared scalar type
    Type,
    Enum,
    Class,
}

impl RangeKind {
    /// Whether a range of this kind becomes a graph edge
    pub fn is_relationship(&self) -> bool {
        matches!(self, Self::Enum | Self::Class)
    }

    /// Node type an edge of this kind points at
    pub fn target_type(&self) -> Option<EntityType> {
        match self {
            Self::Enum => Some(EntityType::Enum),
            Self::Class => Some(EntityType::Class),
            Self::Primitive | Self::Type => None,
        }
    }
}

// =============================================================================
// Name -> Type Index
// =============================================================================

/// Name -> entity type, built once after every collection exists
#[derive(Debug, Clone, Default)]
pub struct NameTypeIndex {
    names: HashMap<String, EntityType>,
}

impl NameTypeIndex {
    /// Register classes, enums, slots, then types; the first registration
    /// of a name wins
    pub fn build(
        classes: &ClassCollection,
        enums: &EnumCollection,
        slots: &SlotCollection,
        types: &TypeCollection,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut index = Self::default();
        index.register_all(classes.names(), EntityType::Class, diagnostics);
        index.register_all(enums.names(), EntityType::Enum, diagnostics);
        index.register_all(slots.names(), EntityType::Slot, diagnostics);
        index.register_all(types.names(), EntityType::Type, diagnostics);
        tracing::debug!(count = index.names.len(), "built name index");
        index
    }

    fn register_all(&mut self, names: Vec<&str>, kind: EntityType, diagnostics: &mut Diagnostics) {
        for name in names {
            match self.names.get(name) {
                Some(existing) => diagnostics.record(
                    DiagnosticCode::NameCollision,
                    name,
                    format!("{} name already registered as {}; lookups resolve to the {}", kind, existing, existing),
                ),
                None => {
                    self.names.insert(name.to_string(), kind);
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<EntityType> {
        self.names.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

// =============================================================================
// Classifier
// =============================================================================

/// Range classifier over a populated [`NameTypeIndex`]
#[derive(Debug, Clone)]
pub struct RangeClassifier {
    index: NameTypeIndex,
    primitives: HashSet<String>,
}

impl RangeClassifier {
    pub fn new(index: NameTypeIndex) -> Self {
        Self::with_extra_primitives(index, &[])
    }

    pub fn with_extra_primitives(index: NameTypeIndex, extra: &[String]) -> Self {
        let primitives = PRIMITIVE_TYPES
            .iter()
            .map(|p| p.to_string())
            .chain(extra.iter().map(|p| p.to_lowercase()))
            .collect();
        Self { index, primitives }
    }

    pub fn index(&self) -> &NameTypeIndex {
        &self.index
    }

    pub fn is_primitive(&self, range: &str) -> bool {
        self.primitives.contains(&range.to_lowercase())
    }

    /// Classify a range without recording anything
    pub fn classify(&self, range: &str) -> RangeKind {
        self.resolve(range).unwrap_or_else(|| fallback(range))
    }

    /// Classify a range, recording an unresolved one against `entity`
    pub fn classify_for(&self, entity: &str, range: &str, diagnostics: &mut Diagnostics) -> RangeKind {
        if let Some(kind) = self.resolve(range) {
            return kind;
        }
        let kind = fallback(range);
        let message = if self.index.is_empty() {
            format!("range '{}' classified as {:?} before the name index was populated", range, kind)
        } else {
            format!("range '{}' is not a known entity; guessing {:?}", range, kind)
        };
        diagnostics.record(DiagnosticCode::UnresolvedRange, entity, message);
        kind
    }

    /// Node type a range of `kind` links to; a class-kind range naming a
    /// shared slot links to that slot's node
    pub fn target_type(&self, range: &str, kind: RangeKind) -> Option<EntityType> {
        match (kind, self.index.get(range)) {
            (RangeKind::Class, Some(EntityType::Slot)) => Some(EntityType::Slot),
            _ => kind.target_type(),
        }
    }

    fn resolve(&self, range: &str) -> Option<RangeKind> {
        if self.is_primitive(range) {
            return Some(RangeKind::Primitive);
        }
        match self.index.get(range)? {
            EntityType::Enum => Some(RangeKind::Enum),
            // slot ranges share the class namespace for linking
            EntityType::Class | EntityType::Slot => Some(RangeKind::Class),
            EntityType::Type => Some(RangeKind::Type),
            EntityType::Variable => None,
        }
    }
}

/// Last-resort guess by naming convention
fn fallback(range: &str) -> RangeKind {
    tracing::warn!(range, "range not in name index; falling back to naming heuristic");
    if range.ends_with("Enum") {
        RangeKind::Enum
    } else {
        RangeKind::Class
    }
}
