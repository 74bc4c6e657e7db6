//! Query Facade
//!
//! The only surface the presentation layer calls. Every query is addressed
//! by entity name and is total: an unknown name yields `false`, `None`, or an
//! empty collection, never an error.
//!
//! Relationship queries read the [`RelationshipGraph`](crate::graph::RelationshipGraph)
//! exclusively; collections are consulted only for entity payloads.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::Serialize;

use crate::collection::{Collection, TreeEntry};
use crate::detail::{detail_for, DetailData};
use crate::entity::{Element, EntityType};
use crate::graph::{GraphEdge, NodeId};
use crate::model::SchemaModel;

// =============================================================================
// Result Types
// =============================================================================

/// Relationship kinds exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Inheritance,
    Property,
    MapsTo,
}

/// One relationship seen from the queried entity. For incoming
/// relationships `target_id` is the entity on the other end (the source).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub kind: RelationshipKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub target_id: String,
    pub target_type: EntityType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<String>,
}

impl Relationship {
    fn new(kind: RelationshipKind, target: &NodeId) -> Self {
        Self {
            kind,
            label: None,
            target_id: target.name.clone(),
            target_type: target.kind,
            inherited_from: None,
        }
    }

    fn slot_from(edge: &GraphEdge<'_>, other: &NodeId) -> Self {
        let slot = edge.slot();
        Self {
            kind: RelationshipKind::Property,
            label: slot.map(|s| s.slot_name.clone()),
            target_id: other.name.clone(),
            target_type: other.kind,
            inherited_from: slot.and_then(|s| s.inherited_from.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Relationships {
    pub outgoing: Vec<Relationship>,
    pub incoming: Vec<Relationship>,
}

impl Relationships {
    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty() && self.incoming.is_empty()
    }
}

/// Fuzzy search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub name: String,
    pub entity_type: EntityType,
    pub score: i64,
}

// =============================================================================
// Queries
// =============================================================================

impl SchemaModel {
    /// Resolve a name to its entity. Classes, enums, slots and types are
    /// looked up through the name index; variable labels come last.
    pub fn element(&self, id: &str) -> Option<Element<'_>> {
        match self.classifier().index().get(id) {
            Some(kind) => self.element_of(kind, id),
            None => self.variables().get(id).map(Element::Variable),
        }
    }

    /// Resolve a name within one entity type
    pub fn element_of(&self, kind: EntityType, id: &str) -> Option<Element<'_>> {
        match kind {
            EntityType::Class => self.classes().get(id).map(Element::Class),
            EntityType::Enum => self.enums().get(id).map(Element::Enum),
            EntityType::Slot => self.slots().get(id).map(Element::Slot),
            EntityType::Type => self.types().get(id).map(Element::Type),
            EntityType::Variable => self.variables().get(id).map(Element::Variable),
        }
    }

    pub fn item_exists(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    pub fn detail_data(&self, id: &str) -> Option<DetailData> {
        self.element(id).map(|element| detail_for(element, self))
    }

    /// Outgoing and incoming relationships.
    ///
    /// Incoming relationships are grouped by kind (inheritance, property,
    /// maps_to) and sorted by source name, then slot name, within each group.
    pub fn relationships(&self, id: &str) -> Relationships {
        let Some(element) = self.element(id) else {
            return Relationships::default();
        };
        let graph = self.graph();
        let mut result = Relationships::default();

        match element {
            Element::Class(class) => {
                if let Some(parent) = graph.parent(&class.name) {
                    result
                        .outgoing
                        .push(Relationship::new(RelationshipKind::Inheritance, &NodeId::class(parent)));
                }
                for edge in graph.slot_edges(&class.name) {
                    result.outgoing.push(Relationship {
                        kind: RelationshipKind::Property,
                        label: Some(edge.slot.slot_name.clone()),
                        target_id: edge.target.name.clone(),
                        target_type: edge.target.kind,
                        inherited_from: edge.slot.inherited_from.clone(),
                    });
                }

                for child in graph.subclasses(&class.name) {
                    result
                        .incoming
                        .push(Relationship::new(RelationshipKind::Inheritance, &NodeId::class(child)));
                }
                for edge in graph.slot_users(&NodeId::class(&class.name)) {
                    result.incoming.push(Relationship::slot_from(&edge, edge.source));
                }
                for var in graph.variables_for(&class.name) {
                    result
                        .incoming
                        .push(Relationship::new(RelationshipKind::MapsTo, &NodeId::variable(var)));
                }
            }
            Element::Enum(e) => {
                for edge in graph.slot_users(&NodeId::new(EntityType::Enum, &e.name)) {
                    result.incoming.push(Relationship::slot_from(&edge, edge.source));
                }
            }
            Element::Slot(slot) => {
                if let Some(target) = graph.slot_range(&slot.name) {
                    let mut rel = Relationship::new(RelationshipKind::Property, target);
                    rel.label = Some(slot.name.clone());
                    result.outgoing.push(rel);
                }
                for edge in graph.slot_users(&NodeId::slot(&slot.name)) {
                    result.incoming.push(Relationship::slot_from(&edge, edge.source));
                }
            }
            Element::Type(_) => {}
            Element::Variable(var) => {
                if let Some(class) = graph.mapped_class(&var.name) {
                    result
                        .outgoing
                        .push(Relationship::new(RelationshipKind::MapsTo, &NodeId::class(class)));
                }
            }
        }

        result
    }

    /// Classes that use an enum, class, or shared slot as a range,
    /// deduplicated and alphabetical
    pub fn used_by(&self, id: &str) -> Vec<String> {
        let Some(element) = self.element(id) else {
            return Vec::new();
        };
        match element.entity_type() {
            kind @ (EntityType::Class | EntityType::Enum | EntityType::Slot) => self
                .graph()
                .used_by(&NodeId::new(kind, id))
                .into_iter()
                .map(String::from)
                .collect(),
            EntityType::Type | EntityType::Variable => Vec::new(),
        }
    }

    /// Every name of one entity type, alphabetical
    pub fn all_of_type(&self, kind: EntityType) -> Vec<String> {
        let names = match kind {
            EntityType::Class => self.classes().names(),
            EntityType::Enum => self.enums().names(),
            EntityType::Slot => self.slots().names(),
            EntityType::Type => self.types().names(),
            EntityType::Variable => self.variables().names(),
        };
        names.into_iter().map(String::from).collect()
    }

    /// List-panel count for an entity
    pub fn badge(&self, id: &str) -> Option<usize> {
        self.element(id)?.badge(self)
    }

    /// Depth-first class hierarchy, children alphabetical
    pub fn class_tree(&self) -> Vec<TreeEntry> {
        self.classes().flatten()
    }

    /// Fuzzy name search across every entity type, best score first,
    /// ties broken by name
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let matcher = SkimMatcherV2::default();
        let mut results: Vec<SearchResult> = Vec::new();

        for kind in EntityType::ALL {
            for name in self.all_of_type(kind) {
                if let Some(score) = matcher.fuzzy_match(&name, query) {
                    results.push(SearchResult {
                        name,
                        entity_type: kind,
                        score,
                    });
                }
            }
        }

        results.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.entity_type.cmp(&b.entity_type))
        });
        results.truncate(limit);
        results
    }
}
