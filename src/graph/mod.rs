//! Relationship Graph
//!
//! Directed multigraph over entity identifiers, built once from the resolved
//! collections. It is the single source of truth for relationship queries:
//! parents, subclasses, slot edges, "used by", and variable mappings.
//!
//! Edge kinds:
//! - `Inheritance`: class -> parent
//! - `Property`: class -> range (enum or class), one per resolved slot
//! - `ClassSlot`: class -> shared slot definition
//! - `SlotRange`: shared slot -> its own range
//! - `MapsTo`: variable -> class
//!
//! `ClassSlot` + `SlotRange` form the two-hop path walked in
//! [`SlotQueryMode::ViaSharedSlot`].

pub mod builder;
pub mod dot;

pub use builder::build_graph;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::class_slot::SlotSource;
use crate::config::SlotQueryMode;
use crate::entity::EntityType;
use crate::error::{ModelError, Result};

// =============================================================================
// Nodes
// =============================================================================

/// Graph node identity: names are only unique within an entity type
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId {
    pub kind: EntityType,
    pub name: String,
}

impl NodeId {
    pub fn new(kind: EntityType, name: impl Into<String>) -> Self {
        Self { kind, name: name.into() }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(EntityType::Class, name)
    }

    pub fn slot(name: impl Into<String>) -> Self {
        Self::new(EntityType::Slot, name)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(EntityType::Variable, name)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

// =============================================================================
// Edges
// =============================================================================

/// Types of edges in the relationship graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Inheritance,
    Property,
    ClassSlot,
    SlotRange,
    MapsTo,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inheritance => "inheritance",
            Self::Property => "property",
            Self::ClassSlot => "class_slot",
            Self::SlotRange => "slot_range",
            Self::MapsTo => "maps_to",
        }
    }

    /// Shared intermediate edges are re-added by every class reusing a slot
    pub fn dedupes(&self) -> bool {
        matches!(self, Self::ClassSlot | Self::SlotRange)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slot attributes carried by `Property` and `ClassSlot` edges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEdge {
    /// Attribute name on the class
    pub slot_name: String,
    /// Defining slot identifier (shared slot name, or `Class.attr` for inline)
    pub slot_id: String,
    pub source: SlotSource,
    pub required: bool,
    pub multivalued: bool,
    /// Ancestor the slot is inherited from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<String>,
}

/// Edge weight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeData {
    pub kind: EdgeKind,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<SlotEdge>,
}

impl EdgeData {
    pub fn new(kind: EdgeKind) -> Self {
        Self {
            kind,
            key: String::new(),
            slot: None,
        }
    }

    pub fn with_slot(kind: EdgeKind, slot: SlotEdge) -> Self {
        Self {
            kind,
            key: String::new(),
            slot: Some(slot),
        }
    }
}

/// Deterministic, collision-free edge key
pub fn edge_key(kind: EdgeKind, source: &NodeId, target: &NodeId, slot_name: Option<&str>) -> String {
    match slot_name {
        Some(slot) => format!("{}|{}->{}|{}", kind, source, target, slot),
        None => format!("{}|{}->{}", kind, source, target),
    }
}

/// An edge as returned by queries
#[derive(Debug, Clone, Copy)]
pub struct GraphEdge<'a> {
    pub source: &'a NodeId,
    pub target: &'a NodeId,
    pub data: &'a EdgeData,
}

impl<'a> GraphEdge<'a> {
    pub fn slot(&self) -> Option<&'a SlotEdge> {
        self.data.slot.as_ref()
    }
}

/// A class's slot edge paired with the node its range resolves to
#[derive(Debug, Clone, Copy)]
pub struct SlotTarget<'a> {
    pub slot: &'a SlotEdge,
    pub target: &'a NodeId,
}

// =============================================================================
// Graph
// =============================================================================

/// The relationship graph
pub struct RelationshipGraph {
    pub(crate) graph: DiGraph<NodeId, EdgeData>,

    /// Node index lookup
    pub(crate) node_indices: HashMap<NodeId, NodeIndex>,

    /// Keys of every edge added
    pub(crate) edge_keys: HashSet<String>,

    pub(crate) mode: SlotQueryMode,
}

impl RelationshipGraph {
    pub fn new(mode: SlotQueryMode) -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
            edge_keys: HashSet::new(),
            mode,
        }
    }

    // ========== Construction ==========

    /// Add a node; re-adding an existing id returns its index
    pub fn add_node(&mut self, id: NodeId) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.node_indices.insert(id, idx);
        idx
    }

    /// Add an edge between existing nodes.
    ///
    /// Returns `Ok(false)` when an endpoint is missing or a shared
    /// intermediate edge is already present. Any other repeated key is an
    /// integrity error.
    pub fn add_edge(&mut self, source: &NodeId, target: &NodeId, mut data: EdgeData) -> Result<bool> {
        let (Some(&from), Some(&to)) = (self.node_indices.get(source), self.node_indices.get(target)) else {
            tracing::debug!(%source, %target, kind = %data.kind, "edge endpoint missing; skipped");
            return Ok(false);
        };

        let slot_name = data.slot.as_ref().map(|s| s.slot_name.as_str());
        let key = edge_key(data.kind, source, target, slot_name);
        if self.edge_keys.contains(&key) {
            if data.kind.dedupes() {
                return Ok(false);
            }
            return Err(ModelError::DuplicateEdge { key });
        }

        self.edge_keys.insert(key.clone());
        data.key = key;
        self.graph.add_edge(from, to, data);
        Ok(true)
    }

    // ========== Public API ==========

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn mode(&self) -> SlotQueryMode {
        self.mode
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node_indices.contains_key(id)
    }

    pub fn has_edge_key(&self, key: &str) -> bool {
        self.edge_keys.contains(key)
    }

    /// Node names of one type, alphabetical
    pub fn nodes_of_type(&self, kind: EntityType) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .graph
            .node_weights()
            .filter(|n| n.kind == kind)
            .map(|n| n.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Edges touching a node, filtered by kind, in insertion order
    pub fn edges(&self, id: &NodeId, direction: Direction, kind: EdgeKind) -> Vec<GraphEdge<'_>> {
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };

        let mut found: Vec<(EdgeIndex, GraphEdge<'_>)> = self
            .graph
            .edges_directed(idx, direction)
            .filter(|e| e.weight().kind == kind)
            .filter_map(|e| {
                let source = self.graph.node_weight(e.source())?;
                let target = self.graph.node_weight(e.target())?;
                Some((e.id(), GraphEdge { source, target, data: e.weight() }))
            })
            .collect();
        found.sort_by_key(|(i, _)| i.index());
        found.into_iter().map(|(_, e)| e).collect()
    }

    /// Direct superclass (at most one)
    pub fn parent(&self, class: &str) -> Option<&str> {
        self.edges(&NodeId::class(class), Direction::Outgoing, EdgeKind::Inheritance)
            .first()
            .map(|e| e.target.name.as_str())
    }

    /// Direct subclasses, alphabetical
    pub fn subclasses(&self, class: &str) -> Vec<&str> {
        sorted_sources(self.edges(&NodeId::class(class), Direction::Incoming, EdgeKind::Inheritance))
    }

    /// Slot edges of a class, walked according to the graph's query mode
    pub fn slot_edges(&self, class: &str) -> Vec<SlotTarget<'_>> {
        self.slot_edges_with_mode(class, self.mode)
    }

    pub fn slot_edges_with_mode(&self, class: &str, mode: SlotQueryMode) -> Vec<SlotTarget<'_>> {
        let id = NodeId::class(class);
        let direct = self.edges(&id, Direction::Outgoing, EdgeKind::Property);

        match mode {
            SlotQueryMode::Direct => direct
                .into_iter()
                .filter_map(|e| Some(SlotTarget { slot: e.slot()?, target: e.target }))
                .collect(),
            SlotQueryMode::ViaSharedSlot => {
                // Inline attributes have no shared node; take them directly
                let mut result: Vec<SlotTarget<'_>> = direct
                    .into_iter()
                    .filter_map(|e| {
                        let slot = e.slot()?;
                        (slot.source == SlotSource::Attribute).then_some(SlotTarget { slot, target: e.target })
                    })
                    .collect();

                for hop in self.edges(&id, Direction::Outgoing, EdgeKind::ClassSlot) {
                    let Some(slot) = hop.slot() else {
                        continue;
                    };
                    for range in self.edges(hop.target, Direction::Outgoing, EdgeKind::SlotRange) {
                        result.push(SlotTarget { slot, target: range.target });
                    }
                }
                result
            }
        }
    }

    /// Range target of a shared slot
    pub fn slot_range(&self, slot: &str) -> Option<&NodeId> {
        self.edges(&NodeId::slot(slot), Direction::Outgoing, EdgeKind::SlotRange)
            .first()
            .map(|e| e.target)
    }

    /// Inbound slot edges to an enum, class, or shared slot
    pub fn slot_users(&self, id: &NodeId) -> Vec<GraphEdge<'_>> {
        let mut edges = self.edges(id, Direction::Incoming, EdgeKind::Property);
        // a shared slot is also reached by the classes carrying it
        if id.kind == EntityType::Slot {
            edges.extend(self.edges(id, Direction::Incoming, EdgeKind::ClassSlot));
        }
        edges.sort_by(|a, b| {
            a.source
                .name
                .cmp(&b.source.name)
                .then_with(|| slot_name(a).cmp(slot_name(b)))
        });
        edges
    }

    /// Classes using a range or shared slot, deduplicated, alphabetical
    pub fn used_by(&self, id: &NodeId) -> Vec<&str> {
        let mut names: Vec<&str> = self.slot_users(id).iter().map(|e| e.source.name.as_str()).collect();
        names.dedup();
        names
    }

    /// Variables mapped to a class, alphabetical
    pub fn variables_for(&self, class: &str) -> Vec<&str> {
        sorted_sources(self.edges(&NodeId::class(class), Direction::Incoming, EdgeKind::MapsTo))
    }

    /// Class a variable maps to
    pub fn mapped_class(&self, variable: &str) -> Option<&str> {
        self.edges(&NodeId::variable(variable), Direction::Outgoing, EdgeKind::MapsTo)
            .first()
            .map(|e| e.target.name.as_str())
    }
}

fn slot_name<'a>(edge: &GraphEdge<'a>) -> &'a str {
    edge.slot().map(|s| s.slot_name.as_str()).unwrap_or("")
}

fn sorted_sources(edges: Vec<GraphEdge<'_>>) -> Vec<&str> {
    let mut names: Vec<&str> = edges.into_iter().map(|e| e.source.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    names
}
