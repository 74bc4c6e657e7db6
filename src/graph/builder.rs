//! Graph Construction
//!
//! Adds every node first (grouped by type), then edges: inheritance, slot
//! edges from each class's resolved slot set, and variable mappings.

use std::collections::HashSet;

use super::{EdgeData, EdgeKind, NodeId, RelationshipGraph, SlotEdge};
use crate::class_slot::ClassSlot;
use crate::collection::{ClassCollection, EnumCollection, SlotCollection, TypeCollection, VariableCollection};
use crate::config::GraphConfig;
use crate::diagnostics::Diagnostics;
use crate::entity::{ClassEntity, EntityType};
use crate::error::Result;
use crate::range::RangeClassifier;

/// Everything the graph is built from
pub struct GraphInputs<'a> {
    pub classes: &'a ClassCollection,
    pub enums: &'a EnumCollection,
    pub slots: &'a SlotCollection,
    pub types: &'a TypeCollection,
    pub variables: &'a VariableCollection,
    pub classifier: &'a RangeClassifier,
}

/// Build the relationship graph from resolved collections
pub fn build_graph(
    inputs: &GraphInputs<'_>,
    config: &GraphConfig,
    diagnostics: &mut Diagnostics,
) -> Result<RelationshipGraph> {
    let mut graph = RelationshipGraph::new(config.slot_query_mode);

    for class in inputs.classes.iter() {
        graph.add_node(NodeId::class(&class.name));
    }
    for e in inputs.enums.iter_sorted() {
        graph.add_node(NodeId::new(EntityType::Enum, &e.name));
    }
    for slot in inputs.slots.iter() {
        graph.add_node(NodeId::slot(&slot.name));
    }
    for ty in inputs.types.iter() {
        graph.add_node(NodeId::new(EntityType::Type, &ty.name));
    }
    for var in inputs.variables.iter() {
        graph.add_node(NodeId::variable(&var.name));
    }

    for class in inputs.classes.iter() {
        if let Some(parent) = &class.parent {
            graph.add_edge(
                &NodeId::class(&class.name),
                &NodeId::class(parent),
                EdgeData::new(EdgeKind::Inheritance),
            )?;
        }
    }

    let mut linked_slots: HashSet<String> = HashSet::new();
    for class in inputs.classes.iter() {
        add_slot_edges(&mut graph, class, inputs, config, &mut linked_slots, diagnostics)?;
    }

    for var in inputs.variables.iter() {
        graph.add_edge(
            &NodeId::variable(&var.name),
            &NodeId::class(&var.class_id),
            EdgeData::new(EdgeKind::MapsTo),
        )?;
    }

    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        mode = ?graph.mode(),
        "built relationship graph"
    );
    Ok(graph)
}

fn add_slot_edges(
    graph: &mut RelationshipGraph,
    class: &ClassEntity,
    inputs: &GraphInputs<'_>,
    config: &GraphConfig,
    linked_slots: &mut HashSet<String>,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let class_id = NodeId::class(&class.name);

    let slots: Vec<ClassSlot> = if config.include_inherited {
        inputs.classes.collect_all_slots(&class.name).into_values().collect()
    } else {
        class.class_slots.clone()
    };

    for slot in &slots {
        let defining = slot.defining_class();
        let inherited_from = (defining != class.name).then(|| defining.to_string());
        let edge = SlotEdge {
            slot_name: slot.name.clone(),
            slot_id: slot.defining_slot_id(),
            source: slot.source,
            required: slot.effective_required(),
            multivalued: slot.effective_multivalued(),
            inherited_from,
        };

        // Unresolved ranges are reported once, on the defining class
        let range = slot.effective_range();
        let kind = if edge.inherited_from.is_none() {
            inputs.classifier.classify_for(&class.name, range, diagnostics)
        } else {
            inputs.classifier.classify(range)
        };
        if let Some(target_type) = inputs.classifier.target_type(range, kind) {
            graph.add_edge(
                &class_id,
                &NodeId::new(target_type, range),
                EdgeData::with_slot(EdgeKind::Property, edge.clone()),
            )?;
        }

        if !slot.is_shared() {
            continue;
        }

        let slot_id = NodeId::slot(&slot.base_slot.name);
        graph.add_edge(&class_id, &slot_id, EdgeData::with_slot(EdgeKind::ClassSlot, edge))?;

        if !linked_slots.insert(slot.base_slot.name.clone()) {
            continue;
        }
        if let Some(base_range) = slot.base_slot.range.as_deref() {
            let kind = inputs.classifier.classify_for(&slot.base_slot.name, base_range, diagnostics);
            if let Some(target_type) = inputs.classifier.target_type(base_range, kind) {
                graph.add_edge(
                    &slot_id,
                    &NodeId::new(target_type, base_range),
                    EdgeData::new(EdgeKind::SlotRange),
                )?;
            }
        }
    }

    Ok(())
}
