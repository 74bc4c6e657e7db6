//! GraphViz export

use petgraph::visit::EdgeRef;

use super::{EdgeKind, NodeId, RelationshipGraph};
use crate::entity::EntityType;

fn fill_color(kind: EntityType) -> &'static str {
    match kind {
        EntityType::Class => "#00BCD4",
        EntityType::Enum => "#FF5722",
        EntityType::Slot => "#9C27B0",
        EntityType::Type => "#607D8B",
        EntityType::Variable => "#4CAF50",
    }
}

/// Quoted ids keep the raw `kind:name`, so distinct names never collide
fn dot_id(id: &NodeId) -> String {
    escape(&id.to_string())
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

impl RelationshipGraph {
    /// Export the relationship graph to GraphViz DOT format
    pub fn to_dot(&self) -> String {
        let mut output = String::new();

        output.push_str("digraph SchemaModel {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str("  bgcolor=\"#1e1e1e\";\n");
        output.push_str("  node [shape=box, style=\"filled,rounded\", fontname=\"Helvetica\", fontsize=10, fontcolor=\"white\", color=\"#404040\"];\n");
        output.push_str("  edge [fontname=\"Helvetica\", fontsize=8, fontcolor=\"#808080\", color=\"#808080\"];\n");
        output.push('\n');

        let mut nodes: Vec<&NodeId> = self.graph.node_weights().collect();
        nodes.sort();
        for node in nodes {
            output.push_str(&format!(
                "  \"{}\" [label=\"{}\", fillcolor=\"{}\"];\n",
                dot_id(node),
                escape(&node.name),
                fill_color(node.kind)
            ));
        }

        output.push('\n');

        for edge in self.graph.edge_references() {
            let (Some(source), Some(target)) = (
                self.graph.node_weight(edge.source()),
                self.graph.node_weight(edge.target()),
            ) else {
                continue;
            };

            let data = edge.weight();
            let attrs = match data.kind {
                EdgeKind::Inheritance => "arrowhead=empty, style=bold".to_string(),
                EdgeKind::Property | EdgeKind::ClassSlot => {
                    let label = data.slot.as_ref().map(|s| s.slot_name.as_str()).unwrap_or("");
                    let style = if data.kind == EdgeKind::ClassSlot { ", style=dotted" } else { "" };
                    format!("label=\"{}\"{}", escape(label), style)
                }
                EdgeKind::SlotRange => "style=dotted".to_string(),
                EdgeKind::MapsTo => "style=dashed".to_string(),
            };
            output.push_str(&format!(
                "  \"{}\" -> \"{}\" [{}];\n",
                dot_id(source),
                dot_id(target),
                attrs
            ));
        }

        output.push_str("}\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SlotQueryMode;
    use crate::graph::EdgeData;

    #[test]
    fn test_dot_contains_nodes_and_edges() {
        let mut g = RelationshipGraph::new(SlotQueryMode::Direct);
        g.add_node(NodeId::class("Entity"));
        g.add_node(NodeId::class("Specimen"));
        g.add_node(NodeId::variable("Age at \"Dx\""));
        g.add_edge(&NodeId::class("Specimen"), &NodeId::class("Entity"), EdgeData::new(EdgeKind::Inheritance))
            .unwrap();

        let dot = g.to_dot();
        assert!(dot.starts_with("digraph SchemaModel {"));
        assert!(dot.contains("\"class:Specimen\" -> \"class:Entity\" [arrowhead=empty, style=bold];"));
        assert!(dot.contains("label=\"Age at \\\"Dx\\\"\""));
        assert!(dot.contains("\"variable:Age at \\\"Dx\\\"\" [label="));
    }

    #[test]
    fn test_similar_names_get_distinct_ids() {
        let spaced = dot_id(&NodeId::variable("Age at Dx"));
        let underscored = dot_id(&NodeId::variable("Age_at_Dx"));
        assert_ne!(spaced, underscored);
        assert_eq!(spaced, "variable:Age at Dx");

        let mut g = RelationshipGraph::new(SlotQueryMode::Direct);
        g.add_node(NodeId::variable("Age at Dx"));
        g.add_node(NodeId::variable("Age_at_Dx"));
        let dot = g.to_dot();
        assert!(dot.contains("\"variable:Age at Dx\" [label=\"Age at Dx\""));
        assert!(dot.contains("\"variable:Age_at_Dx\" [label=\"Age_at_Dx\""));
    }
}
