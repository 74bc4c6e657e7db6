//! Detail Views
//!
//! Display-ready, framework-agnostic projection of one entity: a title,
//! optional subtitle and description, and a list of text or table sections.

use serde::Serialize;

use crate::class_slot::DEFAULT_RANGE;
use crate::collection::Collection;
use crate::entity::{
    ClassEntity, Element, EntityType, EnumEntity, SlotEntity, TypeEntity, VariableEntity,
};
use crate::graph::{GraphEdge, NodeId};
use crate::model::SchemaModel;

/// Detail panel content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailData {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sections: Vec<Section>,
}

impl DetailData {
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading() == heading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Text {
        heading: String,
        text: String,
    },
    Table {
        heading: String,
        headings: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl Section {
    pub fn heading(&self) -> &str {
        match self {
            Self::Text { heading, .. } | Self::Table { heading, .. } => heading,
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        match self {
            Self::Table { rows, .. } => rows,
            Self::Text { .. } => &[],
        }
    }

    fn table(heading: &str, headings: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self::Table {
            heading: heading.to_string(),
            headings: headings.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "yes" } else { "no" };
    text.to_string()
}

fn or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Build the detail view for an element
pub(crate) fn detail_for(element: Element<'_>, model: &SchemaModel) -> DetailData {
    match element {
        Element::Class(class) => class_detail(class, model),
        Element::Enum(e) => enum_detail(e, model),
        Element::Slot(slot) => slot_detail(slot, model),
        Element::Type(ty) => type_detail(ty),
        Element::Variable(var) => variable_detail(var),
    }
}

fn class_detail(class: &ClassEntity, model: &SchemaModel) -> DetailData {
    let kind = if class.is_abstract { "Abstract class" } else { "Class" };
    let subtitle = match &class.parent {
        Some(parent) => format!("{} extends {}", kind, parent),
        None => kind.to_string(),
    };

    let mut sections = Vec::new();

    if class.parent.is_some() {
        sections.push(Section::Text {
            heading: "Inheritance".to_string(),
            text: class.node_path.replace('.', " > "),
        });
    }

    let slot_rows: Vec<Vec<String>> = model
        .classes()
        .collect_all_slots(&class.name)
        .values()
        .map(|slot| {
            let defining = slot.defining_class();
            vec![
                slot.name.clone(),
                slot.effective_range().to_string(),
                yes_no(slot.effective_required()),
                yes_no(slot.effective_multivalued()),
                slot.source.to_string(),
                if defining == class.name { String::new() } else { defining.to_string() },
                or_empty(slot.effective_description()),
            ]
        })
        .collect();
    if !slot_rows.is_empty() {
        sections.push(Section::table(
            "Slots",
            &["Name", "Range", "Required", "Multivalued", "Source", "Inherited From", "Description"],
            slot_rows,
        ));
    }

    let graph = model.graph();

    let subclass_rows: Vec<Vec<String>> = graph
        .subclasses(&class.name)
        .into_iter()
        .filter_map(|name| model.classes().get(name))
        .map(|child| vec![child.name.clone(), or_empty(child.description.as_deref())])
        .collect();
    if !subclass_rows.is_empty() {
        sections.push(Section::table("Subclasses", &["Name", "Description"], subclass_rows));
    }

    push_used_by(&mut sections, graph.slot_users(&NodeId::class(&class.name)));

    let variable_rows: Vec<Vec<String>> = graph
        .variables_for(&class.name)
        .into_iter()
        .filter_map(|name| model.variables().get(name))
        .map(|v| {
            vec![
                v.name.clone(),
                or_empty(v.data_type.as_deref()),
                or_empty(v.ucum_unit.as_deref()),
                or_empty(v.curie.as_deref()),
            ]
        })
        .collect();
    if !variable_rows.is_empty() {
        sections.push(Section::table(
            "Variables",
            &["Label", "Data Type", "Unit", "CURIE"],
            variable_rows,
        ));
    }

    DetailData {
        title: class.name.clone(),
        subtitle: Some(subtitle),
        description: class.description.clone(),
        sections,
    }
}

fn enum_detail(e: &EnumEntity, model: &SchemaModel) -> DetailData {
    let mut sections = Vec::new();

    let value_rows: Vec<Vec<String>> = e
        .permissible_values
        .iter()
        .map(|v| vec![v.key.clone(), or_empty(v.description.as_deref())])
        .collect();
    sections.push(Section::table(
        "Permissible Values",
        &["Value", "Description"],
        value_rows,
    ));

    push_used_by(
        &mut sections,
        model.graph().slot_users(&NodeId::new(EntityType::Enum, &e.name)),
    );

    DetailData {
        title: e.name.clone(),
        subtitle: Some("Enum".to_string()),
        description: e.description.clone(),
        sections,
    }
}

fn slot_detail(slot: &SlotEntity, model: &SchemaModel) -> DetailData {
    let mut rows = vec![vec![
        "Range".to_string(),
        slot.range.clone().unwrap_or_else(|| DEFAULT_RANGE.to_string()),
    ]];
    if let Some(uri) = &slot.slot_uri {
        rows.push(vec!["Slot URI".to_string(), uri.clone()]);
    }
    rows.push(vec!["Identifier".to_string(), yes_no(slot.identifier.unwrap_or(false))]);
    rows.push(vec!["Required".to_string(), yes_no(slot.required.unwrap_or(false))]);
    rows.push(vec!["Multivalued".to_string(), yes_no(slot.multivalued.unwrap_or(false))]);

    let mut sections = vec![Section::table("Properties", &["Property", "Value"], rows)];
    push_used_by(&mut sections, model.graph().slot_users(&NodeId::slot(&slot.name)));

    DetailData {
        title: slot.name.clone(),
        subtitle: Some("Slot".to_string()),
        description: slot.description.clone(),
        sections,
    }
}

fn type_detail(ty: &TypeEntity) -> DetailData {
    let mut rows = Vec::new();
    if let Some(uri) = &ty.uri {
        rows.push(vec!["URI".to_string(), uri.clone()]);
    }
    if let Some(base) = &ty.base {
        rows.push(vec!["Base".to_string(), base.clone()]);
    }

    let mut sections = Vec::new();
    if !rows.is_empty() {
        sections.push(Section::table("Properties", &["Property", "Value"], rows));
    }

    DetailData {
        title: ty.name.clone(),
        subtitle: Some("Type".to_string()),
        description: ty.description.clone(),
        sections,
    }
}

fn variable_detail(var: &VariableEntity) -> DetailData {
    let mut rows = vec![vec!["Class".to_string(), var.class_id.clone()]];
    let optional = [
        ("Data Type", &var.data_type),
        ("Unit", &var.ucum_unit),
        ("CURIE", &var.curie),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            rows.push(vec![label.to_string(), value.clone()]);
        }
    }

    DetailData {
        title: var.name.clone(),
        subtitle: Some(format!("Variable of {}", var.class_id)),
        description: var.description.clone(),
        sections: vec![Section::table("Properties", &["Property", "Value"], rows)],
    }
}

fn push_used_by(sections: &mut Vec<Section>, users: Vec<GraphEdge<'_>>) {
    let rows: Vec<Vec<String>> = users
        .iter()
        .filter_map(|edge| {
            let slot = edge.slot()?;
            Some(vec![
                edge.source.name.clone(),
                slot.slot_name.clone(),
                or_empty(slot.inherited_from.as_deref()),
            ])
        })
        .collect();
    if !rows.is_empty() {
        sections.push(Section::table("Used By", &["Class", "Slot", "Inherited From"], rows));
    }
}
