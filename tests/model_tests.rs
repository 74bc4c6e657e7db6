//! Model Construction Tests
//!
//! Builds the model from the sample export and checks inheritance, slot
//! resolution, and the diagnostics recorded for imperfect data.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use schema_explorer::{
    loader, Collection, DiagnosticCode, EdgeKind, EntityType, ExplorerConfig, NodeId, SchemaDto,
    SchemaModel, SlotQueryMode, SlotSource,
};

fn fixtures_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn build(config: &ExplorerConfig) -> SchemaModel {
    let schema = loader::load_schema_file(&fixtures_path().join("sample_schema.json")).unwrap();
    let variables = loader::load_variable_specs(&fixtures_path().join("variables.tsv")).unwrap();
    SchemaModel::build_with(&schema, &variables, config).unwrap()
}

fn sample_model() -> SchemaModel {
    build(&ExplorerConfig::default())
}

fn processed_model() -> SchemaModel {
    let schema = loader::load_schema_file(&fixtures_path().join("processed_schema.json")).unwrap();
    SchemaModel::build(&schema).unwrap()
}

fn inline_model(json: serde_json::Value) -> SchemaModel {
    let schema: SchemaDto = serde_json::from_value(json).unwrap();
    SchemaModel::build(&schema).unwrap()
}

// =============================================================================
// Inheritance
// =============================================================================

#[test]
fn test_class_tree_links() {
    let model = sample_model();
    let classes = model.classes();

    assert_eq!(classes.roots(), &["Entity".to_string()]);
    let entity = classes.get("Entity").unwrap();
    assert_eq!(entity.children, vec!["Condition", "Participant", "Specimen"]);

    let material = classes.get("Material").unwrap();
    assert_eq!(material.parent.as_deref(), Some("Specimen"));
    assert_eq!(material.node_path, "Entity.Specimen.Material");

    let names: Vec<&str> = classes.ancestors("Material").iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Specimen", "Entity"]);
}

#[test]
fn test_inheritance_is_acyclic() {
    let model = sample_model();
    for class in model.classes().iter() {
        let ancestors = model.classes().ancestors(&class.name);
        assert!(ancestors.iter().all(|a| a.name != class.name), "{} is its own ancestor", class.name);
    }
}

#[test]
fn test_cycle_is_broken_with_diagnostic() {
    let model = inline_model(serde_json::json!({
        "classes": {
            "A": { "is_a": "B" },
            "B": { "is_a": "A" },
            "C": { "is_a": "Ghost" }
        }
    }));

    let a = model.classes().get("A").unwrap();
    let b = model.classes().get("B").unwrap();
    assert_eq!(a.parent.as_deref(), Some("B"));
    assert!(b.is_root());
    assert_eq!(b.parent_id.as_deref(), Some("A"));
    assert!(model.diagnostics().has(DiagnosticCode::InheritanceCycle, "B"));

    assert!(model.classes().get("C").unwrap().is_root());
    assert!(model.diagnostics().has(DiagnosticCode::UnknownParentClass, "C"));

    for class in model.classes().iter() {
        assert!(model.classes().ancestors(&class.name).len() < model.classes().len());
    }
}

// =============================================================================
// Slot Resolution
// =============================================================================

#[test]
fn test_inherited_global_slot_provenance() {
    let model = sample_model();
    let slots = model.classes().collect_all_slots("Material");

    let id = &slots["id"];
    assert!(id.slot_path.ends_with("Entity"));
    assert_eq!(id.source, SlotSource::SlotReference);
    assert_eq!(
        model.classes().inherited_from("Material", "id").as_deref(),
        Some("Entity")
    );
}

#[test]
fn test_subclass_definition_shadows_ancestor() {
    let model = sample_model();
    let slots = model.classes().collect_all_slots("Material");

    let names: Vec<&str> = slots.keys().map(|k| k.as_str()).collect();
    assert_eq!(names, vec!["associated_participant", "specimenType", "volume", "id"]);

    let participant = &slots["associated_participant"];
    assert_eq!(participant.source, SlotSource::SlotUsage);
    assert!(participant.effective_required());
    assert_eq!(model.classes().inherited_from("Material", "associated_participant"), None);

    let specimen_slot = model
        .classes()
        .get("Specimen")
        .unwrap()
        .class_slot("associated_participant")
        .unwrap();
    assert!(!specimen_slot.effective_required());
}

#[test]
fn test_slot_usage_override_wins_over_base() {
    let model = sample_model();
    let age = model.classes().get("Condition").unwrap().class_slot("age").unwrap();

    assert_eq!(age.source, SlotSource::SlotUsage);
    assert_eq!(age.base_slot.required, Some(false));
    assert!(age.effective_required());
    assert_eq!(age.effective_description(), Some("Age at onset"));
    assert_eq!(age.effective_range(), "integer");

    let plain = model.classes().get("Participant").unwrap().class_slot("age").unwrap();
    assert!(!plain.effective_required());
    assert_eq!(plain.effective_description(), Some("Age in years"));
}

#[test]
fn test_processed_export_entries_are_not_duplicated() {
    let model = sample_model();

    // attribute merged into Material by the export
    let material = model.classes().get("Material").unwrap();
    assert!(material.class_slot("specimenType").is_none());
    assert_eq!(
        model.classes().inherited_from("Material", "specimenType").as_deref(),
        Some("Specimen")
    );

    // per-class override instance
    assert!(!model.slots().contains("associated_participant-Material"));
    assert_eq!(model.slots().names(), vec!["age", "associated_participant", "id"]);
}

#[test]
fn test_unknown_slot_reference_is_skipped() {
    let model = inline_model(serde_json::json!({
        "classes": { "Sample": { "slots": ["nope"], "slot_usage": { "gone": { "required": true } } } }
    }));
    assert!(model.classes().get("Sample").unwrap().class_slots.is_empty());
    assert!(model.diagnostics().has(DiagnosticCode::UnknownSlotReference, "Sample"));
    assert_eq!(model.diagnostics().with_code(DiagnosticCode::UnknownSlotReference).count(), 2);
}

#[test]
fn test_slot_range_links_to_slot_node() {
    let model = inline_model(serde_json::json!({
        "classes": {
            "Participant": {},
            "Sample": { "attributes": { "subject": { "range": "participant" } } }
        },
        "slots": { "participant": { "range": "Participant" } }
    }));
    assert!(model.diagnostics().is_empty());

    let subject = model
        .relationships("Sample")
        .outgoing
        .into_iter()
        .find(|r| r.label.as_deref() == Some("subject"))
        .unwrap();
    assert_eq!(subject.target_id, "participant");
    assert_eq!(subject.target_type, EntityType::Slot);

    assert_eq!(model.used_by("participant"), vec!["Sample".to_string()]);
}

// =============================================================================
// Processed Export
// =============================================================================

#[test]
fn test_processed_override_instance_is_class_specific() {
    let model = processed_model();
    let age = model.classes().get("Condition").unwrap().class_slot("age").unwrap();

    assert_eq!(age.source, SlotSource::SlotUsage);
    assert!(age.effective_required());
    assert_eq!(age.base_slot.name, "age");
    assert_eq!(age.base_slot.required, Some(false));
    assert_eq!(age.defining_class(), "Condition");
    assert_eq!(model.classes().inherited_from("Condition", "age"), None);

    let plain = &model.classes().collect_all_slots("Participant")["age"];
    assert!(!plain.effective_required());
    assert_eq!(plain.effective_description(), Some("Age in years"));
    assert_eq!(model.classes().inherited_from("Participant", "age").as_deref(), Some("Entity"));

    // subclasses of the overriding class see the override
    assert_eq!(model.classes().inherited_from("Diagnosis", "age").as_deref(), Some("Condition"));
    assert!(model.classes().collect_all_slots("Diagnosis")["age"].effective_required());
}

#[test]
fn test_processed_slot_ids_bind_shared_slots() {
    let model = processed_model();
    assert!(model.diagnostics().is_empty());

    let id = model.classes().get("Entity").unwrap().class_slot("id").unwrap();
    assert_eq!(id.source, SlotSource::SlotReference);
    assert!(id.is_shared());

    assert_eq!(
        model.used_by("age"),
        vec!["Condition", "Diagnosis", "Entity", "Participant"]
    );
    assert_eq!(model.used_by("Condition"), vec!["Participant"]);
    assert_eq!(model.used_by("SeverityEnum"), vec!["Condition", "Diagnosis"]);
}

#[test]
fn test_processed_inherited_attributes_not_duplicated() {
    let model = processed_model();
    let own = |name: &str| -> Vec<String> {
        model
            .classes()
            .get(name)
            .unwrap()
            .class_slots
            .iter()
            .map(|s| s.name.clone())
            .collect()
    };

    assert_eq!(own("Participant"), vec!["conditions"]);
    assert_eq!(own("Condition"), vec!["age", "severity"]);
    assert_eq!(own("Diagnosis"), vec!["code"]);
    assert_eq!(model.classes().collect_all_slots("Diagnosis").len(), 4);

    assert!(!model.slots().contains("age-Condition"));
    assert_eq!(model.slots().names(), vec!["age", "code", "conditions", "id", "severity"]);
}

// =============================================================================
// Variables & Diagnostics
// =============================================================================

#[test]
fn test_variables_grouped_and_linked() {
    let model = sample_model();
    assert_eq!(model.variables().len(), 2);
    assert_eq!(
        model.classes().get("Condition").unwrap().variables,
        vec!["Age at Diagnosis".to_string()]
    );

    let var = model.variables().get("Age at Diagnosis").unwrap();
    assert_eq!(var.class_id, "Condition");
    assert_eq!(var.ucum_unit.as_deref(), Some("a"));
    assert_eq!(var.curie.as_deref(), Some("NCIT:C156420"));
}

#[test]
fn test_sample_diagnostics() {
    let model = sample_model();
    let diags = model.diagnostics();
    assert!(diags.has(DiagnosticCode::DuplicateVariable, "Specimen Volume"));
    assert!(diags.has(DiagnosticCode::UnknownVariableClass, "Orphan Variable"));
    assert_eq!(diags.len(), 2);
}

#[test]
fn test_unresolved_range_uses_fallback_without_edge() {
    let model = inline_model(serde_json::json!({
        "classes": {
            "Sample": { "attributes": { "kind": { "range": "MysteryEnum" }, "owner": { "range": "Mystery" } } }
        }
    }));
    assert!(model.diagnostics().has(DiagnosticCode::UnresolvedRange, "Sample"));
    assert_eq!(model.diagnostics().with_code(DiagnosticCode::UnresolvedRange).count(), 2);
    assert!(model.graph().slot_edges("Sample").is_empty());
}

#[test]
fn test_name_collision_first_registration_wins() {
    let model = inline_model(serde_json::json!({
        "classes": { "Shared": {} },
        "enums": { "Shared": { "permissible_values": { "a": null } } }
    }));
    assert!(model.diagnostics().has(DiagnosticCode::NameCollision, "Shared"));
    assert_eq!(model.element("Shared").unwrap().entity_type(), EntityType::Class);
}

// =============================================================================
// Graph
// =============================================================================

#[test]
fn test_graph_contains_every_entity() {
    let model = sample_model();
    let graph = model.graph();
    assert!(graph.contains(&NodeId::class("Material")));
    assert!(graph.contains(&NodeId::slot("age")));
    assert!(graph.contains(&NodeId::variable("Age at Diagnosis")));
    assert!(!graph.contains(&NodeId::variable("Orphan Variable")));
    assert!(graph.has_edge_key("inheritance|class:Material->class:Specimen"));
    assert!(graph.has_edge_key("maps_to|variable:Age at Diagnosis->class:Condition"));
}

#[test]
fn test_inherited_slot_edges_carry_ancestor() {
    let model = sample_model();
    let edges = model.graph().slot_edges("Material");
    let specimen_type = edges.iter().find(|e| e.slot.slot_name == "specimenType").unwrap();
    assert_eq!(specimen_type.slot.inherited_from.as_deref(), Some("Specimen"));
    assert_eq!(specimen_type.slot.slot_id, "Specimen.specimenType");
    assert_eq!(specimen_type.target.name, "SpecimenTypeEnum");
}

#[test]
fn test_include_inherited_false_limits_to_own_slots() {
    let mut config = ExplorerConfig::default();
    config.graph.include_inherited = false;
    let model = build(&config);

    let labels: Vec<&str> = model
        .graph()
        .slot_edges("Material")
        .iter()
        .map(|e| e.slot.slot_name.as_str())
        .collect();
    assert_eq!(labels, vec!["associated_participant"]);
}

#[test]
fn test_query_modes_agree_on_targets() {
    let direct = sample_model();
    let mut config = ExplorerConfig::default();
    config.graph.slot_query_mode = SlotQueryMode::ViaSharedSlot;
    let via = build(&config);

    for class in direct.classes().names() {
        let a: BTreeSet<(String, String)> = direct
            .graph()
            .slot_edges(class)
            .iter()
            .map(|e| (e.slot.slot_name.clone(), e.target.name.clone()))
            .collect();
        let b: BTreeSet<(String, String)> = via
            .graph()
            .slot_edges(class)
            .iter()
            .map(|e| (e.slot.slot_name.clone(), e.target.name.clone()))
            .collect();
        assert_eq!(a, b, "slot targets differ for {}", class);
    }
}

#[test]
fn test_shared_slot_range_edge_added_once() {
    let model = sample_model();
    let hops = model.graph().edges(
        &NodeId::slot("associated_participant"),
        petgraph::Direction::Outgoing,
        EdgeKind::SlotRange,
    );
    assert_eq!(hops.len(), 1);
    assert_eq!(hops[0].target.name, "Participant");
}
