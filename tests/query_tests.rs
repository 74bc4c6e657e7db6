//! Query Facade Tests
//!
//! Exercises the explorer-facing queries over the sample export: detail
//! views, relationships, used-by, listing, and search.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use schema_explorer::{
    loader, EntityType, ExplorerConfig, Relationship, RelationshipKind, SchemaModel, Section,
    TreeEntry,
};

fn fixtures_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn sample_model() -> SchemaModel {
    let schema = loader::load_schema_file(&fixtures_path().join("sample_schema.json")).unwrap();
    let variables = loader::load_variable_specs(&fixtures_path().join("variables.tsv")).unwrap();
    SchemaModel::build_with(&schema, &variables, &ExplorerConfig::default()).unwrap()
}

fn rows(section: Option<&Section>) -> Vec<Vec<String>> {
    section.map(|s| s.rows().to_vec()).unwrap_or_default()
}

// =============================================================================
// Example Scenarios
// =============================================================================

#[test]
fn test_inline_enum_attribute_is_a_property_edge() {
    let model = sample_model();
    let rels = model.relationships("Specimen");

    assert!(rels.outgoing.contains(&Relationship {
        kind: RelationshipKind::Property,
        label: Some("specimenType".to_string()),
        target_id: "SpecimenTypeEnum".to_string(),
        target_type: EntityType::Enum,
        inherited_from: None,
    }));
    assert!(model.used_by("SpecimenTypeEnum").contains(&"Specimen".to_string()));
}

#[test]
fn test_variable_appears_as_incoming_maps_to() {
    let model = sample_model();
    let rels = model.relationships("Condition");
    assert!(rels
        .incoming
        .iter()
        .any(|r| r.kind == RelationshipKind::MapsTo && r.target_id == "Age at Diagnosis"));
}

#[test]
fn test_unknown_id_returns_empty_values() {
    let model = sample_model();
    assert!(!model.item_exists("NoSuchClass"));
    assert!(model.detail_data("NoSuchClass").is_none());
    assert!(model.relationships("NoSuchClass").is_empty());
    assert!(model.used_by("NoSuchClass").is_empty());
    assert!(model.element("NoSuchClass").is_none());
}

// =============================================================================
// Relationships
// =============================================================================

#[test]
fn test_class_relationships_full() {
    let model = sample_model();
    let rels = model.relationships("Participant");

    assert_eq!(
        rels.outgoing,
        vec![Relationship {
            kind: RelationshipKind::Inheritance,
            label: None,
            target_id: "Entity".to_string(),
            target_type: EntityType::Class,
            inherited_from: None,
        }]
    );

    let incoming: Vec<(RelationshipKind, &str, Option<&str>, Option<&str>)> = rels
        .incoming
        .iter()
        .map(|r| (r.kind, r.target_id.as_str(), r.label.as_deref(), r.inherited_from.as_deref()))
        .collect();
    assert_eq!(
        incoming,
        vec![
            (RelationshipKind::Property, "Condition", Some("subject"), None),
            (RelationshipKind::Property, "Material", Some("associated_participant"), None),
            (RelationshipKind::Property, "Specimen", Some("associated_participant"), None),
        ]
    );
}

#[test]
fn test_inherited_edges_are_tagged() {
    let model = sample_model();
    let rels = model.relationships("Material");
    let specimen_type = rels
        .outgoing
        .iter()
        .find(|r| r.label.as_deref() == Some("specimenType"))
        .unwrap();
    assert_eq!(specimen_type.inherited_from.as_deref(), Some("Specimen"));
    assert_eq!(rels.outgoing[0].kind, RelationshipKind::Inheritance);
    assert_eq!(rels.outgoing[0].target_id, "Specimen");
}

#[test]
fn test_enum_has_only_incoming() {
    let model = sample_model();
    let rels = model.relationships("SpecimenTypeEnum");
    assert!(rels.outgoing.is_empty());
    let sources: Vec<&str> = rels.incoming.iter().map(|r| r.target_id.as_str()).collect();
    assert_eq!(sources, vec!["Material", "Specimen"]);
}

#[test]
fn test_shared_slot_relationships() {
    let model = sample_model();
    let rels = model.relationships("associated_participant");

    assert_eq!(rels.outgoing.len(), 1);
    assert_eq!(rels.outgoing[0].target_id, "Participant");
    assert_eq!(rels.outgoing[0].target_type, EntityType::Class);

    let users: Vec<&str> = rels.incoming.iter().map(|r| r.target_id.as_str()).collect();
    assert_eq!(users, vec!["Material", "Specimen"]);
}

#[test]
fn test_type_has_no_relationships() {
    let model = sample_model();
    assert!(model.item_exists("Milliliters"));
    assert!(model.relationships("Milliliters").is_empty());
    assert!(model.used_by("Milliliters").is_empty());
}

#[test]
fn test_reverse_relationship_symmetry() {
    let model = sample_model();
    for class in model.all_of_type(EntityType::Class) {
        for rel in model.relationships(&class).outgoing {
            if rel.kind != RelationshipKind::Property {
                continue;
            }
            assert!(
                model.used_by(&rel.target_id).contains(&class),
                "{} -> {} missing from used_by",
                class,
                rel.target_id
            );
        }
    }
}

// =============================================================================
// Used By / Listing
// =============================================================================

#[test]
fn test_used_by_is_sorted_and_stable() {
    let model = sample_model();
    assert_eq!(model.used_by("SpecimenTypeEnum"), vec!["Material", "Specimen"]);
    assert_eq!(model.used_by("Participant"), vec!["Condition", "Material", "Specimen"]);
    assert_eq!(model.used_by("age"), vec!["Condition", "Participant"]);
    assert_eq!(model.used_by("Participant"), model.used_by("Participant"));
    assert_eq!(model.relationships("Participant"), model.relationships("Participant"));
}

#[test]
fn test_all_of_type() {
    let model = sample_model();
    assert_eq!(
        model.all_of_type(EntityType::Class),
        vec!["Condition", "Entity", "Material", "Participant", "Specimen"]
    );
    assert_eq!(model.all_of_type(EntityType::Enum), vec!["SpecimenTypeEnum"]);
    assert_eq!(model.all_of_type(EntityType::Type), vec!["Milliliters"]);
    assert_eq!(
        model.all_of_type(EntityType::Variable),
        vec!["Age at Diagnosis", "Specimen Volume"]
    );
}

#[test]
fn test_identifier_round_trip() {
    let model = sample_model();
    for kind in EntityType::ALL {
        for name in model.all_of_type(kind) {
            let element = model.element(&name).unwrap();
            assert_eq!(element.name(), name);
            assert_eq!(element.entity_type(), kind);
            assert!(model.item_exists(&name));
        }
    }
}

#[test]
fn test_badges() {
    let model = sample_model();
    assert_eq!(model.badge("Entity"), Some(1));
    assert_eq!(model.badge("Specimen"), Some(4));
    assert_eq!(model.badge("Condition"), Some(3));
    assert_eq!(model.badge("SpecimenTypeEnum"), Some(3));
    assert_eq!(model.badge("age"), None);
}

#[test]
fn test_class_tree() {
    let model = sample_model();
    let entry = |name: &str, depth: usize, is_abstract: bool| TreeEntry {
        name: name.to_string(),
        depth,
        is_abstract,
    };
    assert_eq!(
        model.class_tree(),
        vec![
            entry("Entity", 0, true),
            entry("Condition", 1, false),
            entry("Participant", 1, false),
            entry("Specimen", 1, false),
            entry("Material", 2, false),
        ]
    );
}

#[test]
fn test_search() {
    let model = sample_model();
    let hits = model.search("specimen", 5);
    assert!(hits.len() <= 5);
    assert!(hits.iter().any(|h| h.name == "Specimen" && h.entity_type == EntityType::Class));
    assert!(hits.iter().any(|h| h.name == "SpecimenTypeEnum"));
    assert!(model.search("qqqqqq", 5).is_empty());
}

// =============================================================================
// Detail Views
// =============================================================================

#[test]
fn test_class_detail() {
    let model = sample_model();
    let detail = model.detail_data("Material").unwrap();

    assert_eq!(detail.title, "Material");
    assert_eq!(detail.subtitle.as_deref(), Some("Class extends Specimen"));
    assert_eq!(detail.description.as_deref(), Some("Material derived from a specimen"));

    match detail.section("Inheritance") {
        Some(Section::Text { text, .. }) => assert_eq!(text, "Entity > Specimen > Material"),
        other => panic!("Expected inheritance text, got {:?}", other),
    }

    let slot_rows = rows(detail.section("Slots"));
    let summary: Vec<(&str, &str, &str, &str)> = slot_rows
        .iter()
        .map(|r| (r[0].as_str(), r[1].as_str(), r[2].as_str(), r[5].as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("associated_participant", "Participant", "yes", ""),
            ("specimenType", "SpecimenTypeEnum", "no", "Specimen"),
            ("volume", "Milliliters", "no", "Specimen"),
            ("id", "uriorcurie", "yes", "Entity"),
        ]
    );
}

#[test]
fn test_class_detail_lists_variables_and_subclasses() {
    let model = sample_model();

    let condition = model.detail_data("Condition").unwrap();
    assert_eq!(
        rows(condition.section("Variables")),
        vec![vec![
            "Age at Diagnosis".to_string(),
            "integer".to_string(),
            "a".to_string(),
            "NCIT:C156420".to_string(),
        ]]
    );

    let entity = model.detail_data("Entity").unwrap();
    assert_eq!(entity.subtitle.as_deref(), Some("Abstract class"));
    let subclasses: Vec<String> = rows(entity.section("Subclasses")).into_iter().map(|r| r[0].clone()).collect();
    assert_eq!(subclasses, vec!["Condition", "Participant", "Specimen"]);
    assert!(entity.section("Inheritance").is_none());
}

#[test]
fn test_class_detail_agrees_with_graph() {
    let model = sample_model();
    for name in model.all_of_type(EntityType::Class) {
        let detail = model.detail_data(&name).unwrap();
        let subclasses: Vec<String> = rows(detail.section("Subclasses")).into_iter().map(|r| r[0].clone()).collect();
        let variables: Vec<String> = rows(detail.section("Variables")).into_iter().map(|r| r[0].clone()).collect();

        assert_eq!(subclasses, model.graph().subclasses(&name), "subclasses of {}", name);
        assert_eq!(variables, model.graph().variables_for(&name), "variables of {}", name);
    }
}

#[test]
fn test_enum_detail() {
    let model = sample_model();
    let detail = model.detail_data("SpecimenTypeEnum").unwrap();

    assert_eq!(detail.subtitle.as_deref(), Some("Enum"));
    assert_eq!(
        rows(detail.section("Permissible Values")),
        vec![
            vec!["blood".to_string(), "Whole blood".to_string()],
            vec!["tissue".to_string(), String::new()],
            vec!["saliva".to_string(), String::new()],
        ]
    );
    assert_eq!(
        rows(detail.section("Used By")),
        vec![
            vec!["Material".to_string(), "specimenType".to_string(), "Specimen".to_string()],
            vec!["Specimen".to_string(), "specimenType".to_string(), String::new()],
        ]
    );
}

#[test]
fn test_slot_type_and_variable_details() {
    let model = sample_model();

    let slot = model.detail_data("associated_participant").unwrap();
    let props = rows(slot.section("Properties"));
    assert_eq!(props[0], vec!["Range".to_string(), "Participant".to_string()]);
    assert!(props.contains(&vec!["Slot URI".to_string(), "bdchm:associated_participant".to_string()]));

    let ty = model.detail_data("Milliliters").unwrap();
    assert_eq!(ty.subtitle.as_deref(), Some("Type"));
    assert!(rows(ty.section("Properties")).contains(&vec!["Base".to_string(), "decimal".to_string()]));

    let var = model.detail_data("Age at Diagnosis").unwrap();
    assert_eq!(var.subtitle.as_deref(), Some("Variable of Condition"));
    assert_eq!(var.description.as_deref(), Some("Age of the participant at diagnosis"));
}

#[test]
fn test_detail_serializes_tagged_sections() {
    let model = sample_model();
    let value = serde_json::to_value(model.detail_data("Specimen").unwrap()).unwrap();
    assert_eq!(value["title"], "Specimen");
    assert_eq!(value["sections"][0]["kind"], "text");
    assert_eq!(value["sections"][1]["kind"], "table");
    assert_eq!(value["sections"][1]["heading"], "Slots");
}

#[test]
fn test_dot_export() {
    let model = sample_model();
    let dot = model.graph().to_dot();
    assert!(dot.contains("\"class:Material\" -> \"class:Specimen\""));
    assert!(dot.contains("\"variable:Age at Diagnosis\" -> \"class:Condition\""));
}
