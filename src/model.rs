//! Schema Model
//!
//! [`SchemaModel`] owns every collection, the name index, and the
//! relationship graph. It is built once, in a fixed order, and never mutated
//! afterwards:
//!
//! ```text
//! enums, slots, types  ->  classes  ->  variables  ->  link variables
//!                      ->  name index  ->  relationship graph
//! ```
//!
//! Queries take `&SchemaModel`, so nothing can be asked of a model that has
//! not finished building.

use crate::collection::{
    ClassCollection, EnumCollection, SlotCollection, TypeCollection, VariableCollection,
};
use crate::config::ExplorerConfig;
use crate::diagnostics::Diagnostics;
use crate::dto::{SchemaDto, VariableDto};
use crate::error::Result;
use crate::graph::builder::GraphInputs;
use crate::graph::{build_graph, RelationshipGraph};
use crate::range::{NameTypeIndex, RangeClassifier};

/// Fully linked, immutable schema model
pub struct SchemaModel {
    classes: ClassCollection,
    enums: EnumCollection,
    slots: SlotCollection,
    types: TypeCollection,
    variables: VariableCollection,
    classifier: RangeClassifier,
    graph: RelationshipGraph,
    diagnostics: Diagnostics,
}

impl SchemaModel {
    /// Build with default configuration
    pub fn build(schema: &SchemaDto) -> Result<Self> {
        Self::build_with(schema, &[], &ExplorerConfig::default())
    }

    /// Build from a schema export plus variable rows from a separate sheet.
    ///
    /// `extra_variables` are appended after any variables embedded in the
    /// export.
    pub fn build_with(
        schema: &SchemaDto,
        extra_variables: &[VariableDto],
        config: &ExplorerConfig,
    ) -> Result<Self> {
        let mut diagnostics = Diagnostics::new();

        let enums = EnumCollection::from_dtos(&schema.enums);
        let slots = SlotCollection::from_dtos(&schema.slots);
        let types = TypeCollection::from_dtos(&schema.types);

        let classes = ClassCollection::from_dtos(&schema.classes, &slots, &mut diagnostics);

        let variable_rows: Vec<VariableDto> = schema
            .variables
            .iter()
            .chain(extra_variables)
            .cloned()
            .collect();
        let variables = VariableCollection::from_dtos(&variable_rows, &classes, &mut diagnostics);
        let classes = classes.link_variables(&variables);

        let index = NameTypeIndex::build(&classes, &enums, &slots, &types, &mut diagnostics);
        let classifier = RangeClassifier::with_extra_primitives(index, &config.model.extra_primitives);

        let graph = build_graph(
            &GraphInputs {
                classes: &classes,
                enums: &enums,
                slots: &slots,
                types: &types,
                variables: &variables,
                classifier: &classifier,
            },
            &config.graph,
            &mut diagnostics,
        )?;

        if !diagnostics.is_empty() {
            tracing::warn!(count = diagnostics.len(), "schema model built with data-integrity warnings");
        }

        Ok(Self {
            classes,
            enums,
            slots,
            types,
            variables,
            classifier,
            graph,
            diagnostics,
        })
    }

    pub fn classes(&self) -> &ClassCollection {
        &self.classes
    }

    pub fn enums(&self) -> &EnumCollection {
        &self.enums
    }

    pub fn slots(&self) -> &SlotCollection {
        &self.slots
    }

    pub fn types(&self) -> &TypeCollection {
        &self.types
    }

    pub fn variables(&self) -> &VariableCollection {
        &self.variables
    }

    pub fn classifier(&self) -> &RangeClassifier {
        &self.classifier
    }

    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    /// Data-integrity issues found while building
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}
