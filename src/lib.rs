//! Schema Explorer Model
//!
//! In-memory graph model behind a LinkML schema explorer: ingests a processed
//! schema export (classes, enums, slots, types) plus variable specs, resolves
//! inheritance and slot overrides, and answers the relationship queries that
//! drive the explorer's panels.
//!
//! ## Pipeline
//!
//! ```text
//! schema JSON + variable TSV
//!   └─ dto          serde shapes, export order preserved
//!      └─ collection  entities, class tree, resolved ClassSlots
//!         └─ range      name index + range classification
//!            └─ graph     petgraph multigraph (single source of truth)
//!               └─ query    SchemaModel facade: exists / detail / relationships / used-by
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use schema_explorer::{loader, ExplorerConfig, SchemaModel};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ExplorerConfig::load()?;
//! let bundle = loader::load_bundle(&config)?;
//! let model = SchemaModel::build_with(&bundle.schema, &bundle.variables, &config)?;
//!
//! for class in model.used_by("SpecimenTypeEnum") {
//!     println!("{class}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod class_slot;
pub mod collection;
pub mod config;
pub mod detail;
pub mod diagnostics;
pub mod dto;
pub mod entity;
pub mod error;
pub mod graph;
pub mod loader;
pub mod model;
pub mod query;
pub mod range;

pub use class_slot::{ClassSlot, SlotSource};
pub use collection::{
    ClassCollection, Collection, EnumCollection, SlotCollection, TreeEntry, TypeCollection,
    VariableCollection,
};
pub use config::{ExplorerConfig, SlotQueryMode};
pub use detail::{DetailData, Section};
pub use diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics, Severity};
pub use dto::SchemaDto;
pub use entity::{
    ClassEntity, Element, EntityType, EnumEntity, PermissibleValue, SlotEntity, TypeEntity,
    VariableEntity,
};
pub use error::{ModelError, Result};
pub use graph::{EdgeKind, NodeId, RelationshipGraph};
pub use model::SchemaModel;
pub use query::{Relationship, RelationshipKind, Relationships, SearchResult};
pub use range::{RangeClassifier, RangeKind};
