//! Class Tree
//!
//! Builds [`ClassEntity`] values from class DTOs in three passes:
//!
//! 1. instantiate every class and materialize its own [`ClassSlot`]s
//!    (attributes, then slot_usage, then bare slot references; later passes
//!    skip names an earlier pass claimed). Export attributes whose `slotId`
//!    names a shared slot or a `{slot}-{Class}` override bind to that slot.
//! 2. link parents and children by name, demoting classes whose parent is
//!    unknown or would close a cycle
//! 3. walk root-down computing `node_path`, children sorted by name
//!
//! Inherited slots are not copied into subclasses; [`ClassCollection::collect_all_slots`]
//! folds them in on demand with child definitions shadowing ancestors.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

use super::{sorted_names, Collection, SlotCollection, VariableCollection};
use crate::class_slot::ClassSlot;
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::dto::{AttributeDto, ClassDto};
use crate::entity::ClassEntity;

/// One row of the flattened class tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub name: String,
    pub depth: usize,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
}

/// Single-inheritance class hierarchy
#[derive(Debug, Clone, Default)]
pub struct ClassCollection {
    classes: IndexMap<String, ClassEntity>,
    /// Root classes, alphabetical
    roots: Vec<String>,
}

impl ClassCollection {
    pub fn from_dtos(
        dtos: &IndexMap<String, ClassDto>,
        slots: &SlotCollection,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        // Pass 1: entities + own slots, parents deferred
        let mut classes: IndexMap<String, ClassEntity> = dtos
            .iter()
            .map(|(name, dto)| {
                let entity = ClassEntity {
                    name: name.clone(),
                    description: dto.description.clone(),
                    parent_id: dto.parent.clone(),
                    parent: None,
                    children: Vec::new(),
                    node_path: String::new(),
                    is_abstract: dto.is_abstract,
                    class_slots: build_class_slots(name, dto, slots, diagnostics),
                    variables: Vec::new(),
                };
                (name.clone(), entity)
            })
            .collect();

        // Pass 2: parent/children links
        let names: Vec<String> = classes.keys().cloned().collect();
        for name in &names {
            let Some(parent_id) = classes.get(name).and_then(|c| c.parent_id.clone()) else {
                continue;
            };

            if !classes.contains_key(&parent_id) {
                diagnostics.record(
                    DiagnosticCode::UnknownParentClass,
                    name.as_str(),
                    format!("parent class '{}' not found; treating as root", parent_id),
                );
                continue;
            }

            if closes_cycle(&classes, name, &parent_id) {
                diagnostics.record(
                    DiagnosticCode::InheritanceCycle,
                    name.as_str(),
                    format!("parent class '{}' would create an inheritance cycle; treating as root", parent_id),
                );
                continue;
            }

            if let Some(class) = classes.get_mut(name) {
                class.parent = Some(parent_id.clone());
            }
            if let Some(parent) = classes.get_mut(&parent_id) {
                parent.children.push(name.clone());
            }
        }

        let mut roots: Vec<String> = classes
            .values()
            .filter(|c| c.is_root())
            .map(|c| c.name.clone())
            .collect();
        roots.sort();
        for class in classes.values_mut() {
            class.children.sort();
        }

        // Pass 3: node paths, root-down
        let mut stack: Vec<(String, Option<String>)> =
            roots.iter().rev().map(|r| (r.clone(), None)).collect();
        while let Some((name, parent_path)) = stack.pop() {
            let Some(class) = classes.get_mut(&name) else {
                continue;
            };
            let path = match parent_path {
                Some(p) => format!("{}.{}", p, name),
                None => name.clone(),
            };
            for slot in &mut class.class_slots {
                slot.slot_path = path.clone();
            }
            for child in class.children.iter().rev() {
                stack.push((child.clone(), Some(path.clone())));
            }
            class.node_path = path;
        }

        tracing::debug!(count = classes.len(), roots = roots.len(), "built class tree");
        Self { classes, roots }
    }

    /// Attach variable labels to their classes.
    ///
    /// Consumes the collection and returns the linked one, so a class
    /// collection is never observed half-wired.
    pub fn link_variables(mut self, variables: &VariableCollection) -> Self {
        for class in self.classes.values_mut() {
            class.variables = variables
                .variables_for(&class.name)
                .iter()
                .map(|v| v.name.clone())
                .collect();
        }
        self
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Classes in export order
    pub fn iter(&self) -> impl Iterator<Item = &ClassEntity> {
        self.classes.values()
    }

    pub fn parent_of(&self, name: &str) -> Option<&ClassEntity> {
        let parent = self.classes.get(name)?.parent.as_deref()?;
        self.classes.get(parent)
    }

    /// Ancestors, nearest first
    pub fn ancestors(&self, name: &str) -> Vec<&ClassEntity> {
        let mut result = Vec::new();
        let mut current = self.parent_of(name);
        while let Some(class) = current {
            result.push(class);
            current = self.parent_of(&class.name);
        }
        result
    }

    /// Every slot usable on a class: its own, then each ancestor's names not
    /// already present. A child definition replaces the ancestor's wholesale.
    pub fn collect_all_slots(&self, name: &str) -> IndexMap<String, ClassSlot> {
        let mut result = IndexMap::new();
        let Some(class) = self.classes.get(name) else {
            return result;
        };

        for owner in std::iter::once(class).chain(self.ancestors(name)) {
            for slot in &owner.class_slots {
                if !result.contains_key(&slot.name) {
                    result.insert(slot.name.clone(), slot.clone());
                }
            }
        }
        result
    }

    /// Ancestor that defines `slot_name` for this class, `None` when the
    /// class defines it itself (or nobody does)
    pub fn inherited_from(&self, class_name: &str, slot_name: &str) -> Option<String> {
        let slots = self.collect_all_slots(class_name);
        let defining = slots.get(slot_name)?.defining_class();
        if defining == class_name {
            None
        } else {
            Some(defining.to_string())
        }
    }

    /// Depth-first tree, children alphabetical
    pub fn flatten(&self) -> Vec<TreeEntry> {
        let mut result = Vec::with_capacity(self.classes.len());
        let mut stack: Vec<(&str, usize)> = self.roots.iter().rev().map(|r| (r.as_str(), 0)).collect();
        while let Some((name, depth)) = stack.pop() {
            let Some(class) = self.classes.get(name) else {
                continue;
            };
            result.push(TreeEntry {
                name: class.name.clone(),
                depth,
                is_abstract: class.is_abstract,
            });
            for child in class.children.iter().rev() {
                stack.push((child.as_str(), depth + 1));
            }
        }
        result
    }
}

impl Collection for ClassCollection {
    type Item = ClassEntity;

    fn get(&self, name: &str) -> Option<&ClassEntity> {
        self.classes.get(name)
    }

    fn len(&self) -> usize {
        self.classes.len()
    }

    fn names(&self) -> Vec<&str> {
        sorted_names(self.classes.keys())
    }
}

/// Would linking `name -> parent_id` make `name` its own ancestor?
fn closes_cycle(classes: &IndexMap<String, ClassEntity>, name: &str, parent_id: &str) -> bool {
    let mut current = Some(parent_id);
    let mut seen = HashSet::new();
    while let Some(ancestor) = current {
        if ancestor == name || !seen.insert(ancestor) {
            return true;
        }
        current = classes.get(ancestor).and_then(|c| c.parent.as_deref());
    }
    false
}

fn build_class_slots(
    class_name: &str,
    dto: &ClassDto,
    slots: &SlotCollection,
    diagnostics: &mut Diagnostics,
) -> Vec<ClassSlot> {
    let mut result = Vec::new();
    let mut claimed: HashSet<&str> = HashSet::new();

    for (attr_name, attr) in &dto.attributes {
        if claimed.contains(attr_name.as_str()) {
            continue;
        }
        if let Some(slot) = attribute_slot(class_name, attr_name, attr, slots, diagnostics) {
            claimed.insert(attr_name.as_str());
            result.push(slot);
        }
    }

    for (slot_name, usage) in &dto.slot_usage {
        if claimed.contains(slot_name.as_str()) {
            continue;
        }
        let Some(base) = slots.shared(slot_name) else {
            diagnostics.record(
                DiagnosticCode::UnknownSlotReference,
                class_name,
                format!("slot_usage references unknown slot '{}'", slot_name),
            );
            continue;
        };
        claimed.insert(slot_name.as_str());
        result.push(ClassSlot::from_slot_usage(slot_name, base, usage));
    }

    for slot_name in &dto.slots {
        if claimed.contains(slot_name.as_str()) {
            continue;
        }
        let Some(base) = slots.shared(slot_name) else {
            diagnostics.record(
                DiagnosticCode::UnknownSlotReference,
                class_name,
                format!("slots list references unknown slot '{}'", slot_name),
            );
            continue;
        };
        claimed.insert(slot_name.as_str());
        result.push(ClassSlot::from_reference(slot_name, base));
    }

    result
}

/// Materialize one export attribute, or `None` when an ancestor owns it.
///
/// A `slotId` of `{attr}-{Class}` names this class's override instance and
/// binds to the slot it overrides. Any other `slotId` naming a shared slot
/// binds as a reference. Attributes without a resolvable `slotId` stay inline.
fn attribute_slot(
    class_name: &str,
    attr_name: &str,
    attr: &AttributeDto,
    slots: &SlotCollection,
    diagnostics: &mut Diagnostics,
) -> Option<ClassSlot> {
    let own_instance = format!("{}-{}", attr_name, class_name);
    let inherited = attr.inherited_from.as_deref().is_some_and(|owner| owner != class_name);

    match attr.slot_id.as_deref() {
        Some(id) if id == own_instance => {
            let base = slots.override_base(id).or_else(|| slots.shared(attr_name));
            match base {
                Some(base) => Some(ClassSlot::from_bound_attribute(attr_name, base, attr, true)),
                None => {
                    diagnostics.record(
                        DiagnosticCode::UnknownSlotReference,
                        class_name,
                        format!("override '{}' has no base slot; keeping '{}' inline", id, attr_name),
                    );
                    Some(ClassSlot::from_attribute(attr_name, attr))
                }
            }
        }
        // Merged in from an ancestor by the export; the tree walk supplies it
        _ if inherited => None,
        Some(id) => Some(match slots.shared(id) {
            Some(base) => ClassSlot::from_bound_attribute(attr_name, base, attr, false),
            None => ClassSlot::from_attribute(attr_name, attr),
        }),
        None => Some(ClassSlot::from_attribute(attr_name, attr)),
    }
}
