use indexmap::IndexMap;
use std::sync::Arc;

use super::{sorted_names, Collection};
use crate::dto::SlotDto;
use crate::entity::SlotEntity;

/// Flat registry of shared slot definitions
///
/// Entities are reference-counted so every [`crate::class_slot::ClassSlot`]
/// layering on a slot shares the same definition.
#[derive(Debug, Clone, Default)]
pub struct SlotCollection {
    slots: IndexMap<String, Arc<SlotEntity>>,
    /// Per-class override instance id (`{slot}-{Class}`) -> base slot name
    overrides: IndexMap<String, String>,
}

impl SlotCollection {
    pub fn from_dtos(dtos: &IndexMap<String, SlotDto>) -> Self {
        let mut slots = IndexMap::with_capacity(dtos.len());
        let mut overrides = IndexMap::new();

        for (name, dto) in dtos {
            // Per-class override instances surface as slot_usage ClassSlots
            if let Some(base) = &dto.overrides {
                tracing::debug!(slot = %name, overrides = %base, "recorded override instance");
                overrides.insert(name.clone(), base.clone());
                continue;
            }

            let entity = SlotEntity {
                name: name.clone(),
                description: dto.description.clone(),
                range: dto.range.clone(),
                slot_uri: dto.slot_uri.clone(),
                identifier: dto.identifier,
                required: dto.required,
                multivalued: dto.multivalued,
                synthetic: false,
            };
            slots.insert(name.clone(), Arc::new(entity));
        }

        tracing::debug!(count = slots.len(), overrides = overrides.len(), "built slot collection");
        Self { slots, overrides }
    }

    /// Shared handle for layering a [`crate::class_slot::ClassSlot`]
    pub fn shared(&self, name: &str) -> Option<Arc<SlotEntity>> {
        self.slots.get(name).cloned()
    }

    /// Base slot behind an override instance id
    pub fn override_base(&self, instance_id: &str) -> Option<Arc<SlotEntity>> {
        self.shared(self.overrides.get(instance_id)?)
    }

    pub fn is_override_instance(&self, id: &str) -> bool {
        self.overrides.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotEntity> {
        self.slots.values().map(|s| s.as_ref())
    }
}

impl Collection for SlotCollection {
    type Item = SlotEntity;

    fn get(&self, name: &str) -> Option<&SlotEntity> {
        self.slots.get(name).map(|s| s.as_ref())
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn names(&self) -> Vec<&str> {
        sorted_names(self.slots.keys())
    }
}
