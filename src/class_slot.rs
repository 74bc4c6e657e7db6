//! Class Slots
//!
//! A [`ClassSlot`] is one slot as seen by one class: a shared (or synthetic)
//! [`SlotEntity`] underneath, plus whatever the class overrides on top.
//!
//! Effective values resolve as `override ?? base ?? default`, where the
//! defaults are `"string"` for range and `false` for the flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::dto::{AttributeDto, SlotUsageDto};
use crate::entity::SlotEntity;

/// Range used when neither the override nor the base slot declares one
pub const DEFAULT_RANGE: &str = "string";

/// How a slot reached a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotSource {
    /// Declared inline on the class
    Attribute,
    /// Shared slot with class-specific overrides
    SlotUsage,
    /// Bare reference to a shared slot
    SlotReference,
}

impl SlotSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attribute => "attribute",
            Self::SlotUsage => "slot_usage",
            Self::SlotReference => "slot_reference",
        }
    }
}

impl fmt::Display for SlotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-class view of a slot definition
#[derive(Debug, Clone, Serialize)]
pub struct ClassSlot {
    /// Attribute name in the owning class
    pub name: String,
    /// Definition this view layers on
    pub base_slot: Arc<SlotEntity>,
    pub source: SlotSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multivalued: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// nodePath of the class that defines this slot
    pub slot_path: String,
}

impl ClassSlot {
    /// Inline attribute: the attribute itself becomes a synthetic base slot
    pub fn from_attribute(name: &str, attr: &AttributeDto) -> Self {
        let base = SlotEntity {
            name: name.to_string(),
            description: attr.description.clone(),
            range: attr.range.clone(),
            slot_uri: None,
            identifier: None,
            required: attr.required,
            multivalued: attr.multivalued,
            synthetic: true,
        };
        Self::bare(name, Arc::new(base), SlotSource::Attribute)
    }

    /// Shared slot with `slot_usage` overrides
    pub fn from_slot_usage(name: &str, base_slot: Arc<SlotEntity>, usage: &SlotUsageDto) -> Self {
        Self {
            range: usage.range.clone(),
            required: usage.required,
            multivalued: usage.multivalued,
            description: usage.description.clone(),
            ..Self::bare(name, base_slot, SlotSource::SlotUsage)
        }
    }

    /// Export attribute bound to a shared slot through its `slotId`.
    ///
    /// Only fields that differ from the base become overrides; an unchanged
    /// copy is a plain reference unless `class_override` marks it as the
    /// class's own `slot_usage` instance.
    pub fn from_bound_attribute(
        name: &str,
        base_slot: Arc<SlotEntity>,
        attr: &AttributeDto,
        class_override: bool,
    ) -> Self {
        let usage = SlotUsageDto {
            range: differs(&attr.range, &base_slot.range),
            description: differs(&attr.description, &base_slot.description),
            required: differs(&attr.required, &base_slot.required),
            multivalued: differs(&attr.multivalued, &base_slot.multivalued),
        };
        let unchanged = usage.range.is_none()
            && usage.description.is_none()
            && usage.required.is_none()
            && usage.multivalued.is_none();

        if unchanged && !class_override {
            Self::from_reference(name, base_slot)
        } else {
            Self::from_slot_usage(name, base_slot, &usage)
        }
    }

    /// Shared slot referenced without overrides
    pub fn from_reference(name: &str, base_slot: Arc<SlotEntity>) -> Self {
        Self::bare(name, base_slot, SlotSource::SlotReference)
    }

    fn bare(name: &str, base_slot: Arc<SlotEntity>, source: SlotSource) -> Self {
        Self {
            name: name.to_string(),
            base_slot,
            source,
            range: None,
            required: None,
            multivalued: None,
            description: None,
            slot_path: String::new(),
        }
    }

    pub fn effective_range(&self) -> &str {
        self.range
            .as_deref()
            .or(self.base_slot.range.as_deref())
            .unwrap_or(DEFAULT_RANGE)
    }

    pub fn effective_required(&self) -> bool {
        self.required.or(self.base_slot.required).unwrap_or(false)
    }

    pub fn effective_multivalued(&self) -> bool {
        self.multivalued.or(self.base_slot.multivalued).unwrap_or(false)
    }

    pub fn effective_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or(self.base_slot.description.as_deref())
    }

    /// Last component of `slot_path`: the class that defined this slot
    pub fn defining_class(&self) -> &str {
        self.slot_path.rsplit('.').next().unwrap_or(&self.slot_path)
    }

    /// Identifier of the slot definition behind this view.
    ///
    /// Shared slots use their own name; inline attributes have no shared
    /// node, so they are keyed by their defining class.
    pub fn defining_slot_id(&self) -> String {
        match self.source {
            SlotSource::Attribute => format!("{}.{}", self.defining_class(), self.name),
            SlotSource::SlotUsage | SlotSource::SlotReference => self.base_slot.name.clone(),
        }
    }

    /// Whether a shared slot node sits behind this view
    pub fn is_shared(&self) -> bool {
        !self.base_slot.synthetic
    }
}

fn differs<T: PartialEq + Clone>(value: &Option<T>, base: &Option<T>) -> Option<T> {
    value.as_ref().filter(|v| base.as_ref() != Some(*v)).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(name: &str, required: Option<bool>, range: Option<&str>) -> Arc<SlotEntity> {
        Arc::new(SlotEntity {
            name: name.to_string(),
            description: Some("shared description".to_string()),
            range: range.map(str::to_string),
            slot_uri: None,
            identifier: None,
            required,
            multivalued: None,
            synthetic: false,
        })
    }

    #[test]
    fn test_override_wins_over_base() {
        let usage = SlotUsageDto {
            required: Some(true),
            ..Default::default()
        };
        let slot = ClassSlot::from_slot_usage("age", shared("age", Some(false), Some("integer")), &usage);
        assert_eq!(slot.source, SlotSource::SlotUsage);
        assert!(slot.effective_required());
        assert_eq!(slot.effective_range(), "integer");
    }

    #[test]
    fn test_falls_back_to_base_then_default() {
        let slot = ClassSlot::from_reference("age", shared("age", Some(true), None));
        assert!(slot.effective_required());
        assert_eq!(slot.effective_range(), DEFAULT_RANGE);
        assert!(!slot.effective_multivalued());

        let unset = ClassSlot::from_reference("note", shared("note", None, None));
        assert!(!unset.effective_required());
    }

    #[test]
    fn test_description_override() {
        let usage = SlotUsageDto {
            description: Some("class specific".to_string()),
            ..Default::default()
        };
        let slot = ClassSlot::from_slot_usage("age", shared("age", None, None), &usage);
        assert_eq!(slot.effective_description(), Some("class specific"));

        let plain = ClassSlot::from_reference("age", shared("age", None, None));
        assert_eq!(plain.effective_description(), Some("shared description"));
    }

    #[test]
    fn test_attribute_is_synthetic() {
        let attr = AttributeDto {
            range: Some("SpecimenTypeEnum".to_string()),
            multivalued: Some(true),
            ..Default::default()
        };
        let mut slot = ClassSlot::from_attribute("specimenType", &attr);
        slot.slot_path = "Entity.Specimen".to_string();
        assert!(!slot.is_shared());
        assert_eq!(slot.effective_range(), "SpecimenTypeEnum");
        assert!(slot.effective_multivalued());
        assert_eq!(slot.defining_class(), "Specimen");
        assert_eq!(slot.defining_slot_id(), "Specimen.specimenType");
    }

    #[test]
    fn test_bound_attribute_keeps_only_differences() {
        let same = AttributeDto {
            range: Some("integer".to_string()),
            required: Some(false),
            slot_id: Some("age".to_string()),
            ..Default::default()
        };
        let slot = ClassSlot::from_bound_attribute("age", shared("age", Some(false), Some("integer")), &same, false);
        assert_eq!(slot.source, SlotSource::SlotReference);
        assert!(slot.is_shared());

        let changed = AttributeDto {
            required: Some(true),
            ..same.clone()
        };
        let slot = ClassSlot::from_bound_attribute("age", shared("age", Some(false), Some("integer")), &changed, false);
        assert_eq!(slot.source, SlotSource::SlotUsage);
        assert_eq!(slot.required, Some(true));
        assert_eq!(slot.range, None);
        assert!(slot.effective_required());

        let marked = ClassSlot::from_bound_attribute("age", shared("age", Some(false), Some("integer")), &same, true);
        assert_eq!(marked.source, SlotSource::SlotUsage);
        assert!(!marked.effective_required());
    }
}
