use indexmap::IndexMap;

use super::{sorted_names, Collection};
use crate::dto::EnumDto;
use crate::entity::{EnumEntity, PermissibleValue};

/// Flat list of enums
#[derive(Debug, Clone, Default)]
pub struct EnumCollection {
    enums: IndexMap<String, EnumEntity>,
}

impl EnumCollection {
    pub fn from_dtos(dtos: &IndexMap<String, EnumDto>) -> Self {
        let enums = dtos
            .iter()
            .map(|(name, dto)| {
                let permissible_values = dto
                    .permissible_values
                    .iter()
                    .map(|(key, value)| PermissibleValue {
                        key: key.clone(),
                        description: value.as_ref().and_then(|v| v.description.clone()),
                    })
                    .collect();
                let entity = EnumEntity {
                    name: name.clone(),
                    description: dto.description.clone(),
                    permissible_values,
                };
                (name.clone(), entity)
            })
            .collect();

        tracing::debug!(count = dtos.len(), "built enum collection");
        Self { enums }
    }

    /// Enums in display order (alphabetical)
    pub fn iter_sorted(&self) -> impl Iterator<Item = &EnumEntity> {
        self.names().into_iter().filter_map(|n| self.enums.get(n))
    }
}

impl Collection for EnumCollection {
    type Item = EnumEntity;

    fn get(&self, name: &str) -> Option<&EnumEntity> {
        self.enums.get(name)
    }

    fn len(&self) -> usize {
        self.enums.len()
    }

    fn names(&self) -> Vec<&str> {
        sorted_names(self.enums.keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::PermissibleValueDto;

    #[test]
    fn test_permissible_values_keep_order() {
        let mut values = IndexMap::new();
        values.insert("Tissue".to_string(), None);
        values.insert(
            "Blood".to_string(),
            Some(PermissibleValueDto {
                description: Some("whole blood".to_string()),
                meaning: None,
            }),
        );
        let mut dtos = IndexMap::new();
        dtos.insert(
            "SpecimenTypeEnum".to_string(),
            EnumDto {
                permissible_values: values,
                ..Default::default()
            },
        );

        let enums = EnumCollection::from_dtos(&dtos);
        let e = enums.get("SpecimenTypeEnum").unwrap();
        assert_eq!(e.permissible_values[0].key, "Tissue");
        assert_eq!(e.permissible_values[1].description.as_deref(), Some("whole blood"));
        assert!(enums.get("Missing").is_none());
    }
}
