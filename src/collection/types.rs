use indexmap::IndexMap;

use super::{sorted_names, Collection};
use crate::dto::TypeDto;
use crate::entity::TypeEntity;

/// Flat list of schema types
#[derive(Debug, Clone, Default)]
pub struct TypeCollection {
    types: IndexMap<String, TypeEntity>,
}

impl TypeCollection {
    pub fn from_dtos(dtos: &IndexMap<String, TypeDto>) -> Self {
        let types = dtos
            .iter()
            .map(|(name, dto)| {
                let entity = TypeEntity {
                    name: name.clone(),
                    description: dto.description.clone(),
                    uri: dto.uri.clone(),
                    base: dto.base.clone(),
                };
                (name.clone(), entity)
            })
            .collect();
        Self { types }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeEntity> {
        self.types.values()
    }
}

impl Collection for TypeCollection {
    type Item = TypeEntity;

    fn get(&self, name: &str) -> Option<&TypeEntity> {
        self.types.get(name)
    }

    fn len(&self) -> usize {
        self.types.len()
    }

    fn names(&self) -> Vec<&str> {
        sorted_names(self.types.keys())
    }
}
