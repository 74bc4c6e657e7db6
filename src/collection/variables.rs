use indexmap::IndexMap;
use std::collections::HashMap;

use super::{Collection, ClassCollection};
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::dto::VariableDto;
use crate::entity::VariableEntity;

/// Variables grouped under the class they map to
#[derive(Debug, Clone, Default)]
pub struct VariableCollection {
    /// class name -> variables, classes alphabetical, sheet order within
    groups: IndexMap<String, Vec<VariableEntity>>,
    /// label -> (class name, position in group)
    index: HashMap<String, (String, usize)>,
}

impl VariableCollection {
    pub fn from_dtos(
        dtos: &[VariableDto],
        classes: &ClassCollection,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut groups: IndexMap<String, Vec<VariableEntity>> = IndexMap::new();
        let mut seen: HashMap<&str, &str> = HashMap::new();

        for dto in dtos {
            let label = dto.label.trim();
            if label.is_empty() {
                tracing::debug!(class = %dto.class_id, "skipping variable row without a label");
                continue;
            }

            if !classes.contains(&dto.class_id) {
                diagnostics.record(
                    DiagnosticCode::UnknownVariableClass,
                    label,
                    format!("maps to unknown class '{}'", dto.class_id),
                );
                continue;
            }

            if let Some(first) = seen.get(label) {
                diagnostics.record(
                    DiagnosticCode::DuplicateVariable,
                    label,
                    format!("label already used by a variable of '{}'", first),
                );
                continue;
            }
            seen.insert(label, dto.class_id.as_str());

            groups.entry(dto.class_id.clone()).or_default().push(VariableEntity {
                name: label.to_string(),
                class_id: dto.class_id.clone(),
                data_type: dto.data_type.clone(),
                ucum_unit: dto.ucum_unit.clone(),
                curie: dto.curie.clone(),
                description: dto.description.clone(),
            });
        }

        groups.sort_keys();

        let mut index = HashMap::new();
        for (class, vars) in &groups {
            for (i, var) in vars.iter().enumerate() {
                index.insert(var.name.clone(), (class.clone(), i));
            }
        }

        tracing::debug!(count = index.len(), classes = groups.len(), "built variable collection");
        Self { groups, index }
    }

    /// Variables mapped to one class
    pub fn variables_for(&self, class_name: &str) -> &[VariableEntity] {
        self.groups.get(class_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Groups in display order
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[VariableEntity])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableEntity> {
        self.groups.values().flatten()
    }
}

impl Collection for VariableCollection {
    type Item = VariableEntity;

    fn get(&self, name: &str) -> Option<&VariableEntity> {
        let (class, i) = self.index.get(name)?;
        self.groups.get(class)?.get(*i)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.index.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
