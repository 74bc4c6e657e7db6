//! Entity Collections
//!
//! One container per entity kind, each built from its raw DTO map:
//! - [`ClassCollection`]: single-inheritance tree with resolved slots
//! - [`EnumCollection`], [`SlotCollection`], [`TypeCollection`]: flat
//! - [`VariableCollection`]: grouped by the class each variable maps to
//!
//! Construction order matters: enums, slots and types have no dependencies,
//! classes need slots, variables need classes.

pub mod classes;
pub mod enums;
pub mod slots;
pub mod types;
pub mod variables;

pub use classes::{ClassCollection, TreeEntry};
pub use enums::EnumCollection;
pub use slots::SlotCollection;
pub use types::TypeCollection;
pub use variables::VariableCollection;

/// Lookup-by-name shared by every collection
pub trait Collection {
    type Item;

    fn get(&self, name: &str) -> Option<&Self::Item>;

    fn len(&self) -> usize;

    /// All names, alphabetical
    fn names(&self) -> Vec<&str>;

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn sorted_names<'a>(names: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut names: Vec<&str> = names.map(|n| n.as_str()).collect();
    names.sort_unstable();
    names
}
