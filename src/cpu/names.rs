use super::FeatureCategory;
use crate::schema::{FeatureTableSchema, FeatureWord};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Maps the mask of a single feature bit to its canonical (upper-case) name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NameTable {
    names: BTreeMap<u64, String>,
}

impl NameTable {
    /// Returns the name table of a category, built once from the embedded feature table.
    pub fn for_category(category: FeatureCategory) -> &'static NameTable {
        static TABLES: OnceLock<[NameTable; 3]> = OnceLock::new();
        let tables = TABLES.get_or_init(|| {
            let schema = FeatureTableSchema::schema();
            FeatureCategory::ALL
                .map(|category| NameTable::from_words(schema.categories.get(category)))
        });
        &tables[category.index()]
    }

    pub(crate) fn from_words(words: &[FeatureWord]) -> Self {
        let names = words
            .iter()
            .flat_map(|word| {
                word.bits
                    .iter()
                    .map(move |bits| (word.mask_of(bits.bit), bits.name.clone()))
            })
            .collect();
        Self { names }
    }

    pub fn get(&self, mask: u64) -> Option<&str> {
        self.names.get(&mask).map(String::as_str)
    }

    /// Iterates over all named masks in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> + '_ {
        self.names.iter().map(|(mask, name)| (*mask, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
