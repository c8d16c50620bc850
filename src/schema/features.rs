use crate::cpu::FeatureCategory;
use crate::error::FeatureError;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::OnceLock;

/// First leaf of the extended CPUID range.
pub const EXTENDED_LEAF_BASE: u32 = 0x8000_0000;

/// Describes where every named feature bit of every category lives.
#[derive(Debug, Deserialize)]
pub struct FeatureTableSchema {
    pub vendor: CpuIdProperty,
    pub highest_extension_support: CpuIdProperty,
    pub categories: CategoryWords,
}

impl FeatureTableSchema {
    pub fn schema() -> &'static FeatureTableSchema {
        static SCHEMA: OnceLock<FeatureTableSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            FeatureTableSchema::from_document(include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/json/cpu/features.json"
            )))
            .expect("Failed to load features.json")
        })
    }

    /// Parses and validates a feature table document.
    pub fn from_document(document: &str) -> Result<Self, FeatureError> {
        let schema: FeatureTableSchema = serde_json::from_str(document)?;
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<(), FeatureError> {
        for category in FeatureCategory::ALL {
            let mut seen = HashSet::new();
            for word in self.categories.get(category) {
                if word.offset != 0 && word.offset != 32 {
                    return Err(FeatureError::InvalidTable(format!(
                        "{category}: offset {} of '{}' must be 0 or 32",
                        word.offset, word.description
                    )));
                }
                for bits in &word.bits {
                    if bits.bit > 31 {
                        return Err(FeatureError::InvalidTable(format!(
                            "{category}: bit {} of '{}' does not fit in a register",
                            bits.bit, bits.name
                        )));
                    }
                    if !seen.insert(word.offset + bits.bit) {
                        return Err(FeatureError::InvalidTable(format!(
                            "{category}: bit {} is named more than once ('{}')",
                            word.offset + bits.bit,
                            bits.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CpuIdProperty {
    #[allow(dead_code)]
    pub description: String,
    pub input: CpuIdInput,
}

/// The register words that make up each category, in document order.
#[derive(Debug, Deserialize)]
pub struct CategoryWords {
    pub base: Vec<FeatureWord>,
    pub extended: Vec<FeatureWord>,
    pub extra: Vec<FeatureWord>,
}

impl CategoryWords {
    pub fn get(&self, category: FeatureCategory) -> &[FeatureWord] {
        match category {
            FeatureCategory::Base => &self.base,
            FeatureCategory::Extended => &self.extended,
            FeatureCategory::Extra => &self.extra,
        }
    }
}

/// One CPUID register whose bits are placed into a category mask starting at `offset`.
#[derive(Debug, Deserialize)]
pub struct FeatureWord {
    pub description: String,
    pub input: CpuIdInput,
    pub register: CpuRegister,
    pub offset: u8,
    pub bits: Vec<FeatureBitName>,
}

impl FeatureWord {
    /// True if the leaf of this word lies in the extended CPUID range.
    pub fn is_extended_leaf(&self) -> bool {
        self.input.eax >= EXTENDED_LEAF_BASE
    }

    /// The category mask of a single bit of this word.
    pub fn mask_of(&self, bit: u8) -> u64 {
        1u64 << (self.offset + bit)
    }
}

#[derive(Debug, Deserialize)]
pub struct FeatureBitName {
    pub name: String,
    pub bit: u8,
}

#[derive(Debug, Deserialize, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CpuRegister {
    Eax,
    Ebx,
    Ecx,
    Edx,
}

#[derive(Debug, Deserialize)]
pub struct CpuIdInput {
    pub eax: u32,
    pub ecx: u32,
}
