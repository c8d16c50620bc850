use super::{FeatureCategory, FeatureOracle, NameTable};
use crate::cpuid::{CpuIdProvider, MachineCpuIdProvider};
use crate::schema::{FeatureTableSchema, FeatureWord};
use std::sync::OnceLock;

/// Snapshot of the feature flags of the host CPU.
#[derive(Debug)]
pub struct HostFeatures {
    /// The vendor name of the CPU
    vendor: String,

    /// Detected feature masks, indexed by category.
    masks: [u64; 3],
}

impl HostFeatures {
    pub(crate) fn detect<P: CpuIdProvider>(provider: &P) -> Self {
        let schema = FeatureTableSchema::schema();

        // Read the vendor information
        let registers = provider.cpuid(schema.vendor.input.eax, schema.vendor.input.ecx);
        let highest_basic_support = registers.eax;
        let vendor_bytes: Vec<u8> = [registers.ebx, registers.edx, registers.ecx]
            .iter()
            .flat_map(|register| register.to_le_bytes())
            .collect();
        let vendor = String::from_utf8_lossy(&vendor_bytes)
            .trim_end_matches('\0')
            .to_string();

        // Read the highest_extension_support
        let registers = provider.cpuid(
            schema.highest_extension_support.input.eax,
            schema.highest_extension_support.input.ecx,
        );
        let highest_extension_support = registers.eax;

        let is_supported = |word: &FeatureWord| {
            if word.is_extended_leaf() {
                word.input.eax <= highest_extension_support
            } else {
                word.input.eax <= highest_basic_support
            }
        };

        // Read feature flags
        let masks = FeatureCategory::ALL.map(|category| {
            schema
                .categories
                .get(category)
                .iter()
                .filter(|&word| is_supported(word))
                .fold(0u64, |mask, word| {
                    let registers = provider.cpuid(word.input.eax, word.input.ecx);
                    mask | (u64::from(registers.get(word.register)) << word.offset)
                })
        });

        tracing::debug!(
            vendor = %vendor,
            highest_basic_support,
            highest_extension_support,
            base = masks[0],
            extended = masks[1],
            extra = masks[2],
            "detected host cpu features"
        );

        Self { vendor, masks }
    }

    /// Returns the feature flags of the host CPU, detected on first use.
    pub fn host() -> &'static Self {
        static HOST: OnceLock<HostFeatures> = OnceLock::new();
        HOST.get_or_init(|| HostFeatures::detect(&MachineCpuIdProvider::default()))
    }

    /// The vendor identification string, e.g. `GenuineIntel`.
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// The raw feature mask of a category.
    pub fn mask(&self, category: FeatureCategory) -> u64 {
        self.masks[category.index()]
    }
}

impl FeatureOracle for HostFeatures {
    fn has_feature(&self, category: FeatureCategory, mask: u64) -> bool {
        self.mask(category) & mask != 0
    }

    fn name_of(&self, category: FeatureCategory, mask: u64) -> Option<&str> {
        NameTable::for_category(category).get(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpuid::{CpuIdRegisters, FakeCpuIdProvider};

    fn vendor_leaf(highest_basic_support: u32, vendor: &[u8; 12]) -> CpuIdRegisters {
        let word = |range: std::ops::Range<usize>| {
            u32::from_le_bytes(vendor[range].try_into().unwrap())
        };
        CpuIdRegisters {
            eax: highest_basic_support,
            ebx: word(0..4),
            edx: word(4..8),
            ecx: word(8..12),
        }
    }

    fn eax(value: u32) -> CpuIdRegisters {
        CpuIdRegisters {
            eax: value,
            ..Default::default()
        }
    }

    fn provider(highest_basic_support: u32, highest_extension_support: u32) -> FakeCpuIdProvider {
        FakeCpuIdProvider::default()
            .with_leaf(0, 0, vendor_leaf(highest_basic_support, b"GenuineIntel"))
            .with_leaf(0x8000_0000, 0, eax(highest_extension_support))
            .with_leaf(
                1,
                0,
                CpuIdRegisters {
                    edx: 1 | 1 << 23,
                    ecx: 1 << 19,
                    ..Default::default()
                },
            )
            .with_leaf(
                7,
                0,
                CpuIdRegisters {
                    ebx: 1 << 5,
                    ecx: 1 << 1,
                    ..Default::default()
                },
            )
            .with_leaf(
                0x8000_0001,
                0,
                CpuIdRegisters {
                    edx: 1 << 11,
                    ecx: 1,
                    ..Default::default()
                },
            )
    }

    #[test]
    fn detect_all_leaves() {
        let host = HostFeatures::detect(&provider(7, 0x8000_0001));
        assert_eq!(host.vendor(), "GenuineIntel");
        assert_eq!(host.mask(FeatureCategory::Base), 1 | 1 << 23 | 1u64 << (32 + 19));
        assert_eq!(host.mask(FeatureCategory::Extended), 1 << 11 | 1u64 << (32 + 5));
        assert_eq!(host.mask(FeatureCategory::Extra), 1 | 1u64 << (32 + 1));

        assert!(host.has_feature(FeatureCategory::Base, 1 << 23));
        assert!(!host.has_feature(FeatureCategory::Base, 1 << 24));
        assert!(host.has_extended_feature(1 << 11));
        assert!(host.has_extra_feature(1));
        assert_eq!(host.name_of(FeatureCategory::Extended, 1 << 11), Some("SYSCALL"));
    }

    #[test]
    fn unsupported_basic_leaves_are_skipped() {
        let host = HostFeatures::detect(&provider(1, 0x8000_0001));
        assert_eq!(host.mask(FeatureCategory::Extended), 1 << 11);
        assert_eq!(host.mask(FeatureCategory::Extra), 1);
    }

    #[test]
    fn unsupported_extended_leaves_are_skipped() {
        let host = HostFeatures::detect(&provider(7, 0x8000_0000));
        assert_eq!(host.mask(FeatureCategory::Base), 1 | 1 << 23 | 1u64 << (32 + 19));
        assert_eq!(host.mask(FeatureCategory::Extended), 1u64 << (32 + 5));
        assert_eq!(host.mask(FeatureCategory::Extra), 1u64 << (32 + 1));
    }

    #[test]
    fn no_cpuid_means_no_features() {
        let host = HostFeatures::detect(&FakeCpuIdProvider::default());
        assert_eq!(host.vendor(), "");
        for category in FeatureCategory::ALL {
            assert_eq!(host.mask(category), 0);
        }
    }

    #[test]
    fn check_host() {
        let host = HostFeatures::host();
        eprintln!("{:#?}", host);
        assert!(std::ptr::eq(host, HostFeatures::host()));
    }
}
