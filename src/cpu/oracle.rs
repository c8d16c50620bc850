use super::FeatureCategory;

/// Answers whether a feature bit is present and what it is called.
///
/// Masks are expected to have a single bit set; a mask with several bits reports
/// present if any of them is.
pub trait FeatureOracle {
    fn has_feature(&self, category: FeatureCategory, mask: u64) -> bool;

    /// Canonical name of a feature bit, `None` if the bit has no name.
    fn name_of(&self, category: FeatureCategory, mask: u64) -> Option<&str>;

    fn has_extended_feature(&self, mask: u64) -> bool {
        self.has_feature(FeatureCategory::Extended, mask)
    }

    fn has_extra_feature(&self, mask: u64) -> bool {
        self.has_feature(FeatureCategory::Extra, mask)
    }
}
