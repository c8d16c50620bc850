use crate::error::FeatureError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One of the three independent groups of feature flags. Each category has its own
/// 64-bit mask space and its own name table; bit numbers are not shared between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureCategory {
    Base,
    Extended,
    Extra,
}

impl FeatureCategory {
    /// All categories in the order they are reported.
    pub const ALL: [FeatureCategory; 3] = [
        FeatureCategory::Base,
        FeatureCategory::Extended,
        FeatureCategory::Extra,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FeatureCategory::Base => "base",
            FeatureCategory::Extended => "extended",
            FeatureCategory::Extra => "extra",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl Display for FeatureCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureCategory {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureCategory::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FeatureError::UnknownCategory(s.to_string()))
    }
}
