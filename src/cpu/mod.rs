mod category;
mod host;
mod names;
mod oracle;
mod report;

pub use category::FeatureCategory;
pub use host::HostFeatures;
pub use names::NameTable;
pub use oracle::FeatureOracle;
pub use report::{category_tokens, FeatureReporter};
