use thiserror::Error;

/// Errors produced while loading the feature tables or writing a report.
#[derive(Error, Debug)]
pub enum FeatureError {
    /// Writing the report to its destination failed.
    #[error("failed to write the feature report: {0}")]
    Io(#[from] std::io::Error),

    /// A feature category name could not be parsed.
    #[error("unknown feature category '{0}', expected one of: base, extended, extra")]
    UnknownCategory(String),

    /// The feature table document is not valid JSON for the expected schema.
    #[error("malformed feature table document: {0}")]
    Schema(#[from] serde_json::Error),

    /// The feature table document parsed but describes an impossible layout.
    #[error("invalid feature table: {0}")]
    InvalidTable(String),
}

impl FeatureError {
    /// True if writing failed because the reading end of the output was closed.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, FeatureError::Io(err) if err.kind() == std::io::ErrorKind::BrokenPipe)
    }
}
