use super::{FeatureCategory, FeatureOracle};
use crate::error::FeatureError;
use itertools::Itertools;
use std::io::Write;

/// Lowercase names of the features of one category that the oracle reports present,
/// in ascending bit order.
///
/// A present bit without a name is skipped.
pub fn category_tokens<O: FeatureOracle + ?Sized>(
    oracle: &O,
    category: FeatureCategory,
) -> impl Iterator<Item = String> + '_ {
    (0..64u32)
        .map(|bit| (bit, 1u64 << bit))
        .filter(move |&(_, mask)| oracle.has_feature(category, mask))
        .filter_map(move |(bit, mask)| match oracle.name_of(category, mask) {
            Some(name) => Some(name.to_lowercase()),
            None => {
                tracing::debug!(%category, bit, "feature bit is present but has no name");
                None
            }
        })
}

/// Writes the names of all present features as a stream of space-terminated tokens.
pub struct FeatureReporter<'a, O: ?Sized> {
    oracle: &'a O,
    categories: Vec<FeatureCategory>,
    newline: bool,
}

impl<'a, O: FeatureOracle + ?Sized> FeatureReporter<'a, O> {
    /// Creates a reporter that covers every category.
    pub fn new(oracle: &'a O) -> Self {
        Self {
            oracle,
            categories: FeatureCategory::ALL.to_vec(),
            newline: false,
        }
    }

    /// Restricts the report to the given categories. They are still reported in the
    /// fixed category order, each at most once.
    pub fn with_categories(
        mut self,
        categories: impl IntoIterator<Item = FeatureCategory>,
    ) -> Self {
        self.categories = categories.into_iter().sorted().dedup().collect();
        self
    }

    /// Terminates the report with a single `\n` after the last token.
    pub fn with_newline(mut self, newline: bool) -> Self {
        self.newline = newline;
        self
    }

    pub fn categories(&self) -> &[FeatureCategory] {
        &self.categories
    }

    /// All tokens of the report, in output order.
    pub fn tokens(&self) -> impl Iterator<Item = String> + 'a {
        let oracle = self.oracle;
        self.categories
            .clone()
            .into_iter()
            .flat_map(move |category| category_tokens(oracle, category))
    }

    /// Writes every token followed by a single space. Nothing else is written unless
    /// a trailing newline was requested.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), FeatureError> {
        for token in self.tokens() {
            write!(out, "{token} ")?;
        }
        if self.newline {
            writeln!(out)?;
        }
        Ok(())
    }

    /// Returns the report as a string.
    pub fn render(&self) -> String {
        let mut report: String = self.tokens().map(|token| token + " ").collect();
        if self.newline {
            report.push('\n');
        }
        report
    }

    /// Writes and flushes the report. A reader that goes away before the report is
    /// complete is not an error.
    pub fn run_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), FeatureError> {
        let result = self
            .write_to(out)
            .and_then(|()| out.flush().map_err(FeatureError::from));
        match result {
            Err(err) if err.is_broken_pipe() => {
                tracing::debug!("output closed before the report was complete");
                Ok(())
            }
            result => result,
        }
    }

    /// Writes the report to standard output.
    pub fn run(&self) -> Result<(), FeatureError> {
        let stdout = std::io::stdout();
        self.run_to(&mut stdout.lock())
    }
}
