//! Character density filtering.
//!
//! Selects paragraphs where a character's people-mentions per sentence clear a
//! threshold. Paragraphs without sentences are skipped, never divided by.

use crate::config::{validate_threshold, Comparison, FilterConfig};
use crate::corpus::document::{Document, Paragraph};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityFilter {
    threshold: f64,
    comparison: Comparison,
}

impl DensityFilter {
    pub fn new(threshold: f64, comparison: Comparison) -> Result<Self> {
        validate_threshold(threshold)?;
        Ok(Self {
            threshold,
            comparison,
        })
    }

    pub fn from_config(config: &FilterConfig) -> Result<Self> {
        Self::new(config.threshold, config.comparison)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn accepts<S: AsRef<str>>(&self, paragraph: &Paragraph, aliases: &[S]) -> bool {
        paragraph
            .mention_density(aliases)
            .is_some_and(|density| self.comparison.passes(density, self.threshold))
    }

    /// Matching paragraphs in document order, documents in the order given.
    pub fn select<'a, S: AsRef<str>>(
        &self,
        documents: impl IntoIterator<Item = &'a Document>,
        aliases: &[S],
    ) -> Vec<&'a Paragraph> {
        documents
            .into_iter()
            .flat_map(|doc| doc.paragraphs().iter())
            .filter(|p| self.accepts(p, aliases))
            .collect()
    }
}
