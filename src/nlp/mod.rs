//! Linguistic analysis capability.
//!
//! Provides the [`LanguageAnalyzer`] trait (sentence counting, named entities,
//! noun chunks, ranked verbs) and a built-in rule-based English implementation.
//! The analyzer is created once via [`create_analyzer`] and shared by reference
//! with every component that annotates text.

pub mod heuristic;

use anyhow::Result;
use std::sync::Arc;

use crate::config::AnnotationConfig;

/// Entity categories reported by an analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    Date,
    Time,
    Event,
    Person,
    Loc,
    Gpe,
    Facility,
    Org,
    Norp,
    WorkOfArt,
    Product,
}

impl EntityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Event => "EVENT",
            Self::Person => "PERSON",
            Self::Loc => "LOC",
            Self::Gpe => "GPE",
            Self::Facility => "FACILITY",
            Self::Org => "ORG",
            Self::Norp => "NORP",
            Self::WorkOfArt => "WORK_OF_ART",
            Self::Product => "PRODUCT",
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DATE" => Ok(Self::Date),
            "TIME" => Ok(Self::Time),
            "EVENT" => Ok(Self::Event),
            "PERSON" => Ok(Self::Person),
            "LOC" => Ok(Self::Loc),
            "GPE" => Ok(Self::Gpe),
            "FACILITY" | "FAC" => Ok(Self::Facility),
            "ORG" => Ok(Self::Org),
            "NORP" => Ok(Self::Norp),
            "WORK_OF_ART" => Ok(Self::WorkOfArt),
            "PRODUCT" => Ok(Self::Product),
            _ => Err(format!("unknown entity label: {s}")),
        }
    }
}

/// A named-entity span.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    /// The token immediately before the span, if any.
    pub preceding: Option<String>,
}

impl EntitySpan {
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
            preceding: None,
        }
    }

    pub fn preceded_by(mut self, token: impl Into<String>) -> Self {
        self.preceding = Some(token.into());
        self
    }
}

/// A main-clause verb with its salience rank. Higher ranks are more salient.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedVerb {
    pub lemma: String,
    pub rank: f64,
}

/// Everything an analyzer reports about one piece of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextAnalysis {
    pub sentence_count: usize,
    pub entities: Vec<EntitySpan>,
    /// Noun chunks, excluding single-token pronoun chunks.
    pub noun_chunks: Vec<String>,
    pub verbs: Vec<RankedVerb>,
}

/// Trait for linguistic analysis of paragraph text.
///
/// Methods are synchronous and may block; callers in async contexts should use
/// `tokio::task::spawn_blocking`.
pub trait LanguageAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<TextAnalysis>;

    /// Short identifier used in logs.
    fn name(&self) -> &str {
        "analyzer"
    }
}

/// Create the analyzer used for a corpus pass.
///
/// Only the built-in `"heuristic"` analyzer ships with the crate; other
/// engines plug in by implementing [`LanguageAnalyzer`].
pub fn create_analyzer(config: &AnnotationConfig) -> Result<Arc<dyn LanguageAnalyzer>> {
    match config.analyzer.as_str() {
        "heuristic" => {
            let analyzer = heuristic::HeuristicAnalyzer::new();
            tracing::info!(analyzer = analyzer.name(), "language analyzer ready");
            Ok(Arc::new(analyzer))
        }
        other => anyhow::bail!("unknown analyzer: {other}. Supported: heuristic"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_round_trips_through_str() {
        for label in [
            EntityLabel::Date,
            EntityLabel::Person,
            EntityLabel::Gpe,
            EntityLabel::WorkOfArt,
        ] {
            assert_eq!(label.as_str().parse::<EntityLabel>().unwrap(), label);
        }
        assert!("VERB".parse::<EntityLabel>().is_err());
    }

    #[test]
    fn unknown_analyzer_is_an_error() {
        let mut config = AnnotationConfig::default();
        assert!(create_analyzer(&config).is_ok());
        config.analyzer = "spacy".into();
        assert!(create_analyzer(&config).is_err());
    }
}
