#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use pensieve::config::PensieveConfig;
use pensieve::corpus::{Annotator, Corpus, Document, DocumentSettings};
use pensieve::nlp::{EntityLabel, EntitySpan, LanguageAnalyzer, RankedVerb, TextAnalysis};

/// Deterministic analyzer driven by word lists.
///
/// - a token in `people` is a PERSON span (a trailing `'s` is kept in the span)
/// - a token in `places`, or any token written `@Name`, is a GPE span
/// - a token in `verbs` is a verb ranked by earliness
/// - sentences are counted by `.`, `!` and `?`
/// - text containing `fail_on` is rejected
#[derive(Default)]
pub struct MockAnalyzer {
    pub people: Vec<&'static str>,
    pub places: Vec<&'static str>,
    pub verbs: Vec<&'static str>,
    pub fail_on: Option<&'static str>,
}

impl MockAnalyzer {
    pub fn with_people(people: &[&'static str]) -> Self {
        Self {
            people: people.to_vec(),
            ..Self::default()
        }
    }
}

impl LanguageAnalyzer for MockAnalyzer {
    fn analyze(&self, text: &str) -> anyhow::Result<TextAnalysis> {
        if let Some(marker) = self.fail_on {
            anyhow::ensure!(!text.contains(marker), "scripted failure");
        }

        let mut analysis = TextAnalysis {
            sentence_count: text.chars().filter(|c| matches!(c, '.' | '!' | '?')).count(),
            ..TextAnalysis::default()
        };

        let tokens: Vec<&str> = text
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '@' && c != '\''))
            .filter(|t| !t.is_empty())
            .collect();

        for (pos, token) in tokens.iter().enumerate() {
            let base = token.strip_suffix("'s").unwrap_or(token);
            if let Some(place) = token.strip_prefix('@') {
                analysis.entities.push(EntitySpan::new(place, EntityLabel::Gpe));
            } else if self.people.iter().any(|p| *p == base) {
                let span = EntitySpan::new(*token, EntityLabel::Person);
                analysis.entities.push(match pos.checked_sub(1) {
                    Some(prev) => span.preceded_by(tokens[prev]),
                    None => span,
                });
            } else if self.places.iter().any(|p| p == token) {
                analysis.entities.push(EntitySpan::new(*token, EntityLabel::Gpe));
            } else if self.verbs.iter().any(|v| v == token) {
                analysis.verbs.push(RankedVerb {
                    lemma: token.to_string(),
                    rank: 1.0 / (pos as f64 + 1.0),
                });
            }
        }
        Ok(analysis)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

pub fn annotator(analyzer: MockAnalyzer) -> Arc<Annotator> {
    Arc::new(Annotator::new(Arc::new(analyzer), 5))
}

/// A document built from in-memory text.
pub fn document(id: u32, text: &str, analyzer: MockAnalyzer, min_tokens: usize) -> Document {
    let settings = DocumentSettings {
        min_tokens,
        ..DocumentSettings::default()
    };
    Document::from_text(id, format!("book{id}.txt"), text, annotator(analyzer), settings)
}

/// Write `files` into `dir` as a corpus directory.
pub fn write_corpus(dir: &Path, files: &[(&str, &str)]) {
    for (name, text) in files {
        std::fs::write(dir.join(name), text).unwrap();
    }
}

/// Open a corpus directory with the mock analyzer and the given segmentation threshold.
pub fn open_corpus(dir: &Path, analyzer: MockAnalyzer, min_tokens: usize) -> Corpus {
    let mut config = PensieveConfig::default();
    config.segmenter.min_tokens = min_tokens;
    Corpus::open(dir, Arc::new(analyzer), &config).unwrap()
}

/// Path of the bundled sample corpus.
pub fn test_data_dir() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("test_data")
}
