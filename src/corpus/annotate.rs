//! Paragraph annotation: turn analyzer output into category counts.
//!
//! Classification order matters. People are resolved first (possessive `'s`
//! stripped, article-led names demoted to things), then places and things skip
//! anything already counted as a person in the same paragraph, then noun chunks
//! fill in things not claimed by an entity, and finally the top-ranked verbs
//! become activities.

use std::collections::HashSet;
use std::sync::Arc;

use crate::corpus::words::{Category, WordCategoryMap};
use crate::error::PensieveError;
use crate::nlp::{EntityLabel, LanguageAnalyzer, TextAnalysis};

const ARTICLES: &[&str] = &["the", "a", "an"];

/// Category counts and sentence statistics for one paragraph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    pub sentence_count: usize,
    pub words: WordCategoryMap,
    /// Activity lemmas in descending salience.
    pub ranked_activities: Vec<String>,
}

impl Annotation {
    pub fn is_empty(&self) -> bool {
        self.sentence_count == 0 && self.words.is_empty()
    }
}

/// Applies a shared [`LanguageAnalyzer`] to paragraph text.
pub struct Annotator {
    analyzer: Arc<dyn LanguageAnalyzer>,
    top_verbs: usize,
}

impl Annotator {
    pub fn new(analyzer: Arc<dyn LanguageAnalyzer>, top_verbs: usize) -> Self {
        Self {
            analyzer,
            top_verbs,
        }
    }

    /// Annotate a paragraph. Analyzer failures yield an empty annotation.
    pub fn annotate(&self, index: usize, text: &str) -> Annotation {
        match self.try_annotate(index, text) {
            Ok(annotation) => annotation,
            Err(e) => {
                tracing::warn!(paragraph = index, error = %e, "annotation failed, using empty word map");
                Annotation::default()
            }
        }
    }

    pub fn try_annotate(&self, index: usize, text: &str) -> Result<Annotation, PensieveError> {
        if text.trim().is_empty() {
            return Err(PensieveError::Annotation {
                paragraph: index,
                message: "empty paragraph".into(),
            });
        }
        let analysis = self
            .analyzer
            .analyze(text)
            .map_err(|e| PensieveError::Annotation {
                paragraph: index,
                message: e.to_string(),
            })?;
        Ok(classify(&analysis, self.top_verbs))
    }
}

/// Strip a trailing possessive marker from a name.
pub fn strip_possessive(name: &str) -> &str {
    name.strip_suffix("'s")
        .or_else(|| name.strip_suffix("\u{2019}s"))
        .unwrap_or(name)
        .trim()
}

fn preceded_by_article(preceding: Option<&str>) -> bool {
    preceding.is_some_and(|p| ARTICLES.contains(&p.to_lowercase().as_str()))
}

/// Build the paragraph's category map from raw analyzer output.
pub fn classify(analysis: &TextAnalysis, top_verbs: usize) -> Annotation {
    let mut words = WordCategoryMap::new();
    let mut demoted = Vec::new();

    for entity in &analysis.entities {
        if entity.label != EntityLabel::Person {
            continue;
        }
        let name = strip_possessive(&entity.text);
        if name.is_empty() {
            continue;
        }
        if preceded_by_article(entity.preceding.as_deref()) {
            demoted.push(name.to_string());
        } else {
            words.add(Category::People, name);
        }
    }

    for entity in &analysis.entities {
        let category = match entity.label {
            EntityLabel::Date | EntityLabel::Time | EntityLabel::Event => Category::Times,
            EntityLabel::Loc | EntityLabel::Gpe | EntityLabel::Facility => Category::Places,
            EntityLabel::Org | EntityLabel::Norp | EntityLabel::WorkOfArt | EntityLabel::Product => {
                Category::Things
            }
            EntityLabel::Person => continue,
        };
        let text = entity.text.trim();
        if text.is_empty() {
            continue;
        }
        if category != Category::Times && words.contains(Category::People, text) {
            continue;
        }
        words.add(category, text);
    }

    for name in demoted {
        if !words.contains(Category::People, &name) {
            words.add(Category::Things, name);
        }
    }

    let claimed: HashSet<&str> = analysis.entities.iter().map(|e| e.text.trim()).collect();
    for chunk in &analysis.noun_chunks {
        let chunk = chunk.trim();
        if chunk.is_empty() || claimed.contains(chunk) || words.contains(Category::People, chunk) {
            continue;
        }
        words.add(Category::Things, chunk);
    }

    let mut verbs: Vec<_> = analysis.verbs.iter().collect();
    verbs.sort_by(|a, b| b.rank.total_cmp(&a.rank));
    let mut ranked_activities: Vec<String> = Vec::new();
    for verb in verbs {
        if ranked_activities.len() >= top_verbs {
            break;
        }
        if verb.lemma.is_empty() || ranked_activities.contains(&verb.lemma) {
            continue;
        }
        words.add(Category::Activities, verb.lemma.clone());
        ranked_activities.push(verb.lemma.clone());
    }

    Annotation {
        sentence_count: analysis.sentence_count,
        words,
        ranked_activities,
    }
}
