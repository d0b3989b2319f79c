//! Documents and their paragraphs.
//!
//! A [`Document`] segments and annotates its text on first access to
//! [`Document::paragraphs`], and aggregates paragraph counts on first access to
//! [`Document::words`]. Both are computed once and frozen; concurrent first
//! readers block on the same initialization.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::config::PensieveConfig;
use crate::corpus::annotate::{Annotation, Annotator};
use crate::corpus::segment::segment;
use crate::corpus::words::{Category, WordCategoryMap};
use crate::error::{PensieveError, Result};
use crate::mood::MoodTable;

/// Numeric book identifier derived from the source file.
pub type BookId = u32;

/// Segmentation and aggregation knobs for a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentSettings {
    pub min_tokens: usize,
    pub place_ratio: f64,
    pub thing_limit: usize,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self::from_config(&PensieveConfig::default())
    }
}

impl DocumentSettings {
    pub fn from_config(config: &PensieveConfig) -> Self {
        Self {
            min_tokens: config.segmenter.min_tokens,
            place_ratio: config.disambiguation.place_ratio,
            thing_limit: config.disambiguation.thing_limit,
        }
    }
}

/// One segmented unit of text.
#[derive(Debug, Clone)]
pub struct Paragraph {
    book: BookId,
    index: usize,
    text: String,
    annotation: Annotation,
}

impl Paragraph {
    pub fn new(book: BookId, index: usize, text: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            book,
            index,
            text: text.into(),
            annotation,
        }
    }

    /// Id of the owning document.
    pub fn book(&self) -> BookId {
        self.book
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn words(&self) -> &WordCategoryMap {
        &self.annotation.words
    }

    pub fn sentence_count(&self) -> usize {
        self.annotation.sentence_count
    }

    pub fn ranked_activities(&self) -> &[String] {
        &self.annotation.ranked_activities
    }

    /// Total people-mentions of any alias.
    pub fn mention_count<S: AsRef<str>>(&self, aliases: &[S]) -> usize {
        aliases
            .iter()
            .map(|a| self.words().count(Category::People, a.as_ref()))
            .sum()
    }

    /// Mentions per sentence, or `None` for a paragraph without sentences.
    pub fn mention_density<S: AsRef<str>>(&self, aliases: &[S]) -> Option<f64> {
        match self.sentence_count() {
            0 => None,
            n => Some(self.mention_count(aliases) as f64 / n as f64),
        }
    }
}

/// One source file of the corpus.
pub struct Document {
    id: BookId,
    path: PathBuf,
    text: String,
    annotator: Arc<Annotator>,
    settings: DocumentSettings,
    moods: Option<MoodTable>,
    paragraphs: OnceLock<Vec<Paragraph>>,
    words: OnceLock<WordCategoryMap>,
}

impl Document {
    /// Read a document from disk. Decoding failures surface as
    /// [`PensieveError::SourceRead`].
    pub fn open(
        path: impl AsRef<Path>,
        id: BookId,
        annotator: Arc<Annotator>,
        settings: DocumentSettings,
    ) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PensieveError::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), book = id, bytes = text.len(), "document loaded");
        Ok(Self::from_text(id, path, text, annotator, settings))
    }

    pub fn from_text(
        id: BookId,
        path: impl Into<PathBuf>,
        text: impl Into<String>,
        annotator: Arc<Annotator>,
        settings: DocumentSettings,
    ) -> Self {
        Self {
            id,
            path: path.into(),
            text: text.into(),
            annotator,
            settings,
            moods: None,
            paragraphs: OnceLock::new(),
            words: OnceLock::new(),
        }
    }

    pub fn set_moods(&mut self, moods: Option<MoodTable>) {
        self.moods = moods;
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn moods(&self) -> Option<&MoodTable> {
        self.moods.as_ref()
    }

    /// Segment and annotate on first call; later calls return the cached paragraphs.
    pub fn paragraphs(&self) -> &[Paragraph] {
        self.paragraphs.get_or_init(|| {
            let paragraphs: Vec<Paragraph> = segment(&self.text, self.settings.min_tokens)
                .into_iter()
                .enumerate()
                .map(|(index, text)| {
                    let annotation = self.annotator.annotate(index, &text);
                    Paragraph::new(self.id, index, text, annotation)
                })
                .collect();
            tracing::info!(
                book = self.id,
                paragraphs = paragraphs.len(),
                "document annotated"
            );
            paragraphs
        })
    }

    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs().get(index)
    }

    /// Document-wide category counts with cross-category corrections applied.
    pub fn words(&self) -> &WordCategoryMap {
        self.words.get_or_init(|| {
            let mut words = WordCategoryMap::new();
            for paragraph in self.paragraphs() {
                words.merge(paragraph.words());
            }
            disambiguate(&mut words, self.settings.place_ratio, self.settings.thing_limit);
            words
        })
    }

    /// Whether `word` occurs at least `min` times in `category` across the document.
    pub fn is_common(&self, category: Category, word: &str, min: usize) -> bool {
        self.words().count(category, word) >= min
    }

    /// Whether the paragraphs have been built yet.
    pub fn is_materialized(&self) -> bool {
        self.paragraphs.get().is_some()
    }
}

/// Remove person names that leaked into places and things.
///
/// A name is dropped from places when `people_count * place_ratio` exceeds its
/// place count, and from things when its people count exceeds `thing_limit`.
pub fn disambiguate(words: &mut WordCategoryMap, place_ratio: f64, thing_limit: usize) {
    let people: Vec<(String, usize)> = words
        .get(Category::People)
        .iter()
        .map(|(name, &count)| (name.clone(), count))
        .collect();

    for (name, count) in people {
        let places = words.count(Category::Places, &name);
        if places > 0 && count as f64 * place_ratio > places as f64 {
            words.remove(Category::Places, &name);
        }
        if count > thing_limit {
            words.remove(Category::Things, &name);
        }
    }
}
