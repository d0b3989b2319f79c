//! Per-paragraph emotion weights from an external lexicon pass.
//!
//! Mood files live in one directory, one JSON file per book named
//! `<book_id>.json`, mapping the paragraph index to raw emotion weights:
//!
//! ```json
//! { "0": { "joy": 0.4, "fear": 0.1 }, "3": { "anger": 1.2 } }
//! ```
//!
//! A missing file or a missing paragraph means all-zero weights.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{PensieveError, Result};

/// Emotions carried in memory records, in output order.
pub const EMOTIONS: [&str; 6] = ["joy", "fear", "surprise", "sadness", "disgust", "anger"];

/// Raw (unnormalized) emotion weights for one paragraph.
pub type RawMood = BTreeMap<String, f64>;

/// Sum of the known, non-negative emotion weights.
pub fn raw_total(raw: &RawMood) -> f64 {
    EMOTIONS
        .iter()
        .filter_map(|e| raw.get(*e))
        .map(|w| if w.is_finite() { w.max(0.0) } else { 0.0 })
        .sum()
}

/// Raw mood weights of one document, keyed by paragraph index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoodTable {
    entries: BTreeMap<usize, RawMood>,
}

impl MoodTable {
    pub fn new(entries: BTreeMap<usize, RawMood>) -> Self {
        Self { entries }
    }

    pub fn get(&self, paragraph: usize) -> Option<&RawMood> {
        self.entries.get(&paragraph)
    }

    /// Largest raw total of any paragraph in the document.
    pub fn max_total(&self) -> f64 {
        self.entries.values().map(raw_total).fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Source of mood tables, looked up by book id.
pub trait MoodSource: Send + Sync {
    /// Load the table for a book. `Ok(None)` means the book has no mood data.
    fn load(&self, book: u32) -> Result<Option<MoodTable>>;
}

/// Reads `<dir>/<book>.json` mood files.
pub struct JsonMoodDirectory {
    dir: PathBuf,
}

impl JsonMoodDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, book: u32) -> PathBuf {
        self.dir.join(format!("{book}.json"))
    }
}

impl MoodSource for JsonMoodDirectory {
    fn load(&self, book: u32) -> Result<Option<MoodTable>> {
        let path = self.path_for(book);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no mood file for book");
            return Ok(None);
        }
        parse_mood_file(&path).map(Some)
    }
}

fn parse_mood_file(path: &Path) -> Result<MoodTable> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| PensieveError::external("mood lookup", format!("{}: {e}", path.display())))?;
    let raw: BTreeMap<String, RawMood> = serde_json::from_str(&contents)
        .map_err(|e| PensieveError::external("mood lookup", format!("{}: {e}", path.display())))?;

    let mut entries = BTreeMap::new();
    for (key, mood) in raw {
        match key.trim().parse::<usize>() {
            Ok(index) => {
                entries.insert(index, mood);
            }
            Err(_) => {
                tracing::warn!(path = %path.display(), key = %key, "skipping non-numeric paragraph key");
            }
        }
    }
    Ok(MoodTable::new(entries))
}
