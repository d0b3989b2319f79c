//! Build memory records from selected paragraphs.
//!
//! Records use the paragraph's own category map. Document-level corrections
//! are not applied here, so a name the document treats as a person may still
//! appear as a place in a single paragraph.

use std::sync::Arc;

use crate::config::MemoryConfig;
use crate::corpus::words::Category;
use crate::corpus::Paragraph;
use crate::images::ImageSearch;
use crate::memory::types::{MemoryRecord, MoodWeights};
use crate::mood::MoodTable;

pub struct MemoryBuilder {
    n_verbs: usize,
    alone: String,
    images: Option<Arc<dyn ImageSearch>>,
}

impl MemoryBuilder {
    pub fn new(n_verbs: usize) -> Self {
        Self {
            n_verbs,
            alone: "alone".into(),
            images: None,
        }
    }

    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::new(config.n_verbs).with_alone_sentinel(config.alone_sentinel.clone())
    }

    pub fn with_alone_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.alone = sentinel.into();
        self
    }

    /// Resolve an image URL for every record.
    pub fn with_images(mut self, images: Arc<dyn ImageSearch>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn build<S: AsRef<str>>(
        &self,
        paragraph: &Paragraph,
        moods: Option<&MoodTable>,
        aliases: &[S],
    ) -> MemoryRecord {
        let words = paragraph.words();
        let keys = |category| -> Vec<String> { words.get(category).keys().cloned().collect() };

        let mut people: Vec<String> = words
            .get(Category::People)
            .keys()
            .filter(|name| !aliases.iter().any(|a| a.as_ref() == name.as_str()))
            .cloned()
            .collect();
        let alone = people.is_empty();
        if alone {
            people.push(self.alone.clone());
        }

        let activities: Vec<String> = paragraph
            .ranked_activities()
            .iter()
            .take(self.n_verbs)
            .cloned()
            .collect();

        let mood = MoodWeights::from_raw(
            moods.and_then(|t| t.get(paragraph.index())),
            moods.map_or(0.0, MoodTable::max_total),
        );

        let mut record = MemoryRecord {
            book: paragraph.book(),
            paragraph: paragraph.index(),
            people,
            places: keys(Category::Places),
            things: keys(Category::Things),
            activities,
            times: keys(Category::Times),
            mood,
            image_url: None,
            narrative: paragraph.text().to_string(),
        };

        if let Some(images) = &self.images {
            record.image_url = self.resolve_image(images.as_ref(), &record, alone);
        }
        record
    }

    fn resolve_image(
        &self,
        images: &dyn ImageSearch,
        record: &MemoryRecord,
        alone: bool,
    ) -> Option<String> {
        let query = record
            .places
            .first()
            .or_else(|| record.things.first())
            .or_else(|| if alone { None } else { record.people.first() })?;

        match images.first(query) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(
                    book = record.book,
                    paragraph = record.paragraph,
                    query = %query,
                    error = %e,
                    "image lookup failed, leaving imageURL empty"
                );
                None
            }
        }
    }
}
