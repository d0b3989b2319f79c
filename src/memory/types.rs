//! Memory record definitions.
//!
//! A [`MemoryRecord`] is the culled output for one (character, paragraph)
//! pair. [`MoodWeights`] is its normalized emotion vector.

use serde::Serialize;

use crate::corpus::BookId;
use crate::mood::{raw_total, RawMood};

/// Normalized emotion weights for a paragraph.
///
/// The six emotions sum to 1 when the paragraph has any mood data, and are all
/// zero otherwise. `weight` is the paragraph's raw total relative to the
/// strongest paragraph of its document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MoodWeights {
    pub weight: f64,
    pub joy: f64,
    pub fear: f64,
    pub surprise: f64,
    pub sadness: f64,
    pub disgust: f64,
    pub anger: f64,
}

impl MoodWeights {
    pub fn from_raw(raw: Option<&RawMood>, document_max: f64) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        let total = raw_total(raw);
        if total <= 0.0 {
            return Self::default();
        }
        let share = |emotion: &str| {
            raw.get(emotion)
                .copied()
                .filter(|w| w.is_finite() && *w > 0.0)
                .map_or(0.0, |w| w / total)
        };
        let weight = if document_max > 0.0 {
            (total / document_max).min(1.0)
        } else {
            0.0
        };
        Self {
            weight,
            joy: share("joy"),
            fear: share("fear"),
            surprise: share("surprise"),
            sadness: share("sadness"),
            disgust: share("disgust"),
            anger: share("anger"),
        }
    }

    /// Sum of the six emotion weights.
    pub fn total(&self) -> f64 {
        self.joy + self.fear + self.surprise + self.sadness + self.disgust + self.anger
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0.0 && self.weight == 0.0
    }
}

/// Extraction output for one paragraph about one character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryRecord {
    pub book: BookId,
    pub paragraph: usize,
    /// Other people in the scene, or the alone sentinel.
    pub people: Vec<String>,
    pub places: Vec<String>,
    pub things: Vec<String>,
    pub activities: Vec<String>,
    pub times: Vec<String>,
    pub mood: MoodWeights,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub narrative: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_to_unit_sum() {
        let mut raw = RawMood::new();
        raw.insert("joy".into(), 3.0);
        raw.insert("fear".into(), 1.0);
        let mood = MoodWeights::from_raw(Some(&raw), 8.0);
        assert!((mood.total() - 1.0).abs() < 1e-12);
        assert_eq!(mood.joy, 0.75);
        assert_eq!(mood.fear, 0.25);
        assert_eq!(mood.weight, 0.5);
    }

    #[test]
    fn zero_sum_stays_zero() {
        let mut raw = RawMood::new();
        raw.insert("joy".into(), 0.0);
        raw.insert("anger".into(), 0.0);
        let mood = MoodWeights::from_raw(Some(&raw), 0.0);
        assert!(mood.is_zero());
        assert!(!mood.joy.is_nan());
    }

    #[test]
    fn missing_mood_is_zero() {
        assert_eq!(MoodWeights::from_raw(None, 5.0), MoodWeights::default());
    }
}
