//! Category counters shared by paragraphs and documents.

use std::collections::BTreeMap;

use serde::Serialize;

/// The closed set of word categories extracted from narrative text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Times,
    People,
    Places,
    Things,
    Activities,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Times,
        Self::People,
        Self::Places,
        Self::Things,
        Self::Activities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Times => "times",
            Self::People => "people",
            Self::Places => "places",
            Self::Things => "things",
            Self::Activities => "activities",
        }
    }

    fn slot(&self) -> usize {
        match self {
            Self::Times => 0,
            Self::People => 1,
            Self::Places => 2,
            Self::Things => 3,
            Self::Activities => 4,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A multiset of extracted strings.
pub type Counts = BTreeMap<String, usize>;

/// Per-category occurrence counts for one paragraph or one whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCategoryMap {
    slots: [Counts; 5],
}

impl WordCategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, category: Category, word: impl Into<String>) {
        self.add_n(category, word, 1);
    }

    pub fn add_n(&mut self, category: Category, word: impl Into<String>, n: usize) {
        if n == 0 {
            return;
        }
        *self.slots[category.slot()].entry(word.into()).or_insert(0) += n;
    }

    pub fn get(&self, category: Category) -> &Counts {
        &self.slots[category.slot()]
    }

    pub fn count(&self, category: Category, word: &str) -> usize {
        self.get(category).get(word).copied().unwrap_or(0)
    }

    pub fn contains(&self, category: Category, word: &str) -> bool {
        self.get(category).contains_key(word)
    }

    /// Drop `word` from `category`, returning the count it had.
    pub fn remove(&mut self, category: Category, word: &str) -> usize {
        self.slots[category.slot()].remove(word).unwrap_or(0)
    }

    /// Multiset union: add every count of `other` into `self`.
    pub fn merge(&mut self, other: &WordCategoryMap) {
        for category in Category::ALL {
            for (word, &n) in other.get(category) {
                self.add_n(category, word.clone(), n);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_empty())
    }

    /// The `n` most frequent entries of a category, ties broken alphabetically.
    pub fn most_common(&self, category: Category, n: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .get(category)
            .iter()
            .map(|(w, &c)| (w.as_str(), c))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }
}

impl Serialize for WordCategoryMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for category in Category::ALL {
            map.serialize_entry(category.as_str(), self.get(category))?;
        }
        map.end()
    }
}
