//! JSON export of memory records.
//!
//! Each record becomes one element of a JSON array: the memory node, its mood
//! relation, one concept per extracted word, and the narrative text.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::corpus::BookId;
use crate::error::Result;
use crate::memory::types::MemoryRecord;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000Z";
const CONCEPT_WEIGHT: f64 = 0.5;
const ORIGIN_TYPE: &str = "OriginUserDefined";

/// Concept vocabulary of the memory schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Concept {
    Person,
    Place,
    Thing,
    Activity,
    Time,
    Mood,
}

impl Concept {
    pub fn as_str(&self) -> &'static str {
        match self {
            Concept::Person => "Person",
            Concept::Place => "Place",
            Concept::Thing => "Thing",
            Concept::Activity => "Activity",
            Concept::Time => "Time",
            Concept::Mood => "Mood",
        }
    }

    pub fn relation(&self) -> String {
        format!("Has_{}", self.as_str())
    }
}

#[derive(Debug, Serialize)]
pub struct MemoryDocument {
    pub memory: String,
    pub node: MemoryNode,
    pub relation: MoodRelation,
    pub concepts: Vec<ConceptEntry>,
    pub narrative: Narrative,
}

#[derive(Debug, Serialize)]
pub struct MemoryNode {
    pub name: String,
    pub label: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    #[serde(rename = "iconURL")]
    pub icon_url: String,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Serialize)]
pub struct MoodRelation {
    pub weight: f64,
    pub joy: f64,
    pub fear: f64,
    pub surprise: f64,
    pub sadness: f64,
    pub disgust: f64,
    pub anger: f64,
}

#[derive(Debug, Serialize)]
pub struct ConceptEntry {
    pub node: ConceptNode,
    pub relation: ConceptRelation,
}

#[derive(Debug, Serialize)]
pub struct ConceptNode {
    pub concept: Concept,
    pub name: String,
    pub label: String,
    #[serde(rename = "iconURL")]
    pub icon_url: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptRelation {
    pub relation: String,
    pub name: String,
    #[serde(rename = "iconURL")]
    pub icon_url: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub weight: f64,
    pub created: String,
    pub updated: String,
    pub origin_type: String,
    pub joy: f64,
    pub fear: f64,
    pub surprise: f64,
    pub sadness: f64,
    pub disgust: f64,
    pub anger: f64,
}

#[derive(Debug, Serialize)]
pub struct Narrative {
    pub node: NarrativeNode,
    pub relation: NarrativeRelation,
}

#[derive(Debug, Serialize)]
pub struct NarrativeNode {
    pub name: String,
    pub label: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct NarrativeRelation {
    pub weight: f64,
}

/// Lowercase a concept word and join its parts with underscores.
pub fn clean_concept_name(word: &str) -> String {
    word.replace(' ', "_").to_lowercase()
}

/// File-name slug for a character: lowercased aliases joined by `_`, with
/// anything outside `[a-z0-9_-]` dropped.
pub fn alias_slug<S: AsRef<str>>(aliases: &[S]) -> String {
    let joined = aliases
        .iter()
        .map(|a| a.as_ref().trim().to_lowercase().replace(char::is_whitespace, "_"))
        .filter(|a| !a.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    let slug: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if slug.is_empty() {
        "character".to_string()
    } else {
        slug
    }
}

/// `<slug>.json` for a corpus export, `<slug>_<book>.json` for one document.
pub fn export_file_name<S: AsRef<str>>(aliases: &[S], book: Option<BookId>) -> String {
    match book {
        Some(book) => format!("{}_{book}.json", alias_slug(aliases)),
        None => format!("{}.json", alias_slug(aliases)),
    }
}

/// Convert one record to its exported form, stamping concepts with `now`.
pub fn to_memory_document(record: &MemoryRecord, now: DateTime<Utc>) -> MemoryDocument {
    let stamp = now.format(TIMESTAMP_FORMAT).to_string();

    let groups = [
        (Concept::Person, &record.people),
        (Concept::Place, &record.places),
        (Concept::Thing, &record.things),
        (Concept::Activity, &record.activities),
        (Concept::Time, &record.times),
    ];
    let concepts = groups
        .into_iter()
        .flat_map(|(concept, words)| words.iter().map(move |w| (concept, w)))
        .map(|(concept, word)| ConceptEntry {
            node: ConceptNode {
                concept,
                name: clean_concept_name(word),
                label: String::new(),
                icon_url: String::new(),
                image_url: String::new(),
            },
            relation: ConceptRelation {
                relation: concept.relation(),
                name: String::new(),
                icon_url: String::new(),
                image_url: String::new(),
                weight: CONCEPT_WEIGHT,
                created: stamp.clone(),
                updated: stamp.clone(),
                origin_type: ORIGIN_TYPE.to_string(),
                joy: 0.0,
                fear: 0.0,
                surprise: 0.0,
                sadness: 0.0,
                disgust: 0.0,
                anger: 0.0,
            },
        })
        .collect();

    let mood = &record.mood;
    MemoryDocument {
        memory: uuid::Uuid::now_v7().to_string(),
        node: MemoryNode {
            name: String::new(),
            label: String::new(),
            image_url: record.image_url.clone().unwrap_or_default(),
            icon_url: String::new(),
            created: stamp.clone(),
            updated: stamp,
        },
        relation: MoodRelation {
            weight: mood.weight,
            joy: mood.joy,
            fear: mood.fear,
            surprise: mood.surprise,
            sadness: mood.sadness,
            disgust: mood.disgust,
            anger: mood.anger,
        },
        concepts,
        narrative: Narrative {
            node: NarrativeNode {
                name: String::new(),
                label: "title".to_string(),
                text: record.narrative.clone(),
            },
            relation: NarrativeRelation {
                weight: CONCEPT_WEIGHT,
            },
        },
    }
}

/// Write `records` as a JSON array under `dir`. The file is written to a
/// temporary path first and renamed into place.
pub fn save_memories<S: AsRef<str>>(
    records: &[MemoryRecord],
    dir: &Path,
    aliases: &[S],
    book: Option<BookId>,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let now = Utc::now();
    let documents: Vec<MemoryDocument> = records
        .iter()
        .map(|r| to_memory_document(r, now))
        .collect();

    let dest = dir.join(export_file_name(aliases, book));
    let tmp_path = dest.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(&documents)?;
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, &dest)?;

    tracing::info!(path = %dest.display(), memories = records.len(), "memories exported");
    Ok(dest)
}
