mod helpers;

use std::sync::Arc;

use helpers::MockAnalyzer;
use pensieve::config::Comparison;
use pensieve::corpus::{Category, Corpus, DensityFilter};
use pensieve::error::{PensieveError, Result};
use pensieve::images::ImageSearch;
use pensieve::memory::MemoryBuilder;
use pensieve::mood::JsonMoodDirectory;
use tempfile::TempDir;

struct OfflineSearch;

impl ImageSearch for OfflineSearch {
    fn search(&self, _query: &str) -> Result<Vec<String>> {
        Err(PensieveError::external("image search", "connection refused"))
    }
}

fn analyzer() -> MockAnalyzer {
    MockAnalyzer {
        people: vec!["Harry", "Ron"],
        verbs: vec!["ran", "hid", "flew", "ate"],
        ..MockAnalyzer::default()
    }
}

const BOOK: &str = "Harry ran. Harry hid.\nHarry ran. Ron ate.\nThey flew over @Harry.";

fn corpus(dir: &TempDir) -> Corpus {
    helpers::write_corpus(dir.path(), &[("book7.txt", BOOK)]);
    helpers::open_corpus(dir.path(), analyzer(), 0)
}

#[test]
fn records_use_paragraph_level_words() {
    let tmp = TempDir::new().unwrap();
    let corpus = corpus(&tmp);
    let doc = corpus.document(7).unwrap();

    // Harry is a person 3 times and a place once: the document drops the place.
    assert!(!doc.words().contains(Category::Places, "Harry"));

    let paragraph = doc.paragraph(2).unwrap();
    assert!(paragraph.words().contains(Category::Places, "Harry"));
    let record = MemoryBuilder::new(3).build(paragraph, None, &["Harry"]);
    assert_eq!(record.places, vec!["Harry"]);
    assert_eq!(record.people, vec!["alone"]);
    assert_eq!(record.activities, vec!["flew"]);
}

#[test]
fn gather_keeps_order_and_alone_sentinel() {
    let tmp = TempDir::new().unwrap();
    let corpus = corpus(&tmp);
    let filter = DensityFilter::new(0.4, Comparison::Strict).unwrap();
    let builder = MemoryBuilder::new(3);

    let records = corpus
        .gather_corpus_memories(&["Harry"], &filter, &builder, None)
        .unwrap();
    let at: Vec<usize> = records.iter().map(|r| r.paragraph).collect();
    assert_eq!(at, vec![0, 1]);
    assert_eq!(records[0].people, vec!["alone"]);
    assert_eq!(records[1].people, vec!["Ron"]);
    assert_eq!(records[0].activities, vec!["ran", "hid"]);
    assert!(records.iter().all(|r| r.mood.is_zero()));
}

#[test]
fn moods_come_from_mood_directory() {
    let tmp = TempDir::new().unwrap();
    let moods = TempDir::new().unwrap();
    std::fs::write(
        moods.path().join("7.json"),
        r#"{"0": {"joy": 1.0, "fear": 3.0}, "1": {"joy": 0.0}, "2": {"anger": 8.0}}"#,
    )
    .unwrap();

    let mut corpus = corpus(&tmp);
    corpus.attach_moods(&JsonMoodDirectory::new(moods.path()));
    let filter = DensityFilter::new(0.4, Comparison::Strict).unwrap();
    let records = corpus
        .gather_corpus_memories(&["Harry"], &filter, &MemoryBuilder::new(3), None)
        .unwrap();

    assert_eq!(records[0].mood.joy, 0.25);
    assert_eq!(records[0].mood.fear, 0.75);
    assert_eq!(records[0].mood.weight, 0.5);
    assert!(records[1].mood.is_zero());
}

#[test]
fn malformed_mood_file_means_zero_weights() {
    let tmp = TempDir::new().unwrap();
    let moods = TempDir::new().unwrap();
    std::fs::write(moods.path().join("7.json"), "[1, 2").unwrap();

    let mut corpus = corpus(&tmp);
    corpus.attach_moods(&JsonMoodDirectory::new(moods.path()));
    assert!(corpus.document(7).unwrap().moods().is_none());
}

#[test]
fn failing_image_search_still_exports() {
    let tmp = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let corpus = corpus(&tmp);
    let filter = DensityFilter::new(0.4, Comparison::Strict).unwrap();
    let builder = MemoryBuilder::new(3).with_images(Arc::new(OfflineSearch));

    let records = corpus
        .gather_document_memories(7, &["Harry"], &filter, &builder, Some(out.path()))
        .unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.image_url.is_none()));

    let written = out.path().join("harry_7.json");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(written).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["node"]["imageURL"], "");
}

#[test]
fn unknown_book_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let corpus = corpus(&tmp);
    let filter = DensityFilter::new(0.4, Comparison::Strict).unwrap();
    let result = corpus.gather_document_memories(99, &["Harry"], &filter, &MemoryBuilder::new(3), None);
    assert!(matches!(result, Err(PensieveError::Configuration(_))));
}
