mod helpers;

use std::sync::Arc;

use helpers::MockAnalyzer;
use pensieve::config::{Comparison, PensieveConfig};
use pensieve::corpus::{Category, Corpus, DensityFilter};
use pensieve::error::PensieveError;
use pensieve::nlp::heuristic::HeuristicAnalyzer;
use tempfile::TempDir;

fn sample_analyzer() -> MockAnalyzer {
    MockAnalyzer {
        people: vec!["Harry", "Ron", "Hermione"],
        places: vec!["Hogwarts", "London"],
        verbs: vec!["walked", "stopped", "raced", "shouted", "laughed"],
        fail_on: None,
    }
}

#[test]
fn sample_corpus_has_three_paragraphs() {
    let corpus = helpers::open_corpus(&helpers::test_data_dir(), sample_analyzer(), 25);
    let ids: Vec<u32> = corpus.documents().iter().map(|d| d.id()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(corpus.documents()[0].paragraphs().len(), 2);
    assert_eq!(corpus.documents()[1].paragraphs().len(), 1);
    assert_eq!(corpus.paragraphs().len(), 3);
}

#[test]
fn document_words_are_memoized() {
    let corpus = helpers::open_corpus(&helpers::test_data_dir(), sample_analyzer(), 25);
    let doc = &corpus.documents()[0];
    assert!(!doc.is_materialized());

    let first = doc.words().clone();
    let second = doc.words();
    assert_eq!(&first, second);
    assert!(std::ptr::eq(doc.paragraphs(), doc.paragraphs()));
    assert!(doc.is_materialized());

    assert_eq!(first.count(Category::People, "Harry"), 2);
    assert_eq!(first.count(Category::Places, "Hogwarts"), 1);
    assert!(doc.is_common(Category::People, "Harry", 2));
}

#[test]
fn parallel_warm_matches_sequential() {
    let sequential = helpers::open_corpus(&helpers::test_data_dir(), sample_analyzer(), 25);
    let parallel = helpers::open_corpus(&helpers::test_data_dir(), sample_analyzer(), 25);
    parallel.warm(4);

    for (a, b) in sequential.documents().iter().zip(parallel.documents()) {
        assert_eq!(a.words(), b.words());
        let texts_a: Vec<&str> = a.paragraphs().iter().map(|p| p.text()).collect();
        let texts_b: Vec<&str> = b.paragraphs().iter().map(|p| p.text()).collect();
        assert_eq!(texts_a, texts_b);
    }
}

#[test]
fn character_paragraphs_in_document_order() {
    let corpus = helpers::open_corpus(&helpers::test_data_dir(), sample_analyzer(), 25);
    let filter = DensityFilter::new(0.4, Comparison::Strict).unwrap();
    let selected = corpus.find_character_paragraphs(&["Harry"], &filter);
    let at: Vec<(u32, usize)> = selected.iter().map(|p| (p.book(), p.index())).collect();
    assert_eq!(at, vec![(1, 0), (2, 0)]);
}

#[test]
fn unreadable_file_is_skipped() {
    let tmp = TempDir::new().unwrap();
    helpers::write_corpus(tmp.path(), &[("a1.txt", "Harry ran.")]);
    std::fs::write(tmp.path().join("b2.txt"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();

    let corpus = helpers::open_corpus(tmp.path(), MockAnalyzer::with_people(&["Harry"]), 0);
    assert_eq!(corpus.documents().len(), 1);
    assert_eq!(corpus.skipped().len(), 1);
    assert!(corpus.skipped()[0].ends_with("b2.txt"));
}

#[test]
fn duplicate_book_ids_get_next_free_id() {
    let tmp = TempDir::new().unwrap();
    helpers::write_corpus(
        tmp.path(),
        &[("book1.txt", "Harry ran."), ("part1.txt", "Ron ran."), ("z.txt", "Hermione ran.")],
    );
    let corpus = helpers::open_corpus(tmp.path(), MockAnalyzer::default(), 0);
    let ids: Vec<u32> = corpus.documents().iter().map(|d| d.id()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn duplicate_max_book_ids_do_not_overflow() {
    let tmp = TempDir::new().unwrap();
    helpers::write_corpus(
        tmp.path(),
        &[("a4294967295.txt", "Harry ran."), ("b4294967295.txt", "Ron ran.")],
    );
    let corpus = helpers::open_corpus(tmp.path(), MockAnalyzer::default(), 0);
    let ids: Vec<u32> = corpus.documents().iter().map(|d| d.id()).collect();
    assert_eq!(ids, vec![u32::MAX, 1]);
}

#[test]
fn invalid_threshold_fails_before_reading() {
    let tmp = TempDir::new().unwrap();
    helpers::write_corpus(tmp.path(), &[("a.txt", "Harry ran.")]);
    let mut config = PensieveConfig::default();
    config.filter.threshold = -1.0;
    let result = Corpus::open(tmp.path(), Arc::new(MockAnalyzer::default()), &config);
    assert!(matches!(result, Err(PensieveError::Configuration(_))));
}

#[test]
fn missing_corpus_dir_is_configuration_error() {
    let tmp = TempDir::new().unwrap();
    let result = Corpus::open(
        tmp.path().join("missing"),
        Arc::new(MockAnalyzer::default()),
        &PensieveConfig::default(),
    );
    assert!(matches!(result, Err(PensieveError::Configuration(_))));
}

#[test]
fn failed_annotation_leaves_empty_paragraph() {
    let analyzer = MockAnalyzer {
        people: vec!["Harry"],
        fail_on: Some("Boom"),
        ..MockAnalyzer::default()
    };
    let doc = helpers::document(1, "Harry ran.\nBoom went the door.\nHarry hid.", analyzer, 0);
    let paragraphs = doc.paragraphs();
    assert_eq!(paragraphs.len(), 3);
    assert!(paragraphs[1].annotation().is_empty());
    assert_eq!(paragraphs[2].words().count(Category::People, "Harry"), 1);
}

#[test]
fn heuristic_analyzer_selects_both_harry_paragraphs() {
    let tmp = TempDir::new().unwrap();
    helpers::write_corpus(
        tmp.path(),
        &[("book1.txt", "Harry ran to the castle.\n\nHarry was happy.")],
    );
    let mut config = PensieveConfig::default();
    config.segmenter.min_tokens = 0;
    let corpus = Corpus::open(tmp.path(), Arc::new(HeuristicAnalyzer::new()), &config).unwrap();

    let filter = DensityFilter::new(0.0, Comparison::Strict).unwrap();
    let selected = corpus.find_character_paragraphs(&["Harry"], &filter);
    let texts: Vec<&str> = selected.iter().map(|p| p.text()).collect();
    assert_eq!(texts, vec!["Harry ran to the castle.", "Harry was happy."]);
}

#[test]
fn curly_possessive_still_counts_the_character() {
    let tmp = TempDir::new().unwrap();
    helpers::write_corpus(
        tmp.path(),
        &[("book1.txt", "Harry\u{2019}s Firebolt flew. Harry\u{2019}s Firebolt fell.")],
    );
    let mut config = PensieveConfig::default();
    config.segmenter.min_tokens = 0;
    let corpus = Corpus::open(tmp.path(), Arc::new(HeuristicAnalyzer::new()), &config).unwrap();

    let paragraph = corpus.paragraphs()[0];
    assert_eq!(paragraph.words().count(Category::People, "Harry"), 2);

    let filter = DensityFilter::new(0.8, Comparison::Strict).unwrap();
    assert_eq!(corpus.find_character_paragraphs(&["Harry"], &filter).len(), 1);
}
