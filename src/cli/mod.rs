pub mod extract;
pub mod graph;
pub mod paragraphs;
pub mod stats;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use pensieve::config::PensieveConfig;
use pensieve::corpus::{Corpus, DensityFilter};
use pensieve::nlp;

/// Split a character name into title-cased aliases: `"harry potter"` becomes
/// `["Harry", "Potter"]`.
pub fn aliases_from_name(name: &str) -> Vec<String> {
    name.split_whitespace().map(title_case).collect()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Apply a command-line threshold override and validate the result.
pub fn with_threshold(mut config: PensieveConfig, threshold: Option<f64>) -> Result<PensieveConfig> {
    if let Some(t) = threshold {
        config.filter.threshold = t;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Open the corpus with the configured analyzer.
pub fn open_corpus(dir: &Path, config: &PensieveConfig) -> Result<Corpus> {
    let analyzer = nlp::create_analyzer(&config.annotation)
        .context("failed to create language analyzer")?;
    let corpus = Corpus::open(dir, analyzer, config)
        .with_context(|| format!("failed to open corpus at {}", dir.display()))?;
    if !corpus.skipped().is_empty() {
        eprintln!("Skipped {} unreadable file(s).", corpus.skipped().len());
    }
    Ok(corpus)
}

pub fn density_filter(config: &PensieveConfig) -> Result<DensityFilter> {
    DensityFilter::from_config(&config.filter).context("invalid density filter")
}

/// Annotate every document, showing progress per document. With more than one
/// worker the documents are annotated in parallel behind a spinner.
pub fn annotate_with_progress(corpus: &Corpus, workers: usize) {
    let total = corpus.documents().len();
    if workers > 1 {
        let pb = ProgressBar::new_spinner();
        pb.set_message(format!("annotating {total} documents on {workers} workers"));
        pb.enable_steady_tick(std::time::Duration::from_millis(120));
        corpus.warm(workers);
        pb.finish_and_clear();
        return;
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} {msg} ({eta})")
            .expect("valid template")
            .progress_chars("##-"),
    );
    for doc in corpus.documents() {
        pb.set_message(format!("book {}", doc.id()));
        doc.words();
        pb.inc(1);
    }
    pb.finish_and_clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_becomes_title_cased_aliases() {
        assert_eq!(aliases_from_name("harry potter"), vec!["Harry", "Potter"]);
        assert_eq!(aliases_from_name("  HERMIONE  "), vec!["Hermione"]);
        assert!(aliases_from_name("").is_empty());
    }

    #[test]
    fn threshold_override_is_validated() {
        let config = with_threshold(PensieveConfig::default(), Some(0.4)).unwrap();
        assert_eq!(config.filter.threshold, 0.4);
        assert!(with_threshold(PensieveConfig::default(), Some(-1.0)).is_err());
    }
}
