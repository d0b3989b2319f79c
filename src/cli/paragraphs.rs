//! CLI `paragraphs` command: print the paragraphs selected for a character.

use anyhow::Result;
use std::path::Path;

use pensieve::config::PensieveConfig;

pub fn paragraphs(
    config: PensieveConfig,
    corpus_dir: &Path,
    name: &str,
    threshold: Option<f64>,
) -> Result<()> {
    let config = super::with_threshold(config, threshold)?;
    let aliases = super::aliases_from_name(name);
    anyhow::ensure!(!aliases.is_empty(), "character name must not be empty");

    let filter = super::density_filter(&config)?;
    let corpus = super::open_corpus(corpus_dir, &config)?;
    super::annotate_with_progress(&corpus, config.parallel.workers);

    let selected = corpus.find_character_paragraphs(&aliases, &filter);
    for p in &selected {
        let density = p.mention_density(&aliases).unwrap_or(0.0);
        println!("[book {} / paragraph {}] density {:.2}", p.book(), p.index(), density);
        println!("{}", p.text());
        println!();
    }
    println!(
        "{} paragraph(s) above threshold {}",
        selected.len(),
        filter.threshold()
    );
    Ok(())
}
