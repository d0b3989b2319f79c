use anyhow::Result;
use std::path::Path;

use pensieve::config::PensieveConfig;
use pensieve::corpus::Category;

/// Print per-document paragraph counts and the most frequent words per category.
pub fn stats(config: PensieveConfig, corpus_dir: &Path, top: usize) -> Result<()> {
    config.validate()?;
    let corpus = super::open_corpus(corpus_dir, &config)?;
    super::annotate_with_progress(&corpus, config.parallel.workers);

    println!("Corpus Statistics");
    println!("{}", "=".repeat(40));
    println!("  Directory:           {}", corpus.dir().display());
    println!("  Documents:           {}", corpus.documents().len());
    println!("  Skipped:             {}", corpus.skipped().len());
    println!("  Paragraphs:          {}", corpus.paragraphs().len());
    println!();

    for doc in corpus.documents() {
        println!("Book {} ({})", doc.id(), doc.path().display());
        println!("  Paragraphs:          {}", doc.paragraphs().len());
        for category in [Category::People, Category::Places, Category::Things] {
            let common = doc.words().most_common(category, top);
            let listed: Vec<String> = common
                .iter()
                .map(|(word, count)| format!("{word} ({count})"))
                .collect();
            println!("  {:<20} {}", format!("{category}:"), listed.join(", "));
        }
        println!();
    }

    Ok(())
}
