use anyhow::{Context, Result};
use std::path::Path;

use pensieve::config::PensieveConfig;
use pensieve::corpus::graph::CharacterGraph;

/// Print the normalized co-occurrence graph of one book as JSON to stdout.
pub fn graph(config: PensieveConfig, corpus_dir: &Path, book: u32, top: usize) -> Result<()> {
    config.validate()?;
    let corpus = super::open_corpus(corpus_dir, &config)?;
    let doc = corpus
        .document(book)
        .with_context(|| format!("no document with book id {book}"))?;

    let mut graph = CharacterGraph::build(doc, top);
    graph.normalize();

    let json = serde_json::to_string_pretty(&graph)?;
    println!("{json}");
    eprintln!(
        "Graph for book {book}: {} nodes, {} edges, max degree {}.",
        graph.nodes.len(),
        graph.edges.len(),
        graph.max_degree()
    );
    Ok(())
}
