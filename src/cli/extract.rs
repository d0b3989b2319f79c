//! CLI `extract` command: gather a character's memories across the corpus.

use anyhow::{Context, Result};
use std::path::PathBuf;

use pensieve::config::PensieveConfig;
use pensieve::images;
use pensieve::memory::MemoryBuilder;
use pensieve::mood::JsonMoodDirectory;

pub struct ExtractArgs {
    pub corpus_dir: PathBuf,
    pub name: String,
    pub mood_dir: Option<PathBuf>,
    pub images: bool,
    pub save_dir: Option<PathBuf>,
    pub threshold: Option<f64>,
}

pub fn extract(config: PensieveConfig, args: ExtractArgs) -> Result<()> {
    let config = super::with_threshold(config, args.threshold)?;
    let aliases = super::aliases_from_name(&args.name);
    anyhow::ensure!(!aliases.is_empty(), "character name must not be empty");

    let save_dir = args
        .save_dir
        .unwrap_or_else(|| config.resolved_output_dir());
    std::fs::create_dir_all(&save_dir)
        .with_context(|| format!("failed to create output dir: {}", save_dir.display()))?;

    let mut builder = MemoryBuilder::from_config(&config.memory);
    if args.images {
        let search = images::create_image_search(&config.images)
            .context("failed to create image search client")?;
        builder = builder.with_images(search);
    }

    let filter = super::density_filter(&config)?;
    let mut corpus = super::open_corpus(&args.corpus_dir, &config)?;
    if let Some(dir) = &args.mood_dir {
        corpus.attach_moods(&JsonMoodDirectory::new(dir));
    }

    println!(
        "Extracting memories of {} from {} documents...",
        aliases.join(" "),
        corpus.documents().len()
    );
    super::annotate_with_progress(&corpus, config.parallel.workers);

    let records = corpus
        .gather_corpus_memories(&aliases, &filter, &builder, Some(&save_dir))
        .context("failed to gather memories")?;

    let file = save_dir.join(pensieve::memory::export::export_file_name(&aliases, None));
    println!("Memories:            {}", records.len());
    println!(
        "With images:         {}",
        records.iter().filter(|r| r.image_url.is_some()).count()
    );
    println!("Written to:          {}", file.display());
    Ok(())
}
