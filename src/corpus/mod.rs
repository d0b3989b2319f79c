//! Corpus orchestration: discovery, documents, and corpus-wide passes.
//!
//! A [`Corpus`] discovers the source files of a directory in filename order,
//! opens one [`Document`] per readable file, and drives character filtering and
//! memory extraction across all of them. Unreadable files are logged and left
//! out; every other failure inside a document is absorbed at paragraph level.

pub mod annotate;
pub mod density;
pub mod document;
pub mod graph;
pub mod segment;
pub mod words;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::PensieveConfig;
use crate::error::{PensieveError, Result};
use crate::memory::builder::MemoryBuilder;
use crate::memory::export;
use crate::memory::types::MemoryRecord;
use crate::mood::MoodSource;
use crate::nlp::LanguageAnalyzer;

pub use annotate::{Annotation, Annotator};
pub use density::DensityFilter;
pub use document::{BookId, Document, DocumentSettings, Paragraph};
pub use words::{Category, WordCategoryMap};

pub struct Corpus {
    dir: PathBuf,
    documents: Vec<Document>,
    skipped: Vec<PathBuf>,
}

impl Corpus {
    /// Open every source file under `dir`.
    ///
    /// The configuration is validated first; an invalid configuration or an
    /// unreadable directory fails before any document is read.
    pub fn open(
        dir: impl AsRef<Path>,
        analyzer: Arc<dyn LanguageAnalyzer>,
        config: &PensieveConfig,
    ) -> Result<Self> {
        config.validate()?;
        let dir = dir.as_ref();
        let annotator = Arc::new(Annotator::new(analyzer, config.annotation.top_verbs));
        let settings = DocumentSettings::from_config(config);

        let files = discover_files(dir, &config.segmenter.extensions)?;
        tracing::info!(dir = %dir.display(), files = files.len(), "corpus discovered");

        let mut documents = Vec::with_capacity(files.len());
        let mut skipped = Vec::new();
        let mut used_ids: Vec<BookId> = Vec::new();

        for (ordinal, path) in files.into_iter().enumerate() {
            let mut id = book_id_for(&path, ordinal);
            if used_ids.contains(&id) {
                let fallback = next_free_id(&used_ids).ok_or_else(|| {
                    PensieveError::Configuration(format!(
                        "no free book id left for {}",
                        path.display()
                    ))
                })?;
                tracing::warn!(
                    path = %path.display(),
                    id,
                    fallback,
                    "book id already taken, assigning next free id"
                );
                id = fallback;
            }

            match Document::open(&path, id, Arc::clone(&annotator), settings) {
                Ok(doc) => {
                    tracing::info!(path = %path.display(), book = id, "loading document");
                    used_ids.push(id);
                    documents.push(doc);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable document");
                    skipped.push(path);
                }
            }
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            documents,
            skipped,
        })
    }

    /// Attach mood tables. Lookup failures leave that document without moods.
    pub fn attach_moods(&mut self, source: &dyn MoodSource) {
        for doc in &mut self.documents {
            match source.load(doc.id()) {
                Ok(table) => {
                    if let Some(t) = &table {
                        tracing::debug!(book = doc.id(), entries = t.len(), "mood table attached");
                    }
                    doc.set_moods(table);
                }
                Err(e) => {
                    tracing::warn!(book = doc.id(), error = %e, "mood lookup failed, using zero weights");
                    doc.set_moods(None);
                }
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, book: BookId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id() == book)
    }

    /// Files that were discovered but could not be read.
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }

    /// Every paragraph of the corpus, documents in order.
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        self.documents
            .iter()
            .flat_map(|d| d.paragraphs().iter())
            .collect()
    }

    /// Build paragraphs and aggregates for every document on up to `workers`
    /// threads. Results are cached per document, so later passes read the same
    /// values in the same order as a sequential run.
    pub fn warm(&self, workers: usize) {
        let workers = workers.max(1).min(self.documents.len());
        if workers <= 1 {
            for doc in &self.documents {
                doc.words();
            }
            return;
        }

        let next = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| loop {
                    let i = next.fetch_add(1, Ordering::Relaxed);
                    let Some(doc) = self.documents.get(i) else {
                        break;
                    };
                    doc.words();
                });
            }
        });
        tracing::info!(documents = self.documents.len(), workers, "corpus warmed");
    }

    /// Paragraphs where the character's mention density passes `filter`.
    pub fn find_character_paragraphs<S: AsRef<str>>(
        &self,
        aliases: &[S],
        filter: &DensityFilter,
    ) -> Vec<&Paragraph> {
        filter.select(&self.documents, aliases)
    }

    /// Memory records for every selected paragraph of the corpus. With `save`,
    /// the records are also written to `<save>/<slug>.json`.
    pub fn gather_corpus_memories<S: AsRef<str>>(
        &self,
        aliases: &[S],
        filter: &DensityFilter,
        builder: &MemoryBuilder,
        save: Option<&Path>,
    ) -> Result<Vec<MemoryRecord>> {
        let records = self.gather(&self.documents, aliases, filter, builder);
        tracing::info!(memories = records.len(), "corpus memories gathered");
        if let Some(dir) = save {
            export::save_memories(&records, dir, aliases, None)?;
        }
        Ok(records)
    }

    /// Memory records for one document, written to `<save>/<slug>_<book>.json`
    /// when `save` is given.
    pub fn gather_document_memories<S: AsRef<str>>(
        &self,
        book: BookId,
        aliases: &[S],
        filter: &DensityFilter,
        builder: &MemoryBuilder,
        save: Option<&Path>,
    ) -> Result<Vec<MemoryRecord>> {
        let doc = self.document(book).ok_or_else(|| {
            PensieveError::Configuration(format!("no document with book id {book}"))
        })?;
        let records = self.gather(std::slice::from_ref(doc), aliases, filter, builder);
        if let Some(dir) = save {
            export::save_memories(&records, dir, aliases, Some(book))?;
        }
        Ok(records)
    }

    fn gather<S: AsRef<str>>(
        &self,
        documents: &[Document],
        aliases: &[S],
        filter: &DensityFilter,
        builder: &MemoryBuilder,
    ) -> Vec<MemoryRecord> {
        documents
            .iter()
            .flat_map(|doc| {
                filter
                    .select(std::iter::once(doc), aliases)
                    .into_iter()
                    .map(move |p| builder.build(p, doc.moods(), aliases))
            })
            .collect()
    }
}

/// Regular files of `dir` sorted by file name, optionally limited to extensions.
pub fn discover_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        PensieveError::Configuration(format!(
            "cannot read corpus directory {}: {e}",
            dir.display()
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if hidden {
            continue;
        }
        if !extensions.is_empty() {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)) {
                continue;
            }
        }
        files.push(path);
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// One past the largest used id, or the smallest unused id when that overflows.
fn next_free_id(used: &[BookId]) -> Option<BookId> {
    let max = used.iter().max().copied().unwrap_or(0);
    max.checked_add(1)
        .or_else(|| (1..=BookId::MAX).find(|id| !used.contains(id)))
}

/// Book id from the first run of digits in the file stem, else `ordinal + 1`.
pub fn book_id_for(path: &Path, ordinal: usize) -> BookId {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let digits: String = stem
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits
        .parse()
        .unwrap_or_else(|_| BookId::try_from(ordinal + 1).unwrap_or(BookId::MAX))
}
