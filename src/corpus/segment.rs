//! Paragraph segmentation.
//!
//! Lines are accumulated into a chunk until the chunk holds at least
//! `min_tokens` whitespace-separated tokens. A line that opens with a quotation
//! mark always joins the current chunk so dialogue is not split mid-exchange.
//! Blank lines carry no meaning beyond separating lines.

const QUOTES: &[char] = &['"', '\'', '\u{201c}', '\u{2018}'];

/// Split a document's text into paragraphs.
pub fn segment(text: &str, min_tokens: usize) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut chunk = String::new();
    let mut chunk_tokens = 0usize;

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let tokens = line.split_whitespace().count();
        let continues_dialogue = line.trim_start().starts_with(QUOTES);

        if !chunk.is_empty() && chunk_tokens >= min_tokens && !continues_dialogue {
            paragraphs.push(std::mem::take(&mut chunk));
            chunk_tokens = 0;
        }

        if !chunk.is_empty() {
            chunk.push('\n');
        }
        chunk.push_str(line);
        chunk_tokens += tokens;
    }

    if !chunk.is_empty() {
        paragraphs.push(chunk);
    }

    paragraphs
}
