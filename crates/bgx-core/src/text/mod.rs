//! Text normalization applied between extraction and field rules.

mod clean;
mod paragraphs;

pub use clean::{clean_text, normalize_whitespace};
pub use paragraphs::{split_into_paragraphs, split_sentences, SENTENCES_PER_PARAGRAPH};
