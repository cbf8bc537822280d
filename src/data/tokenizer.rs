// ============================================================
// Layer 4 — Essay Tokenizer
// ============================================================
// Ties the text pipeline together:
//
//   raw essay
//       │
//       ▼
//   Preprocessor      → <url>, quotes, punctuation runs
//       │
//       ▼
//   word_tokenize     → Treebank tokens
//       │
//       ▼
//   repair_placeholders → "@" "PERSON1" becomes "@PERSON"
//       │
//       ▼
//   split_sentences   → sentence strings (tokens joined by " ")
//       │
//       ▼
//   SentenceChunker   → sentences of at most max_len tokens
//
// The vocabulary path stops before the chunker and flattens
// all sentences into one token stream.

use crate::data::chunker::SentenceChunker;
use crate::data::preprocessor::Preprocessor;
use crate::data::segmenter::split_sentences;
use crate::data::word_tokenizer::word_tokenize;
use crate::error::{PrepError, PrepResult};

/// Marker that opens an anonymised entity tag in the corpus
pub const PLACEHOLDER_MARKER: &str = "@";

/// Granularity of the produced tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenLevel {
    #[default]
    Word,
    /// Not implemented; requesting it fails with UnsupportedMode
    Char,
}

impl TokenLevel {
    pub fn ensure_supported(self) -> PrepResult<()> {
        match self {
            TokenLevel::Word => Ok(()),
            TokenLevel::Char => Err(PrepError::UnsupportedMode(
                "character-level tokenization".to_string(),
            )),
        }
    }
}

/// Merge a standalone "@" with the token after it, dropping the
/// first digit run of that token and everything following it.
pub fn repair_placeholders(tokens: Vec<String>) -> Vec<String> {
    let mut repaired = Vec::with_capacity(tokens.len());
    let mut iter     = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if token == PLACEHOLDER_MARKER {
            if let Some(next) = iter.next() {
                let stem = match next.find(|c: char| c.is_ascii_digit()) {
                    Some(pos) => &next[..pos],
                    None      => next.as_str(),
                };
                repaired.push(format!("{PLACEHOLDER_MARKER}{stem}"));
                continue;
            }
        }
        repaired.push(token);
    }
    repaired
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EssayTokenizer {
    preprocessor: Preprocessor,
    chunker:      SentenceChunker,
}

impl EssayTokenizer {
    pub fn new(max_sentlen: usize) -> Self {
        Self {
            preprocessor: Preprocessor::new(),
            chunker:      SentenceChunker::new(max_sentlen),
        }
    }

    /// Swap the text cleaner, e.g. to keep URLs verbatim.
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn max_sentlen(&self) -> usize {
        self.chunker.max_len()
    }

    /// Word tokens with placeholder repair.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        repair_placeholders(word_tokenize(text))
    }

    /// Cleaned, tokenised text split into sentence strings.
    fn sentence_strings(&self, text: &str) -> Vec<String> {
        let cleaned = self.preprocessor.clean(text);
        let joined  = self.tokenize(&cleaned).join(" ");
        split_sentences(&joined)
    }

    /// Full pipeline: sentences of at most max_sentlen tokens.
    /// Empty input yields no sentences.
    pub fn sentences(&self, text: &str) -> Vec<Vec<String>> {
        self.sentence_strings(text)
            .iter()
            .map(|s| self.tokenize(s.trim()))
            .flat_map(|tokens| self.chunker.shorten(tokens))
            .filter(|sentence| !sentence.is_empty())
            .collect()
    }

    /// Vocabulary path: one flat token stream, no length governing.
    pub fn flat_tokens(&self, text: &str) -> Vec<String> {
        self.sentence_strings(text)
            .iter()
            .flat_map(|s| self.tokenize(s))
            .collect()
    }
}
