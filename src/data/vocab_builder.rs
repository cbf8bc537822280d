// ============================================================
// Layer 4 — Vocabulary Builder
// ============================================================
// Builds a Vocabulary from the essays of a training split.
//
// Steps:
//   1. Tokenise every essay into one flat token stream
//      (no sentence length governing on this path)
//   2. Optionally lowercase every token
//   3. Count frequencies, remembering first-seen order
//   4. Sort by descending frequency; equal counts keep their
//      first-seen order (stable sort)
//   5. Reserve <pad>=0, <unk>=1, <num>=2 and assign the rest
//
// Sizing:
//   VocabSize::Fixed(n) → at most n entries in total
//   VocabSize::Auto     → as many entries as there are tokens seen
//                         more than once, markers included

use std::collections::HashMap;

use crate::data::tokenizer::EssayTokenizer;
use crate::domain::essay::Essay;
use crate::domain::vocabulary::{Vocabulary, RESERVED};

/// Requested vocabulary size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabSize {
    /// Total size equals the number of tokens seen more than once
    /// (never below the reserved markers)
    Auto,
    /// Hard cap on the total number of entries, reserved markers included
    Fixed(usize),
}

impl From<i64> for VocabSize {
    /// Zero or below requests automatic sizing.
    fn from(size: i64) -> Self {
        if size <= 0 {
            VocabSize::Auto
        } else {
            VocabSize::Fixed(size as usize)
        }
    }
}

/// Frequency table that remembers first-seen order.
#[derive(Debug, Default)]
pub struct TokenCounter {
    slots:  HashMap<String, usize>,
    counts: Vec<(String, usize)>,
    total:  usize,
}

impl TokenCounter {
    pub fn add(&mut self, token: String) {
        self.total += 1;
        match self.slots.get(&token) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.slots.insert(token.clone(), self.counts.len());
                self.counts.push((token, 1));
            }
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn unique(&self) -> usize {
        self.counts.len()
    }

    /// (token, count) by descending count, ties in first-seen order.
    pub fn into_sorted(self) -> Vec<(String, usize)> {
        let mut counts = self.counts;
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VocabBuilder {
    tokenizer: EssayTokenizer,
    size:      VocabSize,
    lowercase: bool,
}

impl VocabBuilder {
    pub fn new(tokenizer: EssayTokenizer, size: VocabSize, lowercase: bool) -> Self {
        Self { tokenizer, size, lowercase }
    }

    /// Count tokens over `essays` and assign indices.
    pub fn build<'a>(&self, essays: impl IntoIterator<Item = &'a Essay>) -> Vocabulary {
        let mut counter = TokenCounter::default();
        for essay in essays {
            for token in self.tokenizer.flat_tokens(&essay.text) {
                let token = if self.lowercase { token.to_lowercase() } else { token };
                counter.add(token);
            }
        }
        tracing::info!(
            "  {} total words, {} unique words",
            counter.total(),
            counter.unique()
        );

        let sorted = counter.into_sorted();
        let keep = match self.size {
            VocabSize::Auto => sorted
                .iter()
                .filter(|(_, count)| *count > 1)
                .count()
                .saturating_sub(RESERVED),
            VocabSize::Fixed(n) => n.saturating_sub(RESERVED),
        };

        let mut vocab = Vocabulary::new();
        for (token, _) in sorted.into_iter().take(keep) {
            vocab.insert(&token);
        }
        tracing::info!("  Vocab size: {}", vocab.len());
        vocab
    }
}
