// ============================================================
// Layer 4 — Corpus Encoder
// ============================================================
// Turns essays into sentences of vocabulary indices.
//
// Token → index, in priority order:
//   1. numeric literal  (^[+-]?[0-9]+\.?[0-9]*$) → <num>
//   2. known token                               → its index
//   3. anything else                             → <unk>
//
// While encoding, the encoder tracks the longest sentence and
// the largest sentence count over the whole corpus; these are
// the padding bounds used downstream. Numeric and unknown hit
// rates are logged as diagnostics only.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::data::tokenizer::{EssayTokenizer, TokenLevel};
use crate::domain::essay::{EncodedEssay, Essay};
use crate::domain::traits::EssaySource;
use crate::domain::vocabulary::{Vocabulary, NUM_INDEX, UNK_INDEX};
use crate::error::PrepResult;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+\.?[0-9]*$").expect("number pattern"));

pub fn is_number(token: &str) -> bool {
    NUMBER.is_match(token)
}

/// Token lookup counters for one encoded corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HitStats {
    pub total:   usize,
    pub num_hit: usize,
    pub unk_hit: usize,
}

impl HitStats {
    fn rate(hits: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            100.0 * hits as f64 / total as f64
        }
    }

    /// Percentage of tokens mapped to <num>
    pub fn num_rate(&self) -> f64 {
        Self::rate(self.num_hit, self.total)
    }

    /// Percentage of tokens mapped to <unk>
    pub fn unk_rate(&self) -> f64 {
        Self::rate(self.unk_hit, self.total)
    }
}

/// One encoded split plus its shape bounds.
#[derive(Debug, Clone, Default)]
pub struct EncodedCorpus {
    pub essays:      Vec<EncodedEssay>,
    pub max_sentlen: usize,
    pub max_sentnum: usize,
    pub stats:       HitStats,
}

impl EncodedCorpus {
    pub fn scores(&self) -> Vec<f64> {
        self.essays.iter().map(|e| e.score).collect()
    }

    pub fn prompt_ids(&self) -> Vec<i64> {
        self.essays.iter().map(|e| e.prompt_id).collect()
    }
}

pub struct CorpusEncoder<'v> {
    vocab:     &'v Vocabulary,
    tokenizer: EssayTokenizer,
    lowercase: bool,
    level:     TokenLevel,
}

impl<'v> CorpusEncoder<'v> {
    pub fn new(vocab: &'v Vocabulary, tokenizer: EssayTokenizer, lowercase: bool) -> Self {
        Self { vocab, tokenizer, lowercase, level: TokenLevel::Word }
    }

    pub fn with_level(mut self, level: TokenLevel) -> Self {
        self.level = level;
        self
    }

    /// Index of a single (already case-folded) token.
    pub fn index_of(&self, token: &str, stats: &mut HitStats) -> u32 {
        stats.total += 1;
        if is_number(token) {
            stats.num_hit += 1;
            NUM_INDEX
        } else if let Some(idx) = self.vocab.get(token) {
            idx
        } else {
            stats.unk_hit += 1;
            UNK_INDEX
        }
    }

    fn fold(&self, token: String) -> String {
        if self.lowercase {
            token.to_lowercase()
        } else {
            token
        }
    }

    pub fn encode_essay(&self, essay: &Essay, stats: &mut HitStats) -> EncodedEssay {
        let sentences = self
            .tokenizer
            .sentences(&essay.text)
            .into_iter()
            .map(|sentence| {
                sentence
                    .into_iter()
                    .map(|token| self.index_of(&self.fold(token), stats))
                    .collect()
            })
            .collect();

        EncodedEssay {
            id:        essay.id,
            prompt_id: essay.prompt_id,
            sentences,
            score:     essay.score,
        }
    }

    /// Flat index sequence of a free text, e.g. a prompt.
    pub fn encode_text(&self, text: &str, stats: &mut HitStats) -> Vec<u32> {
        self.tokenizer
            .flat_tokens(text)
            .into_iter()
            .map(|token| self.index_of(&self.fold(token), stats))
            .collect()
    }

    /// Encode every essay of `source` that passes `prompt_filter`.
    pub fn encode(&self, source: &impl EssaySource, prompt_filter: i64) -> PrepResult<EncodedCorpus> {
        self.level.ensure_supported()?;

        let mut corpus = EncodedCorpus::default();
        for essay in source.essays(prompt_filter)? {
            let encoded = self.encode_essay(&essay, &mut corpus.stats);
            corpus.max_sentlen = corpus.max_sentlen.max(encoded.longest_sentence());
            corpus.max_sentnum = corpus.max_sentnum.max(encoded.sentence_count());
            corpus.essays.push(encoded);
        }

        tracing::info!(
            "  <num> hit rate: {:.2}%, <unk> hit rate: {:.2}%",
            corpus.stats.num_rate(),
            corpus.stats.unk_rate()
        );
        Ok(corpus)
    }
}
