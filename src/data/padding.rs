// ============================================================
// Layer 4 — Padding / Masking Assembler
// ============================================================
// Converts variable-shaped essays into one fixed-shape block:
//
//   indices: [num_essays, max_sentnum, max_sentlen]   (u32)
//   mask:    [num_essays, max_sentnum, max_sentlen]   (1 = real, 0 = pad)
//   scores:  [num_essays]
//   prompts: [num_essays]
//
// Padding is always appended after the content (post-padding):
// missing sentences become all-zero rows at the end of an
// essay, short sentences get zero indices at the end.
//
// Nothing is ever truncated. Content larger than the bounds
// is a caller error reported as PrepError::Shape.
//
// Storage is flat and row-major, so the element (e, s, t) lives
// at ((e * max_sentnum) + s) * max_sentlen + t.

use serde::{Deserialize, Serialize};

use crate::domain::essay::EncodedEssay;
use crate::domain::vocabulary::PAD_INDEX;
use crate::error::{PrepError, PrepResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddedEssays {
    pub num_essays:  usize,
    pub max_sentnum: usize,
    pub max_sentlen: usize,
    pub indices:     Vec<u32>,
    pub mask:        Vec<u32>,
    pub scores:      Vec<f64>,
    pub prompt_ids:  Vec<i64>,
}

impl PaddedEssays {
    pub fn shape(&self) -> [usize; 3] {
        [self.num_essays, self.max_sentnum, self.max_sentlen]
    }

    /// Flat index/mask block of one essay
    pub fn essay_block(&self, e: usize) -> (&[u32], &[u32]) {
        let block = self.max_sentnum * self.max_sentlen;
        let range = e * block..(e + 1) * block;
        (&self.indices[range.clone()], &self.mask[range])
    }

    /// Replace the score column, e.g. with rescaled scores.
    pub fn with_scores(mut self, scores: Vec<f64>) -> PrepResult<Self> {
        if scores.len() != self.num_essays {
            return Err(PrepError::Shape(format!(
                "{} scores for {} essays",
                scores.len(),
                self.num_essays
            )));
        }
        self.scores = scores;
        Ok(self)
    }

    pub fn score_mean(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }

    /// Population standard deviation of the scores
    pub fn score_std(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let mean = self.score_mean();
        let var = self.scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>()
            / self.scores.len() as f64;
        var.sqrt()
    }
}

/// Pad `essays` to `max_sentnum` sentences of `max_sentlen` tokens.
pub fn pad_sentence_sequences(
    essays:      &[EncodedEssay],
    max_sentnum: usize,
    max_sentlen: usize,
) -> PrepResult<PaddedEssays> {
    let total = essays.len() * max_sentnum * max_sentlen;
    let mut indices = vec![PAD_INDEX; total];
    let mut mask    = vec![0u32; total];

    for (e, essay) in essays.iter().enumerate() {
        if essay.sentences.len() > max_sentnum {
            return Err(PrepError::Shape(format!(
                "essay {} has {} sentences, bound is {max_sentnum}",
                essay.id,
                essay.sentences.len()
            )));
        }
        for (s, sentence) in essay.sentences.iter().enumerate() {
            if sentence.len() > max_sentlen {
                return Err(PrepError::Shape(format!(
                    "essay {} sentence {s} has {} tokens, bound is {max_sentlen}",
                    essay.id,
                    sentence.len()
                )));
            }
            let start = (e * max_sentnum + s) * max_sentlen;
            indices[start..start + sentence.len()].copy_from_slice(sentence);
            mask[start..start + sentence.len()].fill(1);
        }
    }

    Ok(PaddedEssays {
        num_essays: essays.len(),
        max_sentnum,
        max_sentlen,
        indices,
        mask,
        scores:     essays.iter().map(|e| e.score).collect(),
        prompt_ids: essays.iter().map(|e| e.prompt_id).collect(),
    })
}
