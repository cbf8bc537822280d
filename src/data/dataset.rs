use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::padding::PaddedEssays;

/// One padded essay, flattened row-major to max_sentnum × max_sentlen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssaySample {
    pub indices:     Vec<u32>,
    pub mask:        Vec<u32>,
    pub max_sentnum: usize,
    pub max_sentlen: usize,
    pub score:       f32,
    pub prompt_id:   i64,
}

pub struct EssayDataset {
    samples: Vec<EssaySample>,
}

impl EssayDataset {
    pub fn new(samples: Vec<EssaySample>) -> Self { Self { samples } }

    /// Split a padded block into per-essay samples.
    pub fn from_padded(padded: &PaddedEssays) -> Self {
        let samples = (0..padded.num_essays)
            .map(|e| {
                let (indices, mask) = padded.essay_block(e);
                EssaySample {
                    indices:     indices.to_vec(),
                    mask:        mask.to_vec(),
                    max_sentnum: padded.max_sentnum,
                    max_sentlen: padded.max_sentlen,
                    score:       padded.scores[e] as f32,
                    prompt_id:   padded.prompt_ids[e],
                }
            })
            .collect();
        Self { samples }
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<EssaySample> for EssayDataset {
    fn get(&self, index: usize) -> Option<EssaySample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::padding::pad_sentence_sequences;
    use crate::domain::essay::EncodedEssay;

    impl EssaySample {
        fn token_count(&self) -> usize {
            self.mask.iter().filter(|&&m| m == 1).count()
        }

        fn sentence(&self, s: usize) -> &[u32] {
            &self.indices[s * self.max_sentlen..(s + 1) * self.max_sentlen]
        }
    }

    fn padded() -> PaddedEssays {
        let essays = vec![
            EncodedEssay { id: 1, prompt_id: 3, sentences: vec![vec![4, 5], vec![6]], score: 0.5 },
            EncodedEssay { id: 2, prompt_id: 3, sentences: vec![vec![7]], score: 1.0 },
        ];
        pad_sentence_sequences(&essays, 2, 3).unwrap()
    }

    #[test]
    fn test_from_padded() {
        let ds = EssayDataset::from_padded(&padded());
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.sample_count(), 2);

        let first = ds.get(0).unwrap();
        assert_eq!(first.indices, vec![4, 5, 0, 6, 0, 0]);
        assert_eq!(first.mask, vec![1, 1, 0, 1, 0, 0]);
        assert_eq!(first.sentence(1), &[6, 0, 0]);
        assert_eq!(first.token_count(), 3);
        assert_eq!(first.score, 0.5);
        assert_eq!(first.prompt_id, 3);
    }

    #[test]
    fn test_out_of_range_is_none() {
        assert!(EssayDataset::from_padded(&padded()).get(2).is_none());
    }
}
