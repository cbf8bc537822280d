// ============================================================
// Layer 4 — Essay Batcher
// ============================================================
// Implements Burn's Batcher trait to stack EssaySamples into
// tensors for a downstream scoring model.
//
//   Input:  Vec of N EssaySamples, each max_sentnum × max_sentlen
//   Output: EssayBatch with tensors of shape [N, max_sentnum, max_sentlen]
//
// Samples come out of the padding step with identical shapes,
// so the flat index rows are concatenated and reshaped:
//   [e1_s1_t1, ..., e1_sS_tT, e2_s1_t1, ..., eN_sS_tT] → [N, S, T]

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::EssaySample;

// ─── EssayBatch ───────────────────────────────────────────────────────────────
/// A batch of padded essays. All tensors have batch_size as
/// their first dimension.
#[derive(Debug, Clone)]
pub struct EssayBatch<B: Backend> {
    /// Vocabulary indices — shape: [batch_size, max_sentnum, max_sentlen]
    pub indices: Tensor<B, 3, Int>,

    /// 1 = real token, 0 = padding; same shape as indices
    pub mask: Tensor<B, 3, Int>,

    /// Scores in model space — shape: [batch_size]
    pub scores: Tensor<B, 1>,

    /// Prompt of each essay — shape: [batch_size]
    pub prompt_ids: Tensor<B, 1, Int>,
}

// ─── EssayBatcher ─────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct EssayBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> EssayBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<EssaySample, EssayBatch<B>> for EssayBatcher<B> {
    fn batch(&self, items: Vec<EssaySample>) -> EssayBatch<B> {
        let batch_size = items.len();
        let (sentnum, sentlen) = items
            .first()
            .map(|s| (s.max_sentnum, s.max_sentlen))
            .unwrap_or((0, 0));

        // ── Flatten indices and mask ──────────────────────────────────────────
        let index_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.indices.iter().map(|&x| x as i32))
            .collect();

        let mask_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.mask.iter().map(|&x| x as i32))
            .collect();

        let scores:  Vec<f32> = items.iter().map(|s| s.score).collect();
        let prompts: Vec<i32> = items.iter().map(|s| s.prompt_id as i32).collect();

        // ── Create tensors ────────────────────────────────────────────────────
        let indices = Tensor::<B, 1, Int>::from_ints(
            index_flat.as_slice(), &self.device
        ).reshape([batch_size, sentnum, sentlen]);

        let mask = Tensor::<B, 1, Int>::from_ints(
            mask_flat.as_slice(), &self.device
        ).reshape([batch_size, sentnum, sentlen]);

        let scores = Tensor::<B, 1>::from_floats(scores.as_slice(), &self.device);

        let prompt_ids = Tensor::<B, 1, Int>::from_ints(
            prompts.as_slice(), &self.device
        );

        EssayBatch { indices, mask, scores, prompt_ids }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::data::dataset::Dataset;

    use crate::data::dataset::EssayDataset;
    use crate::data::padding::pad_sentence_sequences;
    use crate::domain::essay::EncodedEssay;

    type TestBackend = NdArray;

    fn samples() -> Vec<EssaySample> {
        let essays = vec![
            EncodedEssay { id: 1, prompt_id: 1, sentences: vec![vec![3, 4, 5]], score: 0.25 },
            EncodedEssay { id: 2, prompt_id: 2, sentences: vec![vec![6], vec![7, 8]], score: 0.75 },
        ];
        let padded = pad_sentence_sequences(&essays, 2, 3).unwrap();
        let ds = EssayDataset::from_padded(&padded);
        (0..ds.len()).filter_map(|i| ds.get(i)).collect()
    }

    #[test]
    fn test_batch_shapes() {
        let device  = Default::default();
        let batcher = EssayBatcher::<TestBackend>::new(device);
        let batch   = batcher.batch(samples());

        assert_eq!(batch.indices.dims(), [2, 2, 3]);
        assert_eq!(batch.mask.dims(), [2, 2, 3]);
        assert_eq!(batch.scores.dims(), [2]);
        assert_eq!(batch.prompt_ids.dims(), [2]);
    }

    #[test]
    fn test_batch_values() {
        let device  = Default::default();
        let batcher = EssayBatcher::<TestBackend>::new(device);
        let batch   = batcher.batch(samples());

        let real_tokens = batch.mask.sum().into_scalar().elem::<i64>();
        assert_eq!(real_tokens, 6);

        let index_sum = batch.indices.sum().into_scalar().elem::<i64>();
        assert_eq!(index_sum, 3 + 4 + 5 + 6 + 7 + 8);

        let prompt_sum = batch.prompt_ids.sum().into_scalar().elem::<i64>();
        assert_eq!(prompt_sum, 3);
    }
}
