// ============================================================
// Layer 3 — Score Range Table and Rescaling
// ============================================================
// Each prompt is scored on its own native scale. The model is
// trained on scores rescaled into [0, 1]:
//
//   forward:  norm = (raw − min) / (max − min)
//   inverse:  raw  = round(norm × (max − min) + min)
//
// One table drives both directions.
//
//   prompt │ min │ max
//   ───────┼─────┼────
//      0   │  1  │  3
//      1   │  2  │ 12
//      2   │  1  │  6
//     3, 4 │  0  │  3
//     5, 6 │  0  │  4
//      7   │  0  │ 30
//      8   │  0  │ 60
//   other  │  1  │  3   (fallback, or RangeError in strict mode)
//
// Rounding is round-half-to-even, the convention of the
// evaluation harness that consumes the integer scores.

use crate::error::{PrepError, PrepResult};

/// Inclusive native score bounds of one prompt. `max > min` always.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn normalize(&self, raw: f64) -> f64 {
        (raw - self.min) / self.span()
    }

    pub fn denormalize(&self, norm: f64) -> f64 {
        (norm * self.span() + self.min).round_ties_even()
    }
}

pub const DEFAULT_RANGE: ScoreRange = ScoreRange::new(1.0, 3.0);

const SCORE_RANGES: [ScoreRange; 9] = [
    ScoreRange::new(1.0, 3.0),
    ScoreRange::new(2.0, 12.0),
    ScoreRange::new(1.0, 6.0),
    ScoreRange::new(0.0, 3.0),
    ScoreRange::new(0.0, 3.0),
    ScoreRange::new(0.0, 4.0),
    ScoreRange::new(0.0, 4.0),
    ScoreRange::new(0.0, 30.0),
    ScoreRange::new(0.0, 60.0),
];

/// Table lookup; `None` for prompt ids the table does not list.
pub fn score_range(prompt_id: i64) -> Option<ScoreRange> {
    usize::try_from(prompt_id).ok().and_then(|i| SCORE_RANGES.get(i)).copied()
}

/// Rescales scores between native and model-friendly scales.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreScaler {
    /// Unlisted prompt ids are an error instead of using DEFAULT_RANGE
    strict: bool,
}

impl ScoreScaler {
    pub fn new() -> Self {
        Self { strict: false }
    }

    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn range(&self, prompt_id: i64) -> PrepResult<ScoreRange> {
        match score_range(prompt_id) {
            Some(range) => Ok(range),
            None if self.strict => Err(PrepError::Range(prompt_id)),
            None => Ok(DEFAULT_RANGE),
        }
    }

    /// Raw scores → [0, 1], each row rescaled with its own prompt's range.
    pub fn to_model_scores(&self, scores: &[f64], prompt_ids: &[i64]) -> PrepResult<Vec<f64>> {
        if scores.len() != prompt_ids.len() {
            return Err(PrepError::Shape(format!(
                "{} scores but {} prompt ids",
                scores.len(),
                prompt_ids.len()
            )));
        }
        scores
            .iter()
            .zip(prompt_ids)
            .map(|(&raw, &pid)| Ok(self.range(pid)?.normalize(raw)))
            .collect()
    }

    /// [0, 1] → rounded native scores, all rows using one prompt's range.
    pub fn to_dataset_scores(&self, scores: &[f64], prompt_id: i64) -> PrepResult<Vec<f64>> {
        let range = self.range(prompt_id)?;
        Ok(scores.iter().map(|&s| range.denormalize(s)).collect())
    }

    /// Element-wise inverse for batches that mix prompts.
    pub fn to_dataset_scores_per_row(
        &self,
        scores:     &[f64],
        prompt_ids: &[i64],
    ) -> PrepResult<Vec<f64>> {
        if scores.len() != prompt_ids.len() {
            return Err(PrepError::Shape(format!(
                "{} scores but {} prompt ids",
                scores.len(),
                prompt_ids.len()
            )));
        }
        scores
            .iter()
            .zip(prompt_ids)
            .map(|(&s, &pid)| Ok(self.range(pid)?.denormalize(s)))
            .collect()
    }
}

/// Integer reference scores as consumed by the evaluation metrics.
pub fn to_reference_scores(scores: &[f64]) -> Vec<i32> {
    scores.iter().map(|&s| s.round_ties_even() as i32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_ranges() {
        assert_eq!(score_range(1), Some(ScoreRange::new(2.0, 12.0)));
        assert_eq!(score_range(2), Some(ScoreRange::new(1.0, 6.0)));
        assert_eq!(score_range(4), Some(ScoreRange::new(0.0, 3.0)));
        assert_eq!(score_range(6), Some(ScoreRange::new(0.0, 4.0)));
        assert_eq!(score_range(8), Some(ScoreRange::new(0.0, 60.0)));
        assert_eq!(score_range(9), None);
        assert_eq!(score_range(-1), None);
    }

    #[test]
    fn test_every_range_is_non_degenerate() {
        for pid in 0..9 {
            let r = score_range(pid).unwrap();
            assert!(r.max > r.min, "prompt {pid}");
        }
    }

    #[test]
    fn test_prompt_seven_example() {
        let scaler = ScoreScaler::new();
        let norm = scaler.to_model_scores(&[15.0], &[7]).unwrap();
        assert_eq!(norm, vec![0.5]);
        let raw = scaler.to_dataset_scores(&norm, 7).unwrap();
        assert_eq!(raw, vec![15.0]);
    }

    #[test]
    fn test_round_trip_over_every_range() {
        let scaler = ScoreScaler::new();
        for pid in 0..9i64 {
            let r = scaler.range(pid).unwrap();
            for raw in (r.min as i64)..=(r.max as i64) {
                let raw = raw as f64;
                let norm = scaler.to_model_scores(&[raw], &[pid]).unwrap();
                let back = scaler.to_dataset_scores(&norm, pid).unwrap();
                assert_eq!(back[0], raw, "prompt {pid}, raw {raw}");
            }
        }
    }

    #[test]
    fn test_forward_uses_each_rows_prompt() {
        let scaler = ScoreScaler::new();
        let norm = scaler.to_model_scores(&[12.0, 3.0, 0.0], &[1, 3, 8]).unwrap();
        assert_eq!(norm, vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_unlisted_prompt_falls_back_to_default() {
        let scaler = ScoreScaler::new();
        assert_eq!(scaler.range(42).unwrap(), DEFAULT_RANGE);
        assert_eq!(scaler.to_model_scores(&[2.0], &[42]).unwrap(), vec![0.5]);
        assert_eq!(scaler.to_dataset_scores(&[0.5], 42).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_prompt_zero_uses_default_bounds() {
        assert_eq!(ScoreScaler::new().range(0).unwrap(), DEFAULT_RANGE);
    }

    #[test]
    fn test_strict_mode_rejects_unlisted_prompt() {
        let scaler = ScoreScaler::strict();
        assert!(matches!(scaler.range(11), Err(PrepError::Range(11))));
        assert!(scaler.to_model_scores(&[1.0], &[11]).is_err());
        assert!(scaler.range(3).is_ok());
    }

    #[test]
    fn test_inverse_rounds_half_to_even() {
        let scaler = ScoreScaler::new();
        // prompt 5: 0.625 × 4 = 2.5 → 2, 0.875 × 4 = 3.5 → 4
        let raw = scaler.to_dataset_scores(&[0.625, 0.875], 5).unwrap();
        assert_eq!(raw, vec![2.0, 4.0]);
    }

    #[test]
    fn test_per_row_inverse() {
        let scaler = ScoreScaler::new();
        let raw = scaler.to_dataset_scores_per_row(&[0.5, 1.0], &[7, 1]).unwrap();
        assert_eq!(raw, vec![15.0, 12.0]);
    }

    #[test]
    fn test_length_mismatch_is_shape_error() {
        let scaler = ScoreScaler::new();
        assert!(matches!(
            scaler.to_model_scores(&[1.0, 2.0], &[1]),
            Err(PrepError::Shape(_))
        ));
    }

    #[test]
    fn test_reference_scores() {
        assert_eq!(to_reference_scores(&[2.0, 3.5, 4.4]), vec![2, 4, 4]);
    }
}
