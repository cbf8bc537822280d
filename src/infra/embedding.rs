// ============================================================
// Layer 6 — Pretrained Embeddings
// ============================================================
// Loads a plain-text embedding file and lays it out as a
// |V| × d table ordered by vocabulary index.
//
// File format, one vector per line:
//   token v1 v2 ... vd
// An optional word2vec header line ("<count> <dim>") is skipped.
// Blank lines are ignored.
//
// Table rows:
//   row 0 (<pad>)       → all zeros
//   token in the file   → its pretrained vector
//   anything else       → uniform random in [-√(3/d), √(3/d)]
//
// The fallback vectors come from a seeded StdRng, so the same
// seed, vocabulary and file always produce the same table.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::domain::vocabulary::{Vocabulary, PAD_INDEX};
use crate::error::{PrepError, PrepResult};

/// Token → vector map read from disk.
#[derive(Debug, Clone)]
pub struct PretrainedEmbeddings {
    dim:     usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl PretrainedEmbeddings {
    pub fn load(path: &Path) -> PrepResult<Self> {
        tracing::info!("Loading embeddings from: {}", path.display());
        let text = fs::read_to_string(path).map_err(|e| PrepError::load(path, e.to_string()))?;

        let mut dim     = None;
        let mut vectors = HashMap::new();

        for (i, line) in text.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if i == 0 && is_word2vec_header(&fields) {
                continue;
            }

            let values = fields[1..]
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|e| PrepError::load(path, format!("line {}: {e}", i + 1)))?;

            match dim {
                None if values.is_empty() => {
                    return Err(PrepError::load(path, format!("line {}: no vector values", i + 1)));
                }
                None => dim = Some(values.len()),
                Some(d) if d != values.len() => {
                    return Err(PrepError::load(
                        path,
                        format!("line {}: expected {d} values, found {}", i + 1, values.len()),
                    ));
                }
                Some(_) => {}
            }
            vectors.insert(fields[0].to_string(), values);
        }

        let dim = dim.ok_or_else(|| PrepError::load(path, "no embedding vectors"))?;
        tracing::info!("  {} vectors of dimension {}", vectors.len(), dim);
        Ok(Self { dim, vectors })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, token: &str) -> Option<&[f32]> {
        self.vectors.get(token).map(Vec::as_slice)
    }
}

fn is_word2vec_header(fields: &[&str]) -> bool {
    fields.len() == 2 && fields.iter().all(|f| f.parse::<usize>().is_ok())
}

/// Embedding matrix in vocabulary order, flat row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingTable {
    pub vocab_size: usize,
    pub dim:        usize,
    pub values:     Vec<f32>,
    /// Vocabulary entries without a pretrained vector
    pub oov:        usize,
}

impl EmbeddingTable {
    pub fn row(&self, idx: u32) -> &[f32] {
        let start = idx as usize * self.dim;
        &self.values[start..start + self.dim]
    }

    pub fn oov_ratio(&self) -> f64 {
        if self.vocab_size == 0 {
            0.0
        } else {
            self.oov as f64 / self.vocab_size as f64
        }
    }

    /// Build the table for `vocab`. With `caseless`, lookups use
    /// the lowercased token.
    pub fn build(
        vocab:      &Vocabulary,
        pretrained: &PretrainedEmbeddings,
        caseless:   bool,
        seed:       u64,
    ) -> Self {
        let dim   = pretrained.dim();
        let scale = (3.0 / dim as f32).sqrt();
        let mut rng    = StdRng::seed_from_u64(seed);
        let mut values = Vec::with_capacity(vocab.len() * dim);
        let mut oov    = 0;

        for (token, idx) in vocab.iter() {
            if idx == PAD_INDEX {
                values.extend(std::iter::repeat(0.0).take(dim));
                continue;
            }
            let key = if caseless { token.to_lowercase() } else { token.to_string() };
            match pretrained.get(&key) {
                Some(vector) => values.extend_from_slice(vector),
                None => {
                    oov += 1;
                    values.extend((0..dim).map(|_| rng.gen_range(-scale..=scale)));
                }
            }
        }

        let table = Self { vocab_size: vocab.len(), dim, values, oov };
        tracing::info!(
            "  Embedding table {} x {}, OOV: {} ({:.2}%)",
            table.vocab_size,
            table.dim,
            table.oov,
            100.0 * table.oov_ratio()
        );
        table
    }
}
