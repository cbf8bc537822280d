// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Turns one train/dev/test fold into model-ready arrays:
//
//   Step 1: Save the run configuration               (Layer 6 - infra)
//   Step 2: Build or load the vocabulary             (Layer 4 / 6)
//   Step 3: Encode train, dev and test               (Layer 4 - data)
//   Step 4: Pad every split to the overall bounds    (Layer 4 - data)
//   Step 5: Rescale training scores to [0, 1]        (Layer 3 - domain)
//   Step 6: Optional embedding table                 (Layer 6 - infra)
//   Step 7: Optional prompt text encoding            (Layer 4 - data)
//   Step 8: Write stats CSV and the prepared fold    (Layer 6 - infra)
//
// Only training scores are rescaled. Dev and test keep their
// raw scale so evaluation can compare against reference scores
// after the model output is mapped back.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::application::vocab_use_case::create_vocab_with;
use crate::data::{
    encoder::{CorpusEncoder, EncodedCorpus, HitStats},
    loader::{read_prompt_text, TsvCorpus},
    preprocessor::Preprocessor,
    padding::{pad_sentence_sequences, PaddedEssays},
    tokenizer::EssayTokenizer,
    vocab_builder::VocabSize,
};
use crate::domain::score_range::ScoreScaler;
use crate::domain::traits::Persistable;
use crate::domain::vocabulary::Vocabulary;
use crate::infra::{
    embedding::{EmbeddingTable, PretrainedEmbeddings},
    metrics::{SplitStats, StatsLogger},
    vocab_store::VOCAB_FILE,
};

pub const CONFIG_FILE: &str = "prepare_config.json";
pub const FOLD_FILE:   &str = "prepared_fold.json";

// ─── Preparation Configuration ───────────────────────────────────────────────
// Everything one preparation run needs. Saved next to the
// outputs so a prepared fold can be traced back to its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub train_path:         String,
    pub dev_path:           String,
    pub test_path:          String,
    /// Zero or below selects every prompt
    pub prompt_id:          i64,
    /// Zero or below sizes the vocabulary by the tokens seen more than once
    pub vocab_size:         i64,
    pub lowercase:          bool,
    /// Leave URLs in the text instead of replacing them with <url>
    #[serde(default)]
    pub keep_urls:          bool,
    pub score_index:        usize,
    pub max_sentlen:        usize,
    /// Load this vocabulary instead of building one
    pub vocab_path:         Option<String>,
    pub embedding_path:     Option<String>,
    pub embedding_caseless: bool,
    pub embedding_seed:     u64,
    pub prompt_text_path:   Option<String>,
    pub strict_scores:      bool,
    pub output_dir:         String,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            train_path:         "data/fold_0/train.tsv".to_string(),
            dev_path:           "data/fold_0/dev.tsv".to_string(),
            test_path:          "data/fold_0/test.tsv".to_string(),
            prompt_id:          1,
            vocab_size:         4000,
            lowercase:          true,
            keep_urls:          false,
            score_index:        6,
            max_sentlen:        50,
            vocab_path:         None,
            embedding_path:     None,
            embedding_caseless: true,
            embedding_seed:     42,
            prompt_text_path:   None,
            strict_scores:      false,
            output_dir:         "prepared".to_string(),
        }
    }
}

impl PrepareConfig {
    /// Text cleaner shared by the vocabulary, the splits and the prompt.
    pub fn preprocessor(&self) -> Preprocessor {
        if self.keep_urls {
            Preprocessor::keep_urls()
        } else {
            Preprocessor::new()
        }
    }
}

// ─── Fold Data ────────────────────────────────────────────────────────────────
/// Encoded train/dev/test splits sharing one vocabulary.
#[derive(Debug, Clone)]
pub struct FoldData {
    pub vocab:       Vocabulary,
    pub train:       EncodedCorpus,
    pub dev:         EncodedCorpus,
    pub test:        EncodedCorpus,
    /// Maxima over all three splits
    pub max_sentlen: usize,
    pub max_sentnum: usize,
}

/// Padded splits plus everything a scoring model needs to start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedFold {
    pub train:             PaddedEssays,
    pub dev:               PaddedEssays,
    pub test:              PaddedEssays,
    pub vocab_size:        usize,
    pub max_sentnum:       usize,
    pub max_sentlen:       usize,
    /// Mean of the rescaled training scores
    pub scaled_train_mean: f64,
    pub embedding:         Option<EmbeddingTable>,
    pub prompt_indices:    Option<Vec<u32>>,
}

/// Read and encode all three splits of a fold.
pub fn get_data(cfg: &PrepareConfig) -> Result<FoldData> {
    ensure!(cfg.max_sentlen > 0, "max_sentlen must be at least 1");

    let vocab = match &cfg.vocab_path {
        Some(path) => Vocabulary::load(Path::new(path))?,
        None => {
            let corpus = TsvCorpus::with_header(&cfg.train_path);
            create_vocab_with(
                EssayTokenizer::default().with_preprocessor(cfg.preprocessor()),
                &corpus,
                cfg.prompt_id,
                VocabSize::from(cfg.vocab_size),
                cfg.lowercase,
            )
            .with_context(|| format!("Cannot build vocabulary from '{}'", cfg.train_path))?
        }
    };

    let tokenizer = EssayTokenizer::new(cfg.max_sentlen).with_preprocessor(cfg.preprocessor());
    let encoder   = CorpusEncoder::new(&vocab, tokenizer, cfg.lowercase);
    let encode = |split: &str, path: &str| -> Result<EncodedCorpus> {
        tracing::info!("Encoding {} split", split);
        let corpus = encoder
            .encode(&TsvCorpus::dataset(path, cfg.score_index), cfg.prompt_id)
            .with_context(|| format!("Cannot encode {split} split '{path}'"))?;
        tracing::info!(
            "  {}: {} essays, max sentence length {}, max sentence count {}",
            split,
            corpus.essays.len(),
            corpus.max_sentlen,
            corpus.max_sentnum
        );
        Ok(corpus)
    };

    let train = encode("train", &cfg.train_path)?;
    let dev   = encode("dev", &cfg.dev_path)?;
    let test  = encode("test", &cfg.test_path)?;

    let max_sentlen = train.max_sentlen.max(dev.max_sentlen).max(test.max_sentlen);
    let max_sentnum = train.max_sentnum.max(dev.max_sentnum).max(test.max_sentnum);
    tracing::info!(
        "Overall max sentence length {}, max sentence count {}",
        max_sentlen,
        max_sentnum
    );

    Ok(FoldData { vocab, train, dev, test, max_sentlen, max_sentnum })
}

/// Pad all splits to the fold bounds and rescale training scores.
pub fn prepare_sentence_data(cfg: &PrepareConfig, fold: &FoldData) -> Result<PreparedFold> {
    let pad = |split: &str, corpus: &EncodedCorpus| -> Result<PaddedEssays> {
        let padded = pad_sentence_sequences(&corpus.essays, fold.max_sentnum, fold.max_sentlen)
            .with_context(|| format!("Cannot pad {split} split"))?;
        tracing::info!("  {} shape: {:?}", split, padded.shape());
        Ok(padded)
    };

    let train = pad("train", &fold.train)?;
    let dev   = pad("dev", &fold.dev)?;
    let test  = pad("test", &fold.test)?;

    for (split, padded) in [("train", &train), ("dev", &dev), ("test", &test)] {
        tracing::info!(
            "  {} scores: mean {:.4}, std {:.4}",
            split,
            padded.score_mean(),
            padded.score_std()
        );
    }

    let scaler = if cfg.strict_scores { ScoreScaler::strict() } else { ScoreScaler::new() };
    let scaled = scaler.to_model_scores(&train.scores, &train.prompt_ids)?;
    let train  = train.with_scores(scaled)?;
    let scaled_train_mean = train.score_mean();
    tracing::info!(
        "  Rescaled train scores: mean {:.4}, std {:.4}",
        scaled_train_mean,
        train.score_std()
    );

    let embedding = match &cfg.embedding_path {
        Some(path) => {
            let pretrained = PretrainedEmbeddings::load(Path::new(path))?;
            Some(EmbeddingTable::build(
                &fold.vocab,
                &pretrained,
                cfg.embedding_caseless,
                cfg.embedding_seed,
            ))
        }
        None => None,
    };

    Ok(PreparedFold {
        train,
        dev,
        test,
        vocab_size: fold.vocab.len(),
        max_sentnum: fold.max_sentnum,
        max_sentlen: fold.max_sentlen,
        scaled_train_mean,
        embedding,
        prompt_indices: None,
    })
}

/// Index sequence of the prompt text of `prompt_id`.
pub fn encode_prompt_text(
    path:      &Path,
    prompt_id: i64,
    vocab:     &Vocabulary,
    tokenizer: EssayTokenizer,
    lowercase: bool,
) -> Result<Vec<u32>> {
    let text    = read_prompt_text(path, prompt_id)?;
    let encoder = CorpusEncoder::new(vocab, tokenizer, lowercase);
    let mut stats = HitStats::default();
    let indices   = encoder.encode_text(&text, &mut stats);
    tracing::info!(
        "Prompt {} encoded: {} tokens, <unk> hit rate {:.2}%",
        prompt_id,
        indices.len(),
        stats.unk_rate()
    );
    Ok(indices)
}

// ─── PrepareUseCase ───────────────────────────────────────────────────────────
pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<PreparedFold> {
        let cfg = &self.config;
        let out = Path::new(&cfg.output_dir);

        // ── Step 1: Save config ───────────────────────────────────────────────
        fs::create_dir_all(out)
            .with_context(|| format!("Cannot create output dir '{}'", out.display()))?;
        fs::write(out.join(CONFIG_FILE), serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write {CONFIG_FILE}"))?;

        // ── Step 2 + 3: Vocabulary and encoding ───────────────────────────────
        let fold = get_data(cfg)?;
        fold.vocab.save(&out.join(VOCAB_FILE))?;

        // ── Step 4 – 6: Padding, rescaling, embeddings ────────────────────────
        let mut prepared = prepare_sentence_data(cfg, &fold)?;

        // ── Step 7: Prompt text ───────────────────────────────────────────────
        if let Some(path) = &cfg.prompt_text_path {
            prepared.prompt_indices = Some(encode_prompt_text(
                Path::new(path),
                cfg.prompt_id,
                &fold.vocab,
                EssayTokenizer::default().with_preprocessor(cfg.preprocessor()),
                cfg.lowercase,
            )?);
        }

        // ── Step 8: Stats and prepared fold ───────────────────────────────────
        let logger = StatsLogger::new(out)?;
        logger.log(&SplitStats::new("train", &fold.train, &prepared.train))?;
        logger.log(&SplitStats::new("dev", &fold.dev, &prepared.dev))?;
        logger.log(&SplitStats::new("test", &fold.test, &prepared.test))?;

        let fold_path = out.join(FOLD_FILE);
        fs::write(&fold_path, serde_json::to_string(&prepared)?)
            .with_context(|| format!("Cannot write '{}'", fold_path.display()))?;
        tracing::info!("Prepared fold written to '{}'", fold_path.display());

        Ok(prepared)
    }
}
