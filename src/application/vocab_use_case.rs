// ============================================================
// Layer 2 — BuildVocabUseCase
// ============================================================
// Builds the vocabulary of a training split and saves it:
//
//   Step 1: Read the training file, header skipped  (Layer 4 - data)
//   Step 2: Count tokens and assign indices         (Layer 4 - data)
//   Step 3: Save vocab.json to the output dir       (Layer 6 - infra)

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::application::prepare_use_case::PrepareConfig;
use crate::data::{
    loader::TsvCorpus,
    tokenizer::EssayTokenizer,
    vocab_builder::{VocabBuilder, VocabSize},
};
use crate::domain::traits::{EssaySource, Persistable};
use crate::domain::vocabulary::Vocabulary;
use crate::error::PrepResult;
use crate::infra::vocab_store::VOCAB_FILE;

/// Vocabulary of the essays of `source` that pass `prompt_filter`.
pub fn create_vocab(
    source:        &impl EssaySource,
    prompt_filter: i64,
    size:          VocabSize,
    lowercase:     bool,
) -> PrepResult<Vocabulary> {
    create_vocab_with(EssayTokenizer::default(), source, prompt_filter, size, lowercase)
}

/// `create_vocab` with a caller-chosen tokenizer.
pub fn create_vocab_with(
    tokenizer:     EssayTokenizer,
    source:        &impl EssaySource,
    prompt_filter: i64,
    size:          VocabSize,
    lowercase:     bool,
) -> PrepResult<Vocabulary> {
    let essays = source.essays(prompt_filter)?;
    tracing::info!("Creating vocabulary from {} essays", essays.len());
    Ok(VocabBuilder::new(tokenizer, size, lowercase).build(&essays))
}

pub struct BuildVocabUseCase {
    config: PrepareConfig,
}

impl BuildVocabUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    pub fn vocab_path(&self) -> PathBuf {
        Path::new(&self.config.output_dir).join(VOCAB_FILE)
    }

    /// Build the vocabulary, save it and return it.
    pub fn execute(&self) -> Result<Vocabulary> {
        let cfg = &self.config;

        // ── Step 1 + 2: Read and count ────────────────────────────────────────
        let corpus = TsvCorpus::with_header(&cfg.train_path);
        let vocab  = create_vocab_with(
            EssayTokenizer::default().with_preprocessor(cfg.preprocessor()),
            &corpus,
            cfg.prompt_id,
            VocabSize::from(cfg.vocab_size),
            cfg.lowercase,
        )
        .with_context(|| format!("Cannot build vocabulary from '{}'", cfg.train_path))?;

        // ── Step 3: Persist ───────────────────────────────────────────────────
        let path = self.vocab_path();
        vocab
            .save(&path)
            .with_context(|| format!("Cannot save vocabulary to '{}'", path.display()))?;

        Ok(vocab)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::temp_corpus;
    use crate::data::preprocessor::Preprocessor;

    const BODY: &str = "essay_id\tessay_set\tessay\tr1\tr2\tr3\tscore\n\
                        1\t1\tThe cat sat. The cat ran.\t0\t0\t0\t3\n\
                        2\t2\tA dog dog dog.\t0\t0\t0\t2\n";

    #[test]
    fn test_create_vocab_respects_prompt_filter() {
        let path   = temp_corpus("vocab_train.tsv", BODY.as_bytes());
        let corpus = TsvCorpus::with_header(&path);

        let only_one = create_vocab(&corpus, 1, VocabSize::Fixed(5), true).unwrap();
        assert!(only_one.contains("cat"));
        assert!(!only_one.contains("dog"));

        let all = create_vocab(&corpus, 0, VocabSize::Fixed(5), true).unwrap();
        assert!(all.contains("dog"));
    }

    #[test]
    fn test_create_vocab_auto_size() {
        let path   = temp_corpus("vocab_auto.tsv", BODY.as_bytes());
        let corpus = TsvCorpus::with_header(&path);

        // the, cat, "." and dog repeat: four entries, one of them a word
        let all = create_vocab(&corpus, 0, VocabSize::Auto, true).unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.contains("."));
    }

    #[test]
    fn test_keep_urls_reaches_the_vocabulary() {
        let body = "essay_id\tessay_set\tessay\tr1\tr2\tr3\tscore\n\
                    1\t1\tSee example.com and example.com\t0\t0\t0\t3\n";
        let path   = temp_corpus("vocab_urls.tsv", body.as_bytes());
        let corpus = TsvCorpus::with_header(&path);

        let replaced = create_vocab(&corpus, 1, VocabSize::Fixed(10), true).unwrap();
        assert!(replaced.contains("<url>"));
        assert!(!replaced.contains("example.com"));

        let kept = create_vocab_with(
            EssayTokenizer::default().with_preprocessor(Preprocessor::keep_urls()),
            &corpus,
            1,
            VocabSize::Fixed(10),
            true,
        )
        .unwrap();
        assert!(kept.contains("example.com"));
        assert!(!kept.contains("<url>"));
    }

    #[test]
    fn test_execute_saves_vocab() {
        let path = temp_corpus("vocab_exec.tsv", BODY.as_bytes());
        let out  = path.parent().unwrap().join("out");
        let config = PrepareConfig {
            train_path: path.display().to_string(),
            output_dir: out.display().to_string(),
            prompt_id:  0,
            vocab_size: 0,
            ..PrepareConfig::default()
        };
        let use_case = BuildVocabUseCase::new(config);
        let built    = use_case.execute().unwrap();

        let loaded = Vocabulary::load(&use_case.vocab_path()).unwrap();
        assert_eq!(loaded, built);
    }
}
