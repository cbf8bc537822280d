// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `build-vocab` and `prepare`,
// and their flags.

use clap::{Args, Subcommand};
use crate::application::prepare_use_case::PrepareConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a vocabulary from a training split and save it as JSON
    BuildVocab(VocabArgs),

    /// Prepare a train/dev/test fold for a scoring model
    Prepare(PrepareArgs),
}

/// Arguments shared by both commands.
#[derive(Args, Debug)]
pub struct CorpusArgs {
    /// Training split (tab-separated, first line is a header for vocab building)
    #[arg(long, default_value = "data/fold_0/train.tsv")]
    pub train: String,

    /// Prompt to select; 0 or below selects every prompt
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub prompt_id: i64,

    /// Vocabulary size including <pad>, <unk> and <num>;
    /// 0 sizes it by the number of tokens seen more than once
    #[arg(long, default_value_t = 4000, allow_negative_numbers = true)]
    pub vocab_size: i64,

    /// Keep the original case of tokens
    #[arg(long)]
    pub keep_case: bool,

    /// Leave URLs in the text instead of replacing them with <url>
    #[arg(long)]
    pub keep_urls: bool,

    /// Directory for vocab.json and other outputs
    #[arg(long, default_value = "prepared")]
    pub output_dir: String,
}

#[derive(Args, Debug)]
pub struct VocabArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Development split
    #[arg(long, default_value = "data/fold_0/dev.tsv")]
    pub dev: String,

    /// Test split
    #[arg(long, default_value = "data/fold_0/test.tsv")]
    pub test: String,

    /// Column holding the score
    #[arg(long, default_value_t = 6)]
    pub score_index: usize,

    /// Maximum tokens per sentence after splitting long sentences
    #[arg(long, default_value_t = 50)]
    pub max_sentlen: usize,

    /// Reuse a saved vocabulary instead of building one
    #[arg(long)]
    pub vocab: Option<String>,

    /// Plain-text embedding file (token v1 ... vd per line)
    #[arg(long)]
    pub embedding: Option<String>,

    /// Match embedding tokens case-sensitively
    #[arg(long)]
    pub embedding_cased: bool,

    /// Seed for vectors of tokens missing from the embedding file
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// File of `prompt_id<TAB>prompt text` lines
    #[arg(long)]
    pub prompt_text: Option<String>,

    /// Fail on prompt ids without a known score range
    #[arg(long)]
    pub strict_scores: bool,
}

impl From<VocabArgs> for PrepareConfig {
    fn from(a: VocabArgs) -> Self {
        PrepareConfig {
            train_path: a.corpus.train,
            prompt_id:  a.corpus.prompt_id,
            vocab_size: a.corpus.vocab_size,
            lowercase:  !a.corpus.keep_case,
            keep_urls:  a.corpus.keep_urls,
            output_dir: a.corpus.output_dir,
            ..PrepareConfig::default()
        }
    }
}

/// The application layer never sees clap types.
impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            train_path:         a.corpus.train,
            dev_path:           a.dev,
            test_path:          a.test,
            prompt_id:          a.corpus.prompt_id,
            vocab_size:         a.corpus.vocab_size,
            lowercase:          !a.corpus.keep_case,
            keep_urls:          a.corpus.keep_urls,
            score_index:        a.score_index,
            max_sentlen:        a.max_sentlen,
            vocab_path:         a.vocab,
            embedding_path:     a.embedding,
            embedding_caseless: !a.embedding_cased,
            embedding_seed:     a.seed,
            prompt_text_path:   a.prompt_text,
            strict_scores:      a.strict_scores,
            output_dir:         a.corpus.output_dir,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_prepare_args_into_config() {
        let cli = Cli::try_parse_from([
            "essay-prep", "prepare",
            "--train", "t.tsv", "--dev", "d.tsv", "--test", "x.tsv",
            "--prompt-id", "7", "--vocab-size", "0", "--keep-case",
            "--max-sentlen", "30", "--embedding", "glove.txt", "--keep-urls",
        ])
        .unwrap();

        let super::Commands::Prepare(args) = cli.command else {
            panic!("expected prepare");
        };
        let cfg: PrepareConfig = args.into();
        assert_eq!(cfg.train_path, "t.tsv");
        assert_eq!(cfg.test_path, "x.tsv");
        assert_eq!(cfg.prompt_id, 7);
        assert_eq!(cfg.vocab_size, 0);
        assert!(!cfg.lowercase);
        assert_eq!(cfg.max_sentlen, 30);
        assert_eq!(cfg.embedding_path.as_deref(), Some("glove.txt"));
        assert!(cfg.embedding_caseless);
        assert!(cfg.keep_urls);
    }

    #[test]
    fn test_build_vocab_defaults() {
        let cli = Cli::try_parse_from(["essay-prep", "build-vocab", "--prompt-id", "-1"]).unwrap();
        let super::Commands::BuildVocab(args) = cli.command else {
            panic!("expected build-vocab");
        };
        let cfg: PrepareConfig = args.into();
        assert_eq!(cfg.prompt_id, -1);
        assert_eq!(cfg.vocab_size, 4000);
        assert!(cfg.lowercase);
        assert!(!cfg.keep_urls);
    }
}
