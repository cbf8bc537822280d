// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses command line arguments with clap and hands off to
// Layer 2 (application). Two commands are supported:
//   1. `build-vocab` — builds and saves a vocabulary
//   2. `prepare`     — prepares a full train/dev/test fold

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PrepareArgs, VocabArgs};

#[derive(Parser, Debug)]
#[command(
    name = "essay-prep",
    version = "0.1.0",
    about = "Tokenise, encode and pad essay corpora for automated essay scoring."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. The CLI only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::BuildVocab(args) => run_build_vocab(args),
            Commands::Prepare(args)    => run_prepare(args),
        }
    }
}

fn run_build_vocab(args: VocabArgs) -> Result<()> {
    use crate::application::vocab_use_case::BuildVocabUseCase;

    tracing::info!("Building vocabulary from: {}", args.corpus.train);
    let use_case = BuildVocabUseCase::new(args.into());
    let vocab    = use_case.execute()?;

    println!(
        "Vocabulary of {} entries saved to {}",
        vocab.len(),
        use_case.vocab_path().display()
    );
    Ok(())
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::PrepareUseCase;

    tracing::info!("Preparing fold from: {}", args.corpus.train);
    let output_dir = args.corpus.output_dir.clone();
    let prepared   = PrepareUseCase::new(args.into()).execute()?;

    println!(
        "Prepared {} / {} / {} essays ({} sentences x {} tokens), outputs in {}",
        prepared.train.num_essays,
        prepared.dev.num_essays,
        prepared.test.num_essays,
        prepared.max_sentnum,
        prepared.max_sentlen,
        output_dir
    );
    Ok(())
}
