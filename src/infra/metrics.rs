// ============================================================
// Layer 6 — Preparation Statistics Logger
// ============================================================
// Records one CSV row per prepared split.
//
// Columns:
//   - split:        train / dev / test
//   - essays:       number of essays read
//   - max_sentnum:  largest sentence count in the split
//   - max_sentlen:  longest sentence in the split
//   - num_hit_rate: % of tokens mapped to <num>
//   - unk_hit_rate: % of tokens mapped to <unk>
//   - score_mean:   mean score after any rescaling
//   - score_std:    population std of those scores
//
// Output file: <output_dir>/prep_stats.csv
//
// Example:
//   split,essays,max_sentnum,max_sentlen,num_hit_rate,unk_hit_rate,score_mean,score_std
//   train,1070,71,50,0.812000,2.104000,0.572300,0.213900
//
// The header is written once; later runs append.

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

use crate::data::encoder::EncodedCorpus;
use crate::data::padding::PaddedEssays;

pub const STATS_FILE: &str = "prep_stats.csv";
const HEADER: &str = "split,essays,max_sentnum,max_sentlen,num_hit_rate,unk_hit_rate,score_mean,score_std";

/// One row of the statistics file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitStats {
    pub split:        String,
    pub essays:       usize,
    pub max_sentnum:  usize,
    pub max_sentlen:  usize,
    pub num_hit_rate: f64,
    pub unk_hit_rate: f64,
    pub score_mean:   f64,
    pub score_std:    f64,
}

impl SplitStats {
    /// Bounds and hit rates from the encoded split, scores from
    /// its padded (and possibly rescaled) form.
    pub fn new(split: &str, corpus: &EncodedCorpus, padded: &PaddedEssays) -> Self {
        Self {
            split:        split.to_string(),
            essays:       corpus.essays.len(),
            max_sentnum:  corpus.max_sentnum,
            max_sentlen:  corpus.max_sentlen,
            num_hit_rate: corpus.stats.num_rate(),
            unk_hit_rate: corpus.stats.unk_rate(),
            score_mean:   padded.score_mean(),
            score_std:    padded.score_std(),
        }
    }

    fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{:.6},{:.6},{:.6},{:.6}",
            self.split,
            self.essays,
            self.max_sentnum,
            self.max_sentlen,
            self.num_hit_rate,
            self.unk_hit_rate,
            self.score_mean,
            self.score_std,
        )
    }
}

pub struct StatsLogger {
    csv_path: PathBuf,
}

impl StatsLogger {
    /// Create the output directory and the CSV header if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join(STATS_FILE);
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created stats CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, stats: &SplitStats) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;
        writeln!(f, "{}", stats.csv_row())?;

        tracing::debug!(
            "Logged {} stats: {} essays, {}x{}",
            stats.split,
            stats.essays,
            stats.max_sentnum,
            stats.max_sentlen,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::temp_corpus;

    fn stats(split: &str) -> SplitStats {
        SplitStats {
            split:        split.to_string(),
            essays:       3,
            max_sentnum:  4,
            max_sentlen:  12,
            num_hit_rate: 1.5,
            unk_hit_rate: 10.0,
            score_mean:   0.5,
            score_std:    0.25,
        }
    }

    #[test]
    fn test_csv_row_format() {
        assert_eq!(
            stats("dev").csv_row(),
            "dev,3,4,12,1.500000,10.000000,0.500000,0.250000"
        );
    }

    #[test]
    fn test_header_written_once_then_appends() {
        let dir = temp_corpus("placeholder", b"").parent().unwrap().join("out");
        let logger = StatsLogger::new(&dir).unwrap();
        logger.log(&stats("train")).unwrap();
        let again = StatsLogger::new(&dir).unwrap();
        again.log(&stats("test")).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("train,"));
        assert!(lines[2].starts_with("test,"));
    }
}
