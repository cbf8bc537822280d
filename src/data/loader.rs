// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads ASAP-style tab-separated essay files.
//
// Columns (0-indexed):
//   [0] essay id          integer
//   [1] essay set/prompt  integer
//   [2] essay text
//   [score_index] score   float (column 6 by default)
//
// The vocabulary reader skips the first (header) line; the
// dataset reader does not, so dataset files must carry no
// header. A header line given to the dataset reader fails
// like any other malformed line.
//
// Every line is decoded and parsed strictly. The first bad
// line aborts the read with the file name and line number:
//   - invalid UTF-8               → PrepError::Decode
//   - too few columns             → PrepError::Format
//   - non-integer id / prompt id  → PrepError::Format
//   - non-numeric score           → PrepError::Format

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::essay::Essay;
use crate::domain::traits::EssaySource;
use crate::error::{PrepError, PrepResult};

/// Default score column of the ASAP training files
pub const DEFAULT_SCORE_INDEX: usize = 6;

/// A tab-separated essay corpus on disk.
#[derive(Debug, Clone)]
pub struct TsvCorpus {
    path:        PathBuf,
    skip_header: bool,
    score_index: usize,
}

impl TsvCorpus {
    /// Reader for dataset splits: no header skip.
    pub fn dataset(path: impl Into<PathBuf>, score_index: usize) -> Self {
        Self { path: path.into(), skip_header: false, score_index }
    }

    /// Reader for vocabulary construction: header skipped, score in column 6.
    pub fn with_header(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), skip_header: true, score_index: DEFAULT_SCORE_INDEX }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse_line(&self, line: &str, line_no: usize) -> PrepResult<Essay> {
        let fields: Vec<&str> = line.trim().split('\t').collect();
        let needed = self.score_index.max(2) + 1;
        if fields.len() < needed {
            return Err(PrepError::format(
                &self.path,
                line_no,
                format!("expected at least {needed} columns, found {}", fields.len()),
            ));
        }

        let int_field = |col: usize, name: &str| -> PrepResult<i64> {
            fields[col].trim().parse::<i64>().map_err(|_| {
                PrepError::format(
                    &self.path,
                    line_no,
                    format!("{name} '{}' is not an integer", fields[col]),
                )
            })
        };

        let id        = int_field(0, "essay id")?;
        let prompt_id = int_field(1, "prompt id")?;
        let score_raw = fields[self.score_index].trim();
        let score     = score_raw.parse::<f64>().map_err(|_| {
            PrepError::format(&self.path, line_no, format!("score '{score_raw}' is not a number"))
        })?;

        Ok(Essay::new(id, prompt_id, fields[2].trim(), score))
    }
}

impl EssaySource for TsvCorpus {
    fn essays(&self, prompt_filter: i64) -> PrepResult<Vec<Essay>> {
        tracing::info!("Reading tsv from: {}", self.path.display());
        let bytes = fs::read(&self.path)?;

        // A final newline does not open an extra empty line
        let body = bytes.strip_suffix(b"\n").unwrap_or(&bytes[..]);
        if body.is_empty() && !self.skip_header {
            return Ok(Vec::new());
        }

        let mut essays = Vec::new();
        for (i, raw) in body.split(|&b| b == b'\n').enumerate() {
            let line_no = i + 1;
            let line = std::str::from_utf8(raw).map_err(|source| PrepError::Decode {
                path: self.path.clone(),
                line: line_no,
                source,
            })?;
            if self.skip_header && i == 0 {
                continue;
            }
            let essay = self.parse_line(line, line_no)?;
            if essay.matches_prompt(prompt_filter) {
                essays.push(essay);
            }
        }

        tracing::debug!(
            "Read {} essays (prompt filter {}) from {}",
            essays.len(),
            prompt_filter,
            self.path.display()
        );
        Ok(essays)
    }
}

/// Text of one prompt from a `prompt_id \t text` file.
pub fn read_prompt_text(path: &Path, prompt_id: i64) -> PrepResult<String> {
    let bytes = fs::read(path)?;
    for (i, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        let line = std::str::from_utf8(raw).map_err(|source| PrepError::Decode {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let (id, text) = line.split_once('\t').ok_or_else(|| {
            PrepError::format(path, i + 1, "expected 'prompt_id<TAB>text'")
        })?;
        let id = id.trim().parse::<i64>().map_err(|_| {
            PrepError::format(path, i + 1, format!("prompt id '{id}' is not an integer"))
        })?;
        if id == prompt_id {
            return Ok(text.trim().to_string());
        }
    }
    Err(PrepError::load(path, format!("no text for prompt {prompt_id}")))
}

/// Write `contents` to a fresh file under the system temp dir.
#[cfg(test)]
pub(crate) fn temp_corpus(name: &str, contents: &[u8]) -> PathBuf {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    let dir = std::env::temp_dir().join(format!(
        "essay_prep_test_{}_{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp corpus");
    path
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "essay_id\tessay_set\tessay\trater1\trater2\trater3\tscore\n";

    fn line(id: i64, prompt: i64, text: &str, score: &str) -> String {
        format!("{id}\t{prompt}\t{text}\t1\t1\t0\t{score}\n")
    }

    #[test]
    fn test_reads_dataset_rows_in_order() {
        let body = format!("{}{}", line(1, 1, "First essay.", "8"), line(2, 1, "Second.", "10"));
        let path = temp_corpus("train.tsv", body.as_bytes());
        let essays = TsvCorpus::dataset(&path, DEFAULT_SCORE_INDEX).essays(0).unwrap();
        assert_eq!(essays.len(), 2);
        assert_eq!(essays[0], Essay::new(1, 1, "First essay.", 8.0));
        assert_eq!(essays[1].id, 2);
    }

    #[test]
    fn test_prompt_filter() {
        let body = format!("{}{}{}", line(1, 1, "a", "2"), line(2, 3, "b", "1"), line(3, 1, "c", "4"));
        let path = temp_corpus("mixed.tsv", body.as_bytes());
        let corpus = TsvCorpus::dataset(&path, DEFAULT_SCORE_INDEX);
        let ids: Vec<i64> = corpus.essays(1).unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(corpus.essays(-1).unwrap().len(), 3);
    }

    #[test]
    fn test_vocab_reader_skips_header() {
        let body = format!("{HEADER}{}", line(5, 2, "text", "3"));
        let path = temp_corpus("with_header.tsv", body.as_bytes());
        let essays = TsvCorpus::with_header(&path).essays(0).unwrap();
        assert_eq!(essays.len(), 1);
        assert_eq!(essays[0].id, 5);
    }

    #[test]
    fn test_dataset_reader_does_not_skip_header() {
        let body = format!("{HEADER}{}", line(5, 2, "text", "3"));
        let path = temp_corpus("header_in_dataset.tsv", body.as_bytes());
        let err = TsvCorpus::dataset(&path, DEFAULT_SCORE_INDEX).essays(0).unwrap_err();
        assert!(matches!(err, PrepError::Format { line: 1, .. }));
    }

    #[test]
    fn test_custom_score_column() {
        let path = temp_corpus("col4.tsv", b"7\t4\ttext\t0\t2.5\n");
        let essays = TsvCorpus::dataset(&path, 4).essays(0).unwrap();
        assert_eq!(essays[0].score, 2.5);
    }

    #[test]
    fn test_too_few_columns_is_format_error() {
        let body = format!("{}9\t1\tshort row\n", line(1, 1, "ok", "3"));
        let path = temp_corpus("short.tsv", body.as_bytes());
        let err = TsvCorpus::dataset(&path, DEFAULT_SCORE_INDEX).essays(0).unwrap_err();
        assert!(matches!(err, PrepError::Format { line: 2, .. }));
    }

    #[test]
    fn test_bad_score_is_format_error() {
        let path = temp_corpus("bad_score.tsv", line(1, 1, "ok", "high").as_bytes());
        let err = TsvCorpus::dataset(&path, DEFAULT_SCORE_INDEX).essays(0).unwrap_err();
        assert!(err.to_string().contains("score 'high' is not a number"));
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let mut body = line(1, 1, "fine", "2").into_bytes();
        body.extend_from_slice(b"2\t1\tbad \xff byte\t1\t1\t0\t3\n");
        let path = temp_corpus("latin1.tsv", &body);
        let err = TsvCorpus::dataset(&path, DEFAULT_SCORE_INDEX).essays(0).unwrap_err();
        assert!(matches!(err, PrepError::Decode { line: 2, .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let corpus = TsvCorpus::dataset("/definitely/not/here.tsv", DEFAULT_SCORE_INDEX);
        assert!(matches!(corpus.essays(0), Err(PrepError::Io(_))));
    }

    #[test]
    fn test_read_prompt_text() {
        let path = temp_corpus("prompts.tsv", b"1\tMore and more people use computers.\n2\tCensorship in libraries.\n");
        assert_eq!(read_prompt_text(&path, 2).unwrap(), "Censorship in libraries.");
        assert!(matches!(read_prompt_text(&path, 9), Err(PrepError::Load { .. })));
    }

    #[test]
    fn test_prompt_file_without_tab_is_format_error() {
        let path = temp_corpus("prompts_bad.tsv", b"1 no tab here\n");
        assert!(matches!(read_prompt_text(&path, 1), Err(PrepError::Format { line: 1, .. })));
    }

    #[test]
    fn test_empty_file_has_no_essays() {
        let path = temp_corpus("empty.tsv", b"");
        assert!(TsvCorpus::dataset(&path, DEFAULT_SCORE_INDEX).essays(0).unwrap().is_empty());
    }
}
