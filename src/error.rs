// ============================================================
// Error Taxonomy
// ============================================================
// Every library layer returns PrepError. The application and
// CLI layers wrap it in anyhow with extra context.
//
// Any of these aborts the current file-level operation: no
// partially built vocabulary or padded batch is ever returned.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, encoding or padding an essay corpus.
#[derive(Debug, Error)]
pub enum PrepError {
    /// A corpus line is not valid UTF-8.
    #[error("{}:{line}: invalid UTF-8 ({source})", path.display())]
    Decode {
        path:   PathBuf,
        line:   usize,
        #[source]
        source: std::str::Utf8Error,
    },

    /// A corpus line has too few columns or an unparsable field.
    #[error("{}:{line}: {reason}", path.display())]
    Format {
        path:   PathBuf,
        line:   usize,
        reason: String,
    },

    /// A vocabulary or embedding file is missing or corrupt.
    #[error("cannot load '{}': {reason}", path.display())]
    Load {
        path:   PathBuf,
        reason: String,
    },

    /// Prompt id outside the score range table (strict mode only).
    #[error("prompt id {0} has no score range")]
    Range(i64),

    /// A tokenisation mode this crate does not implement.
    #[error("unsupported mode: {0}")]
    UnsupportedMode(String),

    /// Content larger than the padding bounds handed to the assembler.
    #[error("shape error: {0}")]
    Shape(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PrepError {
    pub fn format(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::Format { path: path.into(), line, reason: reason.into() }
    }

    pub fn load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Load { path: path.into(), reason: reason.into() }
    }
}

pub type PrepResult<T> = Result<T, PrepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_names_file_and_line() {
        let err = PrepError::format("data/train.tsv", 12, "expected 7 columns, found 3");
        assert_eq!(err.to_string(), "data/train.tsv:12: expected 7 columns, found 3");
    }

    #[test]
    fn test_range_error_message() {
        assert_eq!(PrepError::Range(42).to_string(), "prompt id 42 has no score range");
    }

    #[test]
    fn test_decode_error_names_line() {
        let bytes = [0x66u8, 0xff, 0x6f];
        let source = std::str::from_utf8(&bytes).unwrap_err();
        let err = PrepError::Decode { path: "x.tsv".into(), line: 3, source };
        assert!(err.to_string().starts_with("x.tsv:3: invalid UTF-8"));
    }
}
