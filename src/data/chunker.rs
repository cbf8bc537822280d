// ============================================================
// Layer 4 — Sentence Chunker
// ============================================================
// Enforces the maximum sentence length.
//
// A sentence with more than `max_len` tokens is split in two
// passes:
//
//   1. Keyword pass — cut immediately before every token that
//      usually opens a new clause (because, but, so, You, He,
//      She, We, It, They, Your, His, Her). If none occur, cut
//      every `max_len` tokens instead.
//   2. Width pass — any piece still longer than `max_len` is cut
//      into chunks of `max_len` tokens (the last may be shorter).
//
// Example with max_len=4:
//   "I ran far but it was late and so cold"
//   keyword pass: [I ran far] [but it was late and] [so cold]
//   width pass:   [I ran far] [but it was late] [and] [so cold]
//
// Sentences at or under the limit pass through untouched, and
// token order is always preserved.

/// Tokens that open a new clause
pub const SPLIT_KEYWORDS: &[&str] = &[
    "because", "but", "so", "You", "He", "She", "We", "It", "They", "Your", "His", "Her",
];

/// Default maximum tokens per sentence
pub const MAX_SENTLEN: usize = 50;

#[derive(Debug, Clone, Copy)]
pub struct SentenceChunker {
    max_len: usize,
}

impl SentenceChunker {
    /// # Panics
    /// Panics if max_len is zero: no sentence could ever fit.
    pub fn new(max_len: usize) -> Self {
        assert!(max_len > 0, "max sentence length must be positive");
        Self { max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Split one tokenised sentence into pieces of at most max_len tokens.
    pub fn shorten(&self, tokens: Vec<String>) -> Vec<Vec<String>> {
        if tokens.len() <= self.max_len {
            return vec![tokens];
        }

        // ── Pass 1: keyword cuts ──────────────────────────────────────────────
        let cuts: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| SPLIT_KEYWORDS.contains(&t.as_str()))
            .map(|(i, _)| i)
            .collect();

        let pieces: Vec<&[String]> = if cuts.is_empty() {
            tokens.chunks(self.max_len).collect()
        } else {
            split_before(&tokens, &cuts)
        };

        // ── Pass 2: width cuts ────────────────────────────────────────────────
        let shortened: Vec<Vec<String>> = pieces
            .into_iter()
            .filter(|piece| !piece.is_empty())
            .flat_map(|piece| piece.chunks(self.max_len))
            .map(<[String]>::to_vec)
            .collect();

        tracing::trace!(
            "Shortened a {}-token sentence into {} pieces",
            tokens.len(),
            shortened.len()
        );
        shortened
    }
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self::new(MAX_SENTLEN)
    }
}

/// Slice `tokens` immediately before every index in `cuts` (ascending).
fn split_before<'a>(tokens: &'a [String], cuts: &[usize]) -> Vec<&'a [String]> {
    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut start  = 0;
    for &cut in cuts {
        pieces.push(&tokens[start..cut]);
        start = cut;
    }
    pieces.push(&tokens[start..]);
    pieces
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn joined(pieces: &[Vec<String>]) -> Vec<String> {
        pieces.iter().map(|p| p.join(" ")).collect()
    }

    #[test]
    fn test_short_sentence_is_untouched() {
        let c = SentenceChunker::new(5);
        let pieces = c.shorten(words("a b c d e"));
        assert_eq!(joined(&pieces), vec!["a b c d e"]);
    }

    #[test]
    fn test_keyword_then_width_split() {
        let c = SentenceChunker::new(4);
        let pieces = c.shorten(words("I ran far but it was late and so cold"));
        assert_eq!(
            joined(&pieces),
            vec!["I ran far", "but it was late", "and", "so cold"]
        );
    }

    #[test]
    fn test_fixed_width_without_keywords() {
        let c = SentenceChunker::new(3);
        let pieces = c.shorten(words("a b c d e f g"));
        assert_eq!(joined(&pieces), vec!["a b c", "d e f", "g"]);
    }

    #[test]
    fn test_exact_multiple_leaves_no_empty_piece() {
        let c = SentenceChunker::new(2);
        let pieces = c.shorten(words("a b c d"));
        assert_eq!(joined(&pieces), vec!["a b", "c d"]);
    }

    #[test]
    fn test_keyword_at_start_leaves_no_empty_piece() {
        let c = SentenceChunker::new(2);
        let pieces = c.shorten(words("He ran so far"));
        assert_eq!(joined(&pieces), vec!["He ran", "so far"]);
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let c = SentenceChunker::new(3);
        // lowercase "he" is not a keyword, so fixed width applies
        let pieces = c.shorten(words("x y he z w"));
        assert_eq!(joined(&pieces), vec!["x y he", "z w"]);
    }

    #[test]
    fn test_every_piece_respects_limit_and_order() {
        let c = SentenceChunker::new(3);
        let tokens = words("We went because it was fun but They said so and so because It rained all day long today");
        let pieces = c.shorten(tokens.clone());
        assert!(pieces.iter().all(|p| !p.is_empty() && p.len() <= 3));
        let flat: Vec<String> = pieces.concat();
        assert_eq!(flat, tokens);
    }

    #[test]
    fn test_empty_sentence() {
        let c = SentenceChunker::default();
        assert_eq!(c.shorten(Vec::new()), vec![Vec::<String>::new()]);
    }

    #[test]
    #[should_panic]
    fn test_zero_length_limit_panics() {
        let _ = SentenceChunker::new(0);
    }
}
