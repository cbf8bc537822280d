// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Normalises raw essay text before word tokenisation.
//
// Cleaning steps (applied in order):
//   1. Replace URL-like substrings with the <url> placeholder
//   2. Remove double-quote characters
//   3. Collapse runs of 3+ periods into "..."
//   4. Collapse runs of 2+ question marks into "?"
//   5. Collapse runs of 2+ exclamation marks into "!"
//
// Steps 3–5 also swallow repeated runs separated only by
// whitespace, so "?? ??" becomes a single "?".
//
// Example:
//   "See http://example.com now!!"  →  "See <url> now!"

use regex::Regex;
use std::sync::LazyLock;

/// Placeholder that replaces every URL
pub const URL_PLACEHOLDER: &str = "<url>";

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(https?://)?(www\.)?[a-zA-Z0-9]+\.(com(\.cn)?|org)").expect("url pattern")
});
static ELLIPSIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{3,}(\s+\.{3,})*").expect("ellipsis pattern"));
static QUESTIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?{2,}(\s+\?{2,})*").expect("question pattern"));
static EXCLAMATIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!{2,}(\s+!{2,})*").expect("exclamation pattern"));

#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    replace_urls: bool,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self { replace_urls: true }
    }

    /// Keep URLs verbatim instead of replacing them with <url>
    pub fn keep_urls() -> Self {
        Self { replace_urls: false }
    }

    /// Clean a raw essay string for downstream tokenisation.
    pub fn clean(&self, text: &str) -> String {
        // ── Step 1: URLs ──────────────────────────────────────────────────────
        let text = if self.replace_urls {
            URL.replace_all(text, URL_PLACEHOLDER).into_owned()
        } else {
            text.to_string()
        };

        // ── Step 2: double quotes ─────────────────────────────────────────────
        let text = text.replace('"', "");

        // ── Steps 3–5: punctuation runs ───────────────────────────────────────
        let text = ELLIPSIS.replace_all(&text, "...");
        let text = QUESTIONS.replace_all(&text, "?");
        let text = EXCLAMATIONS.replace_all(&text, "!");

        text.into_owned()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
