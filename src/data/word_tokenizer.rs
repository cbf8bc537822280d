// ============================================================
// Layer 4 — Word Tokenizer
// ============================================================
// Penn Treebank style word tokenisation.
//
// The text is first cut into rough sentence chunks (a word
// ending in . ! or ? that is not an abbreviation closes a
// chunk), then every chunk goes through an ordered list of
// regex rewrites and is split on whitespace:
//
//   starting quotes  → `` tokens
//   punctuation      → , : ; @ # $ % & ? ! * split off,
//                      "..." kept whole,
//                      a period split off only at chunk end
//   brackets         → ( ) [ ] { } < > split off
//   ending quotes    → 's 'm 'd 'll 're 've n't split off
//   contractions     → cannot → can not, gonna → gon na, …
//
// A period inside a word ("running.He", "3.5", "e.g.") is
// left alone here; sentence segmentation deals with it.
//
// The <url> placeholder is protected from the bracket rule
// and always comes out as one token.

use regex::Regex;
use std::sync::LazyLock;

use crate::data::preprocessor::URL_PLACEHOLDER;

// Private-use character standing in for <url> during the rewrites
const URL_SENTINEL: &str = "\u{E000}";

/// Lowercased abbreviations whose trailing period does not end a sentence
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "st", "jr", "sr", "vs", "etc", "prof", "inc", "ltd", "co", "mt",
    "no", "jan", "feb", "mar", "apr", "aug", "sep", "sept", "oct", "nov", "dec",
];

struct Rule {
    pattern:     Regex,
    replacement: &'static str,
}

fn rules(pairs: &[(&str, &'static str)]) -> Vec<Rule> {
    pairs
        .iter()
        .map(|&(pattern, replacement)| Rule {
            pattern:     Regex::new(pattern).expect("treebank pattern"),
            replacement,
        })
        .collect()
}

static STARTING_QUOTES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    rules(&[
        (r"([«“‘„]|`+)", " ${1} "),
        (r#"^""#, "``"),
        (r"(``)", " ${1} "),
        (r#"([ (\[{<])("|'{2})"#, "${1} `` "),
    ])
});

static PUNCTUATION: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    rules(&[
        (r#"([^.])(\.)([\])}>"'»”’ ]*)\s*$"#, "${1} ${2} ${3} "),
        (r"([:,])([^\d])", " ${1} ${2}"),
        (r"([:,])$", " ${1} "),
        (r"\.{2,}", " ${0} "),
        (r"[;@#$%&]", " ${0} "),
        (r#"([^.])(\.)([\])}>"']*)\s*$"#, "${1} ${2}${3} "),
        (r"[?!]", " ${0} "),
        (r"([^'])' ", "${1} ' "),
        (r"[*]", " ${0} "),
        (r"[\]\[(){}<>]", " ${0} "),
        (r"--", " -- "),
    ])
});

static ENDING_QUOTES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    rules(&[
        (r"([»”’])", " ${1} "),
        (r"''", " '' "),
        (r#"""#, " '' "),
        (r"([^' ])('[sS]|'[mM]|'[dD]|') ", "${1} ${2} "),
        (r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "${1} ${2} "),
    ])
});

static CONTRACTIONS: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    rules(&[
        (r"(?i)\b(can)(not)\b", " ${1} ${2} "),
        (r"(?i)\b(d)('ye)\b", " ${1} ${2} "),
        (r"(?i)\b(gim)(me)\b", " ${1} ${2} "),
        (r"(?i)\b(gon)(na)\b", " ${1} ${2} "),
        (r"(?i)\b(got)(ta)\b", " ${1} ${2} "),
        (r"(?i)\b(lem)(me)\b", " ${1} ${2} "),
        (r"(?i)\b(more)('n)\b", " ${1} ${2} "),
        (r"(?i)\b(wan)(na)\s", " ${1} ${2} "),
        (r"(?i) ('t)(is)\b", " ${1} ${2} "),
        (r"(?i) ('t)(was)\b", " ${1} ${2} "),
    ])
});

fn apply(rules: &[Rule], text: String) -> String {
    rules.iter().fold(text, |acc, rule| {
        rule.pattern.replace_all(&acc, rule.replacement).into_owned()
    })
}

/// Split text into word tokens.
pub fn word_tokenize(text: &str) -> Vec<String> {
    let text = text.replace(URL_PLACEHOLDER, URL_SENTINEL);

    rough_sentences(&text)
        .into_iter()
        .flat_map(|chunk| tokenize_chunk(&chunk))
        .map(|token| token.replace(URL_SENTINEL, URL_PLACEHOLDER))
        .collect()
}

fn tokenize_chunk(chunk: &str) -> Vec<String> {
    let text = apply(&STARTING_QUOTES, chunk.to_string());
    let text = apply(&PUNCTUATION, text);
    let text = format!(" {text} ");
    let text = apply(&ENDING_QUOTES, text);
    let text = apply(&CONTRACTIONS, text);
    text.split_whitespace().map(str::to_string).collect()
}

/// Cut text after every word that closes a sentence.
fn rough_sentences(text: &str) -> Vec<String> {
    let mut chunks  = Vec::new();
    let mut current = Vec::new();

    for word in text.split_whitespace() {
        current.push(word);
        if closes_sentence(word) {
            chunks.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        chunks.push(current.join(" "));
    }
    chunks
}

fn closes_sentence(word: &str) -> bool {
    let word = word.trim_end_matches(|c| matches!(c, ')' | ']' | '}' | '\'' | '"'));
    if word.ends_with('!') || word.ends_with('?') {
        return true;
    }
    if !word.ends_with('.') {
        return false;
    }
    let stem = word.trim_end_matches('.');
    if stem.is_empty() {
        // a bare run of periods
        return true;
    }
    if stem.contains('.') {
        // e.g. / U.S.
        return false;
    }
    let mut chars = stem.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        // initial: "J. Smith"
        return !c.is_alphabetic();
    }
    !ABBREVIATIONS.contains(&stem.to_lowercase().as_str())
}
