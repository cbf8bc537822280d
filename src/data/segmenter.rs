// ============================================================
// Layer 4 — Sentence Segmenter
// ============================================================
// Splits space-joined tokens into sentence strings.
//
// Boundary rule:
//   Split on a whitespace character that directly follows
//   '.', '!' or '?', unless the four characters before it look
//   like initials (w.w.) or the three before it look like a
//   title abbreviation (Mr. / Dr.).
//
// Mis-join repair:
//   Word tokenisation keeps "running.He" together when a writer
//   forgot the space after a period. Inside each sentence, a
//   capitalised word (optionally @-prefixed, optionally ending
//   in digits) glued to a preceding . ! ? or , is padded with
//   spaces and the sentence is split again.
//
// Example:
//   "He is running.He likes the sky ."
//     → "He is running."
//     → "He  likes the sky ."

use fancy_regex::Regex;
use std::sync::LazyLock;

/// Whitespace after . ! or ?, except after initials or a title.
static BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?<!\w\.\w.)(?<![A-Z][a-z]\.)(?<=[.!?])\s").expect("boundary pattern")
});

/// Capitalised word glued to . ! ? or , with at least two chars left.
static GLUED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?=.{2,})(?<=[.!?,])@?[A-Z]+[a-zA-Z]*[0-9]*").expect("glued word pattern")
});

/// Split text into sentences, repairing run-together sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    split_on_boundaries(text)
        .into_iter()
        .flat_map(|sentence| split_on_boundaries(&separate_glued_words(&sentence)))
        .collect()
}

/// Primary boundary split. The whitespace character at a boundary is
/// consumed; everything else is kept verbatim.
pub fn split_on_boundaries(text: &str) -> Vec<String> {
    let boundaries = match BOUNDARY.find_iter(text).collect::<Result<Vec<_>, _>>() {
        Ok(boundaries) => boundaries,
        Err(e) => {
            tracing::warn!("Sentence boundary scan failed, keeping text whole: {}", e);
            return vec![text.to_string()];
        }
    };

    let mut sentences = Vec::with_capacity(boundaries.len() + 1);
    let mut start     = 0;
    for boundary in boundaries {
        sentences.push(text[start..boundary.start()].to_string());
        start = boundary.end();
    }
    sentences.push(text[start..].to_string());
    sentences
}

/// Pad every glued capitalised word with a space on both sides.
fn separate_glued_words(sentence: &str) -> String {
    let glued = match GLUED.find_iter(sentence).collect::<Result<Vec<_>, _>>() {
        Ok(glued) => glued,
        Err(e) => {
            tracing::warn!("Glued word scan failed, keeping sentence as is: {}", e);
            return sentence.to_string();
        }
    };

    let mut out  = String::with_capacity(sentence.len() + 2 * glued.len());
    let mut last = 0;
    for word in glued {
        out.push_str(&sentence[last..word.start()]);
        out.push(' ');
        out.push_str(word.as_str());
        out.push(' ');
        last = word.end();
    }
    out.push_str(&sentence[last..]);
    out
}
