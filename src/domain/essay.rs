// ============================================================
// Layer 3 — Essay Domain Types
// ============================================================
// An Essay is one row of the corpus file as read from disk.
// An EncodedEssay is the same essay after tokenisation,
// sentence governing and vocabulary lookup.
//
// Both are plain data. Nothing here touches the file system
// or the tokenizer.

use serde::{Deserialize, Serialize};

/// One labelled essay from a tab-separated corpus file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Essay {
    /// Column 0 of the corpus line
    pub id: i64,

    /// Column 1 — the essay set / prompt this essay answers
    pub prompt_id: i64,

    /// Column 2 — raw essay text, trimmed
    pub text: String,

    /// Raw score in the prompt's native range
    pub score: f64,
}

impl Essay {
    pub fn new(id: i64, prompt_id: i64, text: impl Into<String>, score: f64) -> Self {
        Self { id, prompt_id, text: text.into(), score }
    }

    /// True when this essay passes a prompt filter.
    /// A filter of zero or below selects every prompt.
    pub fn matches_prompt(&self, prompt_filter: i64) -> bool {
        prompt_filter <= 0 || self.prompt_id == prompt_filter
    }
}

/// An essay as sentences of vocabulary indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedEssay {
    pub id:        i64,
    pub prompt_id: i64,

    /// Sentences in reading order, each a sequence of token indices
    pub sentences: Vec<Vec<u32>>,

    /// Raw score, not yet rescaled
    pub score: f64,
}

impl EncodedEssay {
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Length of the longest sentence, 0 for an empty essay
    pub fn longest_sentence(&self) -> usize {
        self.sentences.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_filter() {
        let essay = Essay::new(10, 3, "text", 2.0);
        assert!(essay.matches_prompt(3));
        assert!(essay.matches_prompt(0));
        assert!(essay.matches_prompt(-1));
        assert!(!essay.matches_prompt(4));
    }

    #[test]
    fn test_encoded_shape_helpers() {
        let encoded = EncodedEssay {
            id:        1,
            prompt_id: 1,
            sentences: vec![vec![3, 4, 5], vec![6]],
            score:     8.0,
        };
        assert_eq!(encoded.sentence_count(), 2);
        assert_eq!(encoded.longest_sentence(), 3);
    }
}
