// ============================================================
// Layer 3 — Vocabulary
// ============================================================
// Dense mapping from token string to index.
//
// Reserved indices:
//   0 → <pad>   filler for padded positions
//   1 → <unk>   token not in the vocabulary
//   2 → <num>   numeric literal
//
// Every other index is assigned once, in insertion order, so
// `tokens[i]` is always the token with index i.

use std::collections::HashMap;

pub const PAD_TOKEN: &str = "<pad>";
pub const UNK_TOKEN: &str = "<unk>";
pub const NUM_TOKEN: &str = "<num>";

pub const PAD_INDEX: u32 = 0;
pub const UNK_INDEX: u32 = 1;
pub const NUM_INDEX: u32 = 2;

/// Number of reserved entries at the front of every vocabulary
pub const RESERVED: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    index:  HashMap<String, u32>,
    tokens: Vec<String>,
}

impl Vocabulary {
    /// A vocabulary holding only the three reserved markers.
    pub fn new() -> Self {
        let mut vocab = Self { index: HashMap::new(), tokens: Vec::new() };
        for token in [PAD_TOKEN, UNK_TOKEN, NUM_TOKEN] {
            vocab.insert(token);
        }
        vocab
    }

    /// Append a token at the next free index.
    /// An already known token keeps its existing index.
    pub fn insert(&mut self, token: &str) -> u32 {
        if let Some(&idx) = self.index.get(token) {
            return idx;
        }
        let idx = self.tokens.len() as u32;
        self.index.insert(token.to_string(), idx);
        self.tokens.push(token.to_string());
        idx
    }

    /// Rebuild from a token → index map, checking that indices are
    /// dense from 0 and that the reserved markers sit at 0, 1 and 2.
    pub fn from_index_map(map: HashMap<String, u32>) -> Result<Self, String> {
        let mut tokens = vec![None; map.len()];
        for (token, &idx) in &map {
            let slot = tokens
                .get_mut(idx as usize)
                .ok_or_else(|| format!("index {idx} of '{token}' is out of range"))?;
            if slot.is_some() {
                return Err(format!("index {idx} is assigned twice"));
            }
            *slot = Some(token.clone());
        }
        let tokens: Vec<String> = tokens
            .into_iter()
            .enumerate()
            .map(|(i, t)| t.ok_or_else(|| format!("index {i} is missing")))
            .collect::<Result<_, _>>()?;

        for (idx, expected) in [PAD_TOKEN, UNK_TOKEN, NUM_TOKEN].iter().enumerate() {
            if tokens.get(idx).map(String::as_str) != Some(*expected) {
                return Err(format!("reserved index {idx} must be '{expected}'"));
            }
        }
        Ok(Self { index: map, tokens })
    }

    pub fn get(&self, token: &str) -> Option<u32> {
        self.index.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    pub fn token(&self, idx: u32) -> Option<&str> {
        self.tokens.get(idx as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Never true in practice: the reserved markers are always present.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// (token, index) pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.tokens.iter().enumerate().map(|(i, t)| (t.as_str(), i as u32))
    }

    pub fn as_index_map(&self) -> &HashMap<String, u32> {
        &self.index
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}
