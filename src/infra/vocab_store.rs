// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Saves and loads a Vocabulary as JSON so the same token →
// index mapping is used for every split and for later runs.
//
// File layout (vocab.json):
//   {
//     "version": "1.0",
//     "size":    4000,
//     "vocab":   { "<num>": 2, "<pad>": 0, "<unk>": 1, "the": 3, ... }
//   }
//
// Loading checks the version, that "size" agrees with the map,
// and that indices are dense with the reserved markers first.
// Any failure is reported as PrepError::Load.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::domain::traits::Persistable;
use crate::domain::vocabulary::Vocabulary;
use crate::error::{PrepError, PrepResult};

pub const VOCAB_FILE: &str = "vocab.json";
const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
struct VocabFile {
    version: String,
    size:    usize,
    vocab:   BTreeMap<String, u32>,
}

impl Persistable for Vocabulary {
    fn save(&self, path: &Path) -> PrepResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = VocabFile {
            version: FORMAT_VERSION.to_string(),
            size:    self.len(),
            vocab:   self.iter().map(|(t, i)| (t.to_string(), i)).collect(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| PrepError::load(path, e.to_string()))?;
        fs::write(path, json)?;

        tracing::info!("Vocab saved to '{}' ({} entries)", path.display(), self.len());
        Ok(())
    }

    fn load(path: &Path) -> PrepResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| PrepError::load(path, e.to_string()))?;
        let file: VocabFile = serde_json::from_str(&json)
            .map_err(|e| PrepError::load(path, e.to_string()))?;

        if file.version != FORMAT_VERSION {
            return Err(PrepError::load(
                path,
                format!("unsupported vocab version '{}'", file.version),
            ));
        }
        if file.size != file.vocab.len() {
            return Err(PrepError::load(
                path,
                format!("size {} does not match {} entries", file.size, file.vocab.len()),
            ));
        }

        let map: HashMap<String, u32> = file.vocab.into_iter().collect();
        let vocab = Vocabulary::from_index_map(map).map_err(|reason| PrepError::load(path, reason))?;

        tracing::info!("Vocab loaded from '{}' ({} entries)", path.display(), vocab.len());
        Ok(vocab)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::temp_corpus;

    #[test]
    fn test_save_then_load() {
        let mut vocab = Vocabulary::new();
        vocab.insert("essay");
        vocab.insert("@caps");
        let path = temp_corpus(VOCAB_FILE, b"");
        vocab.save(&path).unwrap();

        let loaded = Vocabulary::load(&path).unwrap();
        assert_eq!(loaded, vocab);
        assert_eq!(loaded.get("@caps"), Some(4));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = Vocabulary::load(Path::new("/no/such/vocab.json")).unwrap_err();
        assert!(matches!(err, PrepError::Load { .. }));
    }

    #[test]
    fn test_corrupt_json_is_load_error() {
        let path = temp_corpus(VOCAB_FILE, b"{ not json");
        assert!(matches!(Vocabulary::load(&path), Err(PrepError::Load { .. })));
    }

    #[test]
    fn test_size_mismatch_is_load_error() {
        let body = br#"{"version":"1.0","size":5,"vocab":{"<pad>":0,"<unk>":1,"<num>":2}}"#;
        let path = temp_corpus(VOCAB_FILE, body);
        let err = Vocabulary::load(&path).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_missing_reserved_marker_is_load_error() {
        let body = br#"{"version":"1.0","size":3,"vocab":{"<pad>":0,"the":1,"<num>":2}}"#;
        let path = temp_corpus(VOCAB_FILE, body);
        assert!(matches!(Vocabulary::load(&path), Err(PrepError::Load { .. })));
    }
}
