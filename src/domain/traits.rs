// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer reads essays and persists vocabularies
// through these traits only, so a different corpus format or
// storage backend can be dropped in without touching it.

use std::path::Path;

use crate::domain::essay::Essay;
use crate::error::PrepResult;

// ─── EssaySource ──────────────────────────────────────────────────────────────
/// Anything that can produce the essays of a corpus split.
///
/// Implementations:
///   - TsvCorpus → tab-separated ASAP-style files
pub trait EssaySource {
    /// Every essay whose prompt passes `prompt_filter`
    /// (zero or below selects all prompts), in file order.
    fn essays(&self, prompt_filter: i64) -> PrepResult<Vec<Essay>>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Anything whose state can be written to and restored from disk.
///
/// Implementations:
///   - Vocabulary → JSON token/index map
pub trait Persistable: Sized {
    fn save(&self, path: &Path) -> PrepResult<()>;

    /// Fails with `PrepError::Load` on a missing or corrupt file.
    fn load(path: &Path) -> PrepResult<Self>;
}
