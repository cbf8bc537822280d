// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-backed concerns shared by the use cases:
//
//   vocab_store.rs — Vocabulary persistence
//                    Saves the token → index map as JSON and
//                    validates it on load, so every split and
//                    every later run sees the same indices.
//
//   embedding.rs   — Pretrained embeddings
//                    Reads a plain-text vector file and builds
//                    the |V| × d table in vocabulary order.
//
//   metrics.rs     — Preparation statistics
//                    Appends per-split bounds, hit rates and
//                    score moments to a CSV file.

/// Vocabulary JSON save / load
pub mod vocab_store;

/// Embedding file loading and table construction
pub mod embedding;

/// Per-split statistics CSV logger
pub mod metrics;
