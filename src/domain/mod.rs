// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that define what the pipeline works on:
// essays, vocabularies and score ranges.
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O
//   - NO tokenisation logic

/// Raw and encoded essays
pub mod essay;

/// Dense token → index mapping with reserved markers
pub mod vocabulary;

/// Per-prompt score ranges and [0, 1] rescaling
pub mod score_range;

/// Core abstractions the data and infra layers implement
pub mod traits;
