// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from a raw essay file to padded tensor batches.
//
//   .tsv split
//       │
//       ▼
//   TsvCorpus         → id, prompt, text, score per line
//       │
//       ▼
//   Preprocessor      → <url>, quotes, punctuation runs
//       │
//       ▼
//   word_tokenize     → Treebank-style word tokens
//       │
//       ▼
//   segmenter         → sentence boundaries, glued sentences
//       │
//       ▼
//   SentenceChunker   → sentences of bounded length
//       │
//       ▼
//   VocabBuilder / CorpusEncoder → vocabulary, index sequences
//       │
//       ▼
//   padding           → fixed [essays, sentnum, sentlen] block + mask
//       │
//       ▼
//   EssayDataset / EssayBatcher → Burn tensors

/// Reads tab-separated essay files
pub mod loader;

/// URL replacement and punctuation normalisation
pub mod preprocessor;

/// Word-level tokenizer
pub mod word_tokenizer;

/// Sentence boundary detection
pub mod segmenter;

/// Splits over-long sentences
pub mod chunker;

/// Full text → sentences pipeline
pub mod tokenizer;

/// Frequency-ranked vocabulary construction
pub mod vocab_builder;

/// Token → index encoding and corpus bounds
pub mod encoder;

/// Post-padding and masks
pub mod padding;

/// Implements Burn's Dataset trait for padded essays
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
