//! Essay corpus preparation for automated essay scoring.
//!
//! Layers, outermost first:
//!   - `cli`         — command line parsing
//!   - `application` — vocabulary and fold preparation workflows
//!   - `data`        — tokenisation, encoding, padding, batching
//!   - `infra`       — vocabulary store, embeddings, stats CSV
//!   - `domain`      — essays, vocabulary, score ranges, traits

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod infra;
pub mod error;
