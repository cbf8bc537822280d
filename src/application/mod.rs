// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one goal at a time.
//
// Rules for this layer:
//   - No tokenisation or padding logic here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination and error context

// Vocabulary construction from a training split
pub mod vocab_use_case;

// Full train/dev/test fold preparation
pub mod prepare_use_case;
