//! Resolution pipeline: text → phonemes.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                    Phonemizer::phonemize_list                  │
//! │                                                               │
//! │  Segmenter ─▶ AcronymExpander ─▶ DictionaryResolver (whole)   │
//! │                                      │ miss + '-'             │
//! │                                      ▼                        │
//! │                               CompoundDecomposer (parts)      │
//! │                                      │ still unresolved       │
//! │                                      ▼                        │
//! │                               PredictionBatcher ─▶ Predictor  │
//! │                                      │                        │
//! │                                      ▼                        │
//! │                                 reassemble                    │
//! └───────────────────────────────────────────────────────────────┘
//! ```

pub mod batcher;
pub mod compound;
pub mod reassemble;
pub mod resolution;
pub mod result;
pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use batcher::PredictionBatcher;
pub use compound::{CompoundDecomposer, CompoundSplit, COMPOUND_SEPARATOR};
pub use reassemble::reassemble;
pub use resolution::{ResolutionRecord, ResolutionSource, ResolutionTable};
pub use result::PhonemizerResult;
pub use runner::{Phonemizer, PhonemizerError};
