//! Phoneme prediction for words the dictionary cannot resolve.
//!
//! This module provides:
//! * [`Predictor`] — async trait implemented by all backends.
//! * [`Prediction`] — phonemes plus optional per-token probabilities.
//! * [`ModelPredictor`] — adapts a local [`SequenceModel`] using
//!   [`SequenceTokenizer`]s for graphemes and phonemes.
//! * [`ApiPredictor`] — remote phonemization service over HTTP.
//! * [`CachingPredictor`] — memoises any backend across calls.
//! * [`PredictorError`] — error variants for prediction.

pub mod api;
pub mod backend;
pub mod cache;
pub mod model;
pub mod tokenizer;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use api::ApiPredictor;
pub use backend::{Prediction, Predictor, PredictorError};
pub use cache::CachingPredictor;
pub use model::{Generation, ModelPredictor, SequenceModel};
pub use tokenizer::{language_token, SequenceTokenizer, END_TOKEN, PAD_TOKEN};

// test-only re-export so pipeline tests can use the recording mock.
#[cfg(test)]
pub use backend::MockPredictor;
