//! Grapheme-to-phoneme conversion with dictionary lookup, hyphenated
//! compound decomposition and a pluggable phoneme predictor.
//!
//! * [`text`] — lossless segmentation and acronym expansion.
//! * [`dictionary`] — per-language phonetic dictionary and lookup.
//! * [`predictor`] — the [`Predictor`](predictor::Predictor) trait and its
//!   backends.
//! * [`pipeline`] — [`Phonemizer`](pipeline::Phonemizer), which ties it all
//!   together.
//! * [`config`] — TOML settings.

pub mod config;
pub mod dictionary;
pub mod pipeline;
pub mod predictor;
pub mod text;

pub use pipeline::{Phonemizer, PhonemizerError, PhonemizerResult};
pub use predictor::{Prediction, Predictor};
