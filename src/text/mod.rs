//! Text preparation: segmentation and acronym expansion.
//!
//! * [`Segmenter`] — lossless split into word-like and delimiter [`Token`]s.
//! * [`Punctuation`] — the configurable delimiter set (space always included).
//! * [`AcronymExpander`] — spells out all-uppercase words as `S-P-D`.

pub mod acronym;
pub mod segment;

pub use acronym::{expand_acronym, AcronymExpander};
pub use segment::{Punctuation, Segmenter, Token, TokenKind, DEFAULT_PUNCTUATION};
