//! Phonetic dictionary and dictionary-based resolution.
//!
//! * [`PhoneticDictionary`] — immutable `language → word → phonemes` table.
//! * [`DictionaryResolver`] — delimiter passthrough, affix stripping, and the
//!   ordered case fallback ([`LOOKUP_ORDER`]).
//! * [`DictionaryError`] — load-time configuration errors.

pub mod lexicon;
pub mod resolver;

pub use lexicon::{DictionaryError, PhoneticDictionary};
pub use resolver::{
    strip_affixes, title_case, Affixes, DictionaryMatch, DictionaryResolver, LookupStrategy,
    LOOKUP_ORDER,
};
