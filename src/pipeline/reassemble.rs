//! Reassembly of a token sequence into its transcription.
//!
//! Runs only after every entry of the [`ResolutionTable`] is final.  Each
//! token contributes either its own record or, for a compound, its parts
//! joined with hyphens; the pieces are concatenated with no separator.

use std::collections::HashMap;

use crate::pipeline::compound::CompoundSplit;
use crate::pipeline::resolution::ResolutionTable;
use crate::pipeline::runner::PhonemizerError;
use crate::text::Token;

/// Per-token phoneme strings for `tokens`, in order.
pub fn resolve_tokens(
    tokens: &[Token],
    table: &ResolutionTable,
    compounds: &HashMap<String, CompoundSplit>,
) -> Result<Vec<String>, PhonemizerError> {
    tokens
        .iter()
        .map(|token| {
            let text = token.text();
            if let Some(record) = table.get(text) {
                return Ok(record.phonemes.clone());
            }
            compounds
                .get(text)
                .and_then(|split| split.join(table))
                .ok_or_else(|| PhonemizerError::Unresolved(text.to_string()))
        })
        .collect()
}

/// The full transcription of `tokens`.
pub fn reassemble(
    tokens: &[Token],
    table: &ResolutionTable,
    compounds: &HashMap<String, CompoundSplit>,
) -> Result<String, PhonemizerError> {
    Ok(resolve_tokens(tokens, table, compounds)?.concat())
}
