//! Acronym expansion.
//!
//! All-uppercase words are spelled out letter by letter, joined by hyphens
//! (`"SPD"` → `"S-P-D"`), so the rest of the pipeline treats them as
//! compounds of single letters.

use crate::text::segment::Token;

/// Expand `word` when every character is uppercase, otherwise return it
/// unchanged.
pub fn expand_acronym(word: &str) -> String {
    if word.is_empty() || !word.chars().all(char::is_uppercase) {
        return word.to_string();
    }
    word.chars()
        .map(|ch| ch.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// Applies [`expand_acronym`] to the word-like tokens of a sequence.
#[derive(Debug, Clone, Copy)]
pub struct AcronymExpander {
    enabled: bool,
}

impl AcronymExpander {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Rewrite `tokens` in place order.  Delimiters are never touched.
    pub fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        if !self.enabled {
            return tokens;
        }
        tokens
            .into_iter()
            .map(|token| {
                if token.is_word() {
                    let expanded = expand_acronym(token.text());
                    if expanded != token.text() {
                        return token.with_text(expanded);
                    }
                }
                token
            })
            .collect()
    }
}

impl Default for AcronymExpander {
    fn default() -> Self {
        Self::new(true)
    }
}
