//! Lossless text segmentation.
//!
//! [`Segmenter`] splits raw text on a configurable [`Punctuation`] set (plus
//! a literal space).  Every delimiter character becomes its own
//! [`Token`], and everything between two delimiters becomes a word-like
//! token, which may be empty:
//!
//! ```text
//! "Hi, Bob."  ──▶  ["Hi"] [","] [""] [" "] ["Bob"] ["."] [""]
//!                   word  delim word delim  word  delim word
//! ```
//!
//! Concatenating the token texts in order always reproduces the input.

use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Punctuation
// ---------------------------------------------------------------------------

/// Punctuation characters used when no explicit set is configured.
pub const DEFAULT_PUNCTUATION: &str = "().,:?!";

/// The set of delimiter characters.  A space is always a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Punctuation {
    chars: BTreeSet<char>,
}

impl Punctuation {
    /// Build a set from `chars`; a space is added automatically.
    pub fn new(chars: &str) -> Self {
        let mut set: BTreeSet<char> = chars.chars().collect();
        set.insert(' ');
        Self { chars: set }
    }

    /// Returns `true` when `ch` is a delimiter.
    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    /// Returns `true` when `token` is exactly one delimiter character.
    pub fn is_delimiter_token(&self, token: &str) -> bool {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => self.contains(ch),
            _ => false,
        }
    }
}

impl Default for Punctuation {
    fn default() -> Self {
        Self::new(DEFAULT_PUNCTUATION)
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// Whether a token carries word content or is a single delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Delimiter,
}

/// A segment of the input text.
///
/// `offset` is the byte offset of the segment in the original input.  After
/// acronym expansion the text may differ from the original slice, but the
/// offset still points at where the token came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    offset: usize,
    kind: TokenKind,
}

impl Token {
    pub fn word(text: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            offset,
            kind: TokenKind::Word,
        }
    }

    pub fn delimiter(ch: char, offset: usize) -> Self {
        Self {
            text: ch.to_string(),
            offset,
            kind: TokenKind::Delimiter,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Return a copy of this token carrying `text` instead.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            offset: self.offset,
            kind: self.kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Segmenter
// ---------------------------------------------------------------------------

/// Splits text into alternating word-like and delimiter tokens.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    punctuation: Punctuation,
}

impl Segmenter {
    pub fn new(punctuation: Punctuation) -> Self {
        Self { punctuation }
    }

    pub fn punctuation(&self) -> &Punctuation {
        &self.punctuation
    }

    /// Segment `text`.  The result always starts and ends with a word-like
    /// token and never contains two adjacent word-like tokens.
    pub fn segment(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut word_start = 0;

        for (idx, ch) in text.char_indices() {
            if self.punctuation.contains(ch) {
                tokens.push(Token::word(&text[word_start..idx], word_start));
                tokens.push(Token::delimiter(ch, idx));
                word_start = idx + ch.len_utf8();
            }
        }
        tokens.push(Token::word(&text[word_start..], word_start));

        tokens
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
