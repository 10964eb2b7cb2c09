//! Tokenized selection model for click-to-select error hunting.
//!
//! A passage is split into an ordered sequence of word and separator
//! tokens. Selection is a set of word-token indices; toggling a separator
//! is a no-op. Concatenating all token texts in order reproduces the
//! passage exactly.

use std::collections::BTreeSet;

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A maximal run of word characters (alphanumeric or underscore).
    Word,
    /// A maximal run of anything else (whitespace, punctuation).
    Separator,
}

/// One token of a rendered passage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    /// Position in the token sequence, stable for the lifetime of a render.
    pub index: usize,
}

impl Token {
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

/// Word-character predicate: alphanumeric or underscore.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits a passage into word and separator tokens, preserving every
/// character.
pub fn tokenize(passage: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();

    for c in passage.chars() {
        let kind = if is_word_char(c) {
            TokenKind::Word
        } else {
            TokenKind::Separator
        };

        match tokens.last_mut() {
            Some(last) if last.kind == kind => last.text.push(c),
            _ => {
                let index = tokens.len();
                tokens.push(Token {
                    text: c.to_string(),
                    kind,
                    index,
                });
            }
        }
    }

    tokens
}

/// The set of word-token indices currently marked as suspected errors.
///
/// Created empty per rendered passage and discarded when a new passage
/// replaces the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<usize>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles the selection of a word token. Separator or out-of-range
    /// indices leave the state unchanged.
    pub fn toggle(&mut self, tokens: &[Token], index: usize) {
        let Some(token) = tokens.get(index) else {
            return;
        };
        if !token.is_word() {
            return;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected indices in ascending order.
    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }
}

/// Visual state of a token, a pure function of kind and selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStyle {
    Separator,
    Word { selected: bool },
}

/// Maps a token to its visual state for the current selection.
pub fn token_style(token: &Token, state: &SelectionState) -> TokenStyle {
    match token.kind {
        TokenKind::Separator => TokenStyle::Separator,
        TokenKind::Word => TokenStyle::Word {
            selected: state.is_selected(token.index),
        },
    }
}
