//! Tokenizers used by the instance reader.
//!
//! The reader only relies on the count and order of tokens. Implementations
//! must be deterministic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Leading segment marker emitted by [`SegmentTokenizer`].
pub const CLS_TOKEN: &str = "[CLS]";
/// Trailing segment marker emitted by [`SegmentTokenizer`].
pub const SEP_TOKEN: &str = "[SEP]";

/// A single token. Opaque to the reader beyond its position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Splits text into tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        (**self).tokenize(text)
    }
}

/// Word-level tokenizer: runs of alphanumeric characters form a word, every
/// other non-whitespace character is a token of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut word = String::new();

        for ch in text.chars() {
            if ch.is_alphanumeric() {
                word.push(ch);
                continue;
            }
            if !word.is_empty() {
                tokens.push(Token(std::mem::take(&mut word)));
            }
            if !ch.is_whitespace() {
                tokens.push(Token(ch.to_string()));
            }
        }
        if !word.is_empty() {
            tokens.push(Token(word));
        }

        tokens
    }
}

/// Wraps another tokenizer and surrounds its output with `[CLS]` ... `[SEP]`.
///
/// This is the convention the reader's comment-marker drop expects: once the
/// comment is appended after the question its `[CLS]` is redundant.
#[derive(Debug, Clone, Default)]
pub struct SegmentTokenizer<T> {
    inner: T,
}

impl<T: Tokenizer> SegmentTokenizer<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: Tokenizer> Tokenizer for SegmentTokenizer<T> {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let inner = self.inner.tokenize(text);
        let mut tokens = Vec::with_capacity(inner.len() + 2);
        tokens.push(Token::new(CLS_TOKEN));
        tokens.extend(inner);
        tokens.push(Token::new(SEP_TOKEN));
        tokens
    }
}
