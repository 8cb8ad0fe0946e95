//! Cursor over a token slice.
//!
//! Backtracking happens at nearly every combinator boundary, so a checkpoint
//! is just the cursor value and restoring it is a single assignment.

use crate::Token;

/// Saved cursor position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Checkpoint(u32);

impl Checkpoint {
    #[inline]
    pub fn position(self) -> u32 {
        self.0
    }
}

/// Read-only token sequence with a movable cursor.
///
/// End of input is represented by `None` from [`TokenStream::peek`]; it is
/// never a real token, and failing to consume past it is an ordinary mismatch.
#[derive(Debug, Clone)]
pub struct TokenStream<'t> {
    tokens: &'t [Token],
    cursor: u32,
}

impl<'t> TokenStream<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Token `offset` positions ahead of the cursor, or `None` at EOF.
    #[inline]
    pub fn peek(&self, offset: usize) -> Option<&'t Token> {
        self.tokens.get(self.cursor as usize + offset)
    }

    #[inline]
    pub fn current(&self) -> Option<&'t Token> {
        self.peek(0)
    }

    #[inline]
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    #[inline]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.cursor)
    }

    #[inline]
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.cursor = checkpoint.0;
    }

    /// Moves the cursor to an absolute position, clamped to the end of input.
    #[inline]
    pub fn seek(&mut self, position: u32) {
        self.cursor = position.min(self.tokens.len() as u32);
    }

    /// Consumes the current token. Returns `None` at EOF without moving.
    #[inline]
    pub fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.cursor as usize)?;
        self.cursor += 1;
        Some(token)
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.cursor as usize >= self.tokens.len()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.cursor as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: u32) -> Option<&'t Token> {
        self.tokens.get(index as usize)
    }

    pub fn tokens(&self) -> &'t [Token] {
        self.tokens
    }
}
