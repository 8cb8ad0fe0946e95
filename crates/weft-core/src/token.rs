//! Lexical tokens.

use std::ops::Range;
use std::sync::Arc;

use serde::Serialize;

/// One lexical token, as produced by a lexer.
///
/// Tokens are immutable once produced. `name` and `value` are shared slices,
/// so cloning a token into a CST leaf never copies text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    /// Token kind name, matched against grammar terminals.
    pub name: Arc<str>,
    /// Source text of the token.
    pub value: Arc<str>,
    /// Position in the token stream.
    pub index: u32,
    /// Byte offset into the source.
    pub offset: u32,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, in characters.
    pub column: u32,
    /// Length in bytes.
    pub length: u32,
    /// Whether at least one line break separates this token from the previous one.
    pub has_line_break_before: bool,
}

impl Token {
    /// Creates a token with no position information.
    ///
    /// Useful for synthetic streams; see [`Token::at`] to fill in positions.
    pub fn new(name: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            length: value.len() as u32,
            value,
            index: 0,
            offset: 0,
            line: 1,
            column: 1,
            has_line_break_before: false,
        }
    }

    /// Sets stream index and source position.
    pub fn at(mut self, index: u32, offset: u32, line: u32, column: u32) -> Self {
        self.index = index;
        self.offset = offset;
        self.line = line;
        self.column = column;
        self
    }

    pub fn with_line_break_before(mut self, value: bool) -> Self {
        self.has_line_break_before = value;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn is(&self, name: &str) -> bool {
        &*self.name == name
    }

    /// Byte range in the source text.
    #[inline]
    pub fn span(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.length as usize
    }

    /// Byte offset one past the end of the token.
    #[inline]
    pub fn end_offset(&self) -> u32 {
        self.offset + self.length
    }
}
