//! Token production from a `logos` token enum.
//!
//! Post-processes the Logos output into engine [`Token`]s:
//! - Drops trivia (whitespace, comments), remembering whether a line break was skipped
//! - Computes 1-based line and character columns
//! - Applies a [`LexRecovery`] policy to unrecognized input
//!
//! ## Error handling
//!
//! Consecutive error characters are coalesced into one run rather than one
//! error per character. Under the default policy each run becomes a single
//! `Garbage` token, so a malformed source still yields a token stream the
//! parser can attempt.

use logos::Logos;
use rowan::{TextRange, TextSize};
use serde::Serialize;
use weft_core::Token;

use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Token name given to coalesced unrecognized input.
pub const GARBAGE: &str = "Garbage";

/// A token kind produced by a logos lexer.
pub trait TokenKind: Copy {
    /// Name matched against grammar terminals.
    fn name(self) -> &'static str;

    /// Trivia never reaches the token stream.
    fn is_trivia(self) -> bool {
        false
    }
}

/// What the lexer does with input no token pattern recognizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LexRecovery {
    /// Stop at the first unrecognized run.
    Abort,
    /// Drop unrecognized runs; report them as errors.
    Skip,
    /// Emit each unrecognized run as one `Garbage` token and report it.
    #[default]
    Coalesce,
}

/// A run of unrecognized input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("invalid input `{text}` at {line}:{column}")]
pub struct LexError {
    pub offset: u32,
    pub length: u32,
    pub line: u32,
    pub column: u32,
    pub text: String,
}

impl LexError {
    pub fn range(&self) -> TextRange {
        TextRange::at(TextSize::from(self.offset), TextSize::from(self.length))
    }
}

/// Lexer output: the token stream plus every recovered error.
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl Lexed {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn diagnostics(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        for err in &self.errors {
            diagnostics
                .report(DiagnosticKind::InvalidCharacter, err.range())
                .message(format!("`{}`", err.text))
                .emit();
        }
        diagnostics
    }
}

/// Tokenizes `source` with the logos enum `K`.
pub fn lex<'s, K>(source: &'s str, recovery: LexRecovery) -> Result<Lexed, LexError>
where
    K: TokenKind + Logos<'s, Source = str>,
    K::Extras: Default,
{
    let lines = LineIndex::new(source);
    let mut out = Lexed::default();
    let mut lexer = K::lexer(source);
    let mut error_start: Option<usize> = None;
    // End of the last emitted token; trivia between it and the next token is
    // scanned for line breaks.
    let mut prev_end = 0usize;

    loop {
        let next = lexer.next();
        let span = lexer.span();

        if !matches!(next, Some(Err(_)))
            && let Some(start) = error_start.take()
        {
            let end = if next.is_some() { span.start } else { source.len() };
            let (line, column) = lines.locate(source, start);
            let err = LexError {
                offset: start as u32,
                length: (end - start) as u32,
                line,
                column,
                text: source[start..end].to_owned(),
            };
            match recovery {
                LexRecovery::Abort => return Err(err),
                LexRecovery::Skip => out.errors.push(err),
                LexRecovery::Coalesce => {
                    let index = out.tokens.len();
                    let token = make_token(source, &lines, GARBAGE, start..end, prev_end, index);
                    out.tokens.push(token);
                    prev_end = end;
                    out.errors.push(err);
                }
            }
        }

        match next {
            Some(Ok(kind)) if kind.is_trivia() => {}
            Some(Ok(kind)) => {
                let index = out.tokens.len();
                let token = make_token(source, &lines, kind.name(), span.clone(), prev_end, index);
                out.tokens.push(token);
                prev_end = span.end;
            }
            Some(Err(_)) => {
                if error_start.is_none() {
                    error_start = Some(span.start);
                }
            }
            None => break,
        }
    }

    Ok(out)
}

fn make_token(
    source: &str,
    lines: &LineIndex,
    name: &'static str,
    span: std::ops::Range<usize>,
    prev_end: usize,
    index: usize,
) -> Token {
    let (line, column) = lines.locate(source, span.start);
    let line_break = source[prev_end..span.start].contains('\n');
    Token::new(name, &source[span.clone()])
        .at(index as u32, span.start as u32, line, column)
        .with_line_break_before(line_break)
}

/// Byte offsets of line starts.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// 1-based line and character column of a byte offset.
    fn locate(&self, source: &str, offset: usize) -> (u32, u32) {
        let line = self.starts.partition_point(|&start| start <= offset);
        let line_start = self.starts[line - 1];
        let column = source[line_start..offset].chars().count() + 1;
        (line as u32, column as u32)
    }
}
