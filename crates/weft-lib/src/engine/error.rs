//! Errors that can occur during a parse session.

use std::fmt;

use rowan::{TextRange, TextSize};
use serde::Serialize;
use weft_core::Token;

use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Fatal resource limits. These abort the session; they are never a mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Execution fuel exhausted (too many combinator steps).
    #[error("runtime execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (too many nested rule invocations).
    #[error("runtime recursion limit exceeded")]
    RecursionLimitExceeded,
}

impl From<RuntimeError> for crate::Error {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::ExecFuelExhausted => crate::Error::ExecFuelExhausted,
            RuntimeError::RecursionLimitExceeded => crate::Error::RecursionLimitExceeded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureReason {
    /// The start rule did not match.
    NoMatch,
    /// The start rule matched but left tokens unconsumed.
    TrailingInput,
}

/// Top-level parse failure, located at the furthest point any branch reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    /// Token index of the failure.
    pub position: u32,
    /// Token at `position`, `None` at end of input.
    pub found: Option<Token>,
    /// Terminal names that would have let the parse progress, in first-tried order.
    pub expected: Vec<String>,
    /// Rule names, outermost first, active when the furthest failure was recorded.
    pub call_stack: Vec<String>,
    pub reason: FailureReason,
}

impl ParseFailure {
    fn kind(&self) -> DiagnosticKind {
        match (self.reason, &self.found) {
            (FailureReason::TrailingInput, _) => DiagnosticKind::TrailingInput,
            (FailureReason::NoMatch, Some(_)) => DiagnosticKind::UnexpectedToken,
            (FailureReason::NoMatch, None) => DiagnosticKind::UnexpectedEof,
        }
    }

    /// Source range of the offending token; empty at `source_len` for end of input.
    pub fn range(&self, source_len: usize) -> TextRange {
        match &self.found {
            Some(token) => TextRange::new(
                TextSize::from(token.offset),
                TextSize::from(token.end_offset()),
            ),
            None => TextRange::empty(TextSize::from(source_len as u32)),
        }
    }

    /// Collects this failure into a diagnostics set.
    pub fn diagnostics(&self, source: &str) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        let mut builder = diagnostics
            .report(self.kind(), self.range(source.len()))
            .message(self.detail());
        if let Some(rule) = self.call_stack.last() {
            builder = builder.hint(format!("while parsing `{rule}`"));
        }
        builder.emit();
        diagnostics
    }

    /// Renders an annotated source snippet for this failure.
    pub fn render(&self, source: &str) -> String {
        self.diagnostics(source).printer().source(source).render()
    }

    fn detail(&self) -> String {
        match self.reason {
            FailureReason::TrailingInput => match &self.found {
                Some(token) => format!("`{}`", token.value()),
                None => String::from("end of input"),
            },
            FailureReason::NoMatch => {
                let found = match &self.found {
                    Some(token) => format!("found `{}`", token.value()),
                    None => String::from("found end of input"),
                };
                match self.expected.as_slice() {
                    [] => found,
                    expected => format!("expected {}, {found}", one_of(expected)),
                }
            }
        }
    }
}

fn one_of(names: &[String]) -> String {
    match names {
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
        [] => String::new(),
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            FailureReason::TrailingInput => {
                write!(f, "unconsumed input at token {}", self.position)?;
            }
            FailureReason::NoMatch => {
                write!(f, "parse failed at token {}", self.position)?;
            }
        }
        write!(f, ": {}", self.detail())
    }
}

impl std::error::Error for ParseFailure {}
