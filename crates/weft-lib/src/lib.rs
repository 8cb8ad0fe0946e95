//! Weft: combinator parsing with packrat memoization and static conflict analysis.
//!
//! # Example
//!
//! ```
//! use weft_core::Token;
//! use weft_lib::grammar::{Grammar, alt, term};
//! use weft_lib::engine::Parser;
//!
//! let grammar = Grammar::builder()
//!     .rule("Literal", alt([term("Null"), term("True"), term("False")]))
//!     .build()
//!     .expect("valid grammar");
//!
//! let tokens = [Token::new("True", "true")];
//! let output = Parser::new(&grammar, &tokens).parse("Literal").expect("parses");
//! assert_eq!(output.root.name(), "Literal");
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod cst;
pub mod diagnostics;
pub mod engine;
pub mod grammar;
pub mod lexer;

#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
pub mod test_utils;

pub use analyze::{AnalyzerConfig, Conflict, ConflictKind, GrammarValidationError, ValidationReport};
pub use cst::{CstNode, Element, Match};
pub use diagnostics::{Diagnostic, Diagnostics, DiagnosticsPrinter, Severity};
pub use engine::{ParseConfig, ParseFailure, ParseOutput, Parser};
pub use grammar::{Grammar, GrammarBuilder, GrammarError, RuleId};
pub use lexer::{LexError, LexRecovery, Lexed, TokenKind};

/// Errors surfaced by the engine and its grammar tooling.
///
/// Ordinary mismatches never appear here: combinators report them as `None`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many combinator steps).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (rules nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("rule `{0}` is not defined")]
    UnknownRule(String),

    #[error("grammar has no start rule")]
    NoStartRule,

    #[error(transparent)]
    Parse(#[from] ParseFailure),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Validation(#[from] GrammarValidationError),

    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
