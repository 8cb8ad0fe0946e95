#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::sync::Arc;

use weft_lib::engine::Parser;
use weft_lib::{Error, Grammar, LexError, LexRecovery, Lexed, ParseOutput};

pub mod blocks;
pub mod builtin;
pub mod script;

pub use builtin::*;

/// User-facing language type.
pub type Lang = Arc<dyn LangImpl>;

/// Tokenizer entry point of a language.
pub type LexFn = fn(&str, LexRecovery) -> Result<Lexed, LexError>;

/// A grammar together with the lexer that feeds it.
pub trait LangImpl: Send + Sync {
    fn name(&self) -> &str;

    fn grammar(&self) -> &Grammar;

    fn lex(&self, source: &str, recovery: LexRecovery) -> Result<Lexed, LexError>;

    /// Lexes `source`, failing on invalid input, and parses it with the start rule.
    fn parse(&self, source: &str) -> weft_lib::Result<ParseOutput> {
        let lexed = self.lex(source, LexRecovery::Abort)?;
        Parser::new(self.grammar(), &lexed.tokens).parse_start()
    }
}

#[derive(Debug)]
pub struct LangInner {
    name: &'static str,
    grammar: Grammar,
    lexer: LexFn,
}

impl LangInner {
    pub fn new(name: &'static str, grammar: Grammar, lexer: LexFn) -> Self {
        Self {
            name,
            grammar,
            lexer,
        }
    }
}

impl LangImpl for LangInner {
    fn name(&self) -> &str {
        self.name
    }

    fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    fn lex(&self, source: &str, recovery: LexRecovery) -> Result<Lexed, LexError> {
        (self.lexer)(source, recovery)
    }
}

/// Parses `source` and renders any failure against it.
pub fn parse_or_render(lang: &Lang, source: &str) -> Result<ParseOutput, String> {
    lang.parse(source).map_err(|err| match err {
        Error::Parse(failure) => failure.render(source),
        Error::Lex(lex) => {
            let lexed = Lexed {
                tokens: Vec::new(),
                errors: vec![lex],
            };
            lexed.diagnostics().printer().source(source).render()
        }
        other => other.to_string(),
    })
}
