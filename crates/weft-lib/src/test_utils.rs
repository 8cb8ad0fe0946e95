//! Test utilities.

use weft_core::Token;

use crate::engine::{ParseConfig, Parser, Trailing};
use crate::grammar::Grammar;

/// Tokens named `names`, valued with the lowercased name, laid out on one line
/// separated by single spaces.
pub fn toks(names: &[&str]) -> Vec<Token> {
    let pairs: Vec<_> = names.iter().map(|n| (*n, n.to_lowercase())).collect();
    lay_out(pairs.iter().map(|(n, v)| (*n, v.as_str())))
}

/// Tokens from `(name, value)` pairs, laid out like [`toks`].
pub fn toks_with(pairs: &[(&str, &str)]) -> Vec<Token> {
    lay_out(pairs.iter().copied())
}

fn lay_out<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<Token> {
    let mut offset = 0u32;
    pairs
        .enumerate()
        .map(|(i, (name, value))| {
            let token = Token::new(name, value).at(i as u32, offset, 1, offset + 1);
            offset = token.end_offset() + 1;
            token
        })
        .collect()
}

/// Parses `tokens` with `rule` and returns the CST dump or the failure message.
pub fn parse_dump(grammar: &Grammar, rule: &str, tokens: &[Token]) -> String {
    match Parser::new(grammar, tokens).parse(rule) {
        Ok(output) => output.root.dump(),
        Err(err) => format!("error: {err}"),
    }
}

/// Like [`parse_dump`], but leaves trailing tokens unconsumed instead of failing.
pub fn parse_prefix_dump(grammar: &Grammar, rule: &str, tokens: &[Token]) -> String {
    let config = ParseConfig::default().with_trailing(Trailing::Allow);
    match Parser::with_config(grammar, tokens, config).parse(rule) {
        Ok(output) => format!("{}end: {}", output.root.dump(), output.end),
        Err(err) => format!("error: {err}"),
    }
}
