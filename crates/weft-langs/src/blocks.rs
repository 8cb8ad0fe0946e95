//! `script` extended with annotated blocks: `@retry(3) { ... }`.
//!
//! Shares the `script` lexer. The new statement form is tried before every
//! inherited one.

use weft_lib::grammar::{GrammarBuilder, opt, rule, seq, term};
use weft_lib::{Grammar, GrammarError};

use crate::script;

pub fn grammar() -> Result<Grammar, GrammarError> {
    let base = script::grammar()?;
    GrammarBuilder::extend(&base)
        .override_rule("Statement", |previous| {
            previous.with_leading_branch(rule("BlockStmt"))
        })
        .rule(
            "BlockStmt",
            seq([
                term("At"),
                term("Identifier"),
                opt(rule("CallSuffix")),
                rule("Block"),
            ]),
        )
        .build()
}
