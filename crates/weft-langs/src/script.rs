//! A small expression and statement language.
//!
//! Expressions use one rule per precedence level, each shaped
//! `operand (op operand)*`, so the grammar has no left recursion. Assignment
//! is right-associative and tries `Identifier Eq` before falling back to the
//! operator chain.

use logos::Logos;
use weft_lib::grammar::{Pattern, alt, many, opt, rule, sep_by1, seq, term};
use weft_lib::lexer::{self, TokenKind};
use weft_lib::{Grammar, GrammarError, LexError, LexRecovery, Lexed};

/// Tokens of `script` and of dialects derived from it.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    #[token("let")]
    Let,
    #[token("fn")]
    Fn,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[regex(r"[0-9]+(?:\.[0-9]+)?")]
    Number,
    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    String,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(".")]
    Dot,
    /// Only used by dialects.
    #[token("@")]
    At,

    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!")]
    Bang,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,
    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,
}

impl TokenKind for Token {
    fn name(self) -> &'static str {
        match self {
            Token::Let => "Let",
            Token::Fn => "Fn",
            Token::If => "If",
            Token::Else => "Else",
            Token::While => "While",
            Token::Return => "Return",
            Token::True => "True",
            Token::False => "False",
            Token::Null => "Null",
            Token::Identifier => "Identifier",
            Token::Number => "Number",
            Token::String => "String",
            Token::LParen => "LParen",
            Token::RParen => "RParen",
            Token::LBrace => "LBrace",
            Token::RBrace => "RBrace",
            Token::LBracket => "LBracket",
            Token::RBracket => "RBracket",
            Token::Comma => "Comma",
            Token::Semi => "Semi",
            Token::Dot => "Dot",
            Token::At => "At",
            Token::Eq => "Eq",
            Token::EqEq => "EqEq",
            Token::Bang => "Bang",
            Token::BangEq => "BangEq",
            Token::Lt => "Lt",
            Token::LtEq => "LtEq",
            Token::Gt => "Gt",
            Token::GtEq => "GtEq",
            Token::Plus => "Plus",
            Token::Minus => "Minus",
            Token::Star => "Star",
            Token::Slash => "Slash",
            Token::Percent => "Percent",
            Token::AndAnd => "AndAnd",
            Token::OrOr => "OrOr",
            Token::Whitespace => "Whitespace",
            Token::LineComment => "LineComment",
        }
    }

    fn is_trivia(self) -> bool {
        matches!(self, Token::Whitespace | Token::LineComment)
    }
}

pub fn lex(source: &str, recovery: LexRecovery) -> Result<Lexed, LexError> {
    lexer::lex::<Token>(source, recovery)
}

pub fn grammar() -> Result<Grammar, GrammarError> {
    Grammar::builder()
        .rule("Program", many(rule("Statement")))
        .rule(
            "Statement",
            alt([
                rule("LetStmt"),
                rule("FnDecl"),
                rule("IfStmt"),
                rule("WhileStmt"),
                rule("ReturnStmt"),
                rule("Block"),
                rule("ExprStmt"),
            ]),
        )
        .rule(
            "LetStmt",
            seq([
                term("Let"),
                term("Identifier"),
                opt(seq([term("Eq"), rule("Expression")])),
                term("Semi"),
            ]),
        )
        .rule(
            "FnDecl",
            seq([
                term("Fn"),
                term("Identifier"),
                term("LParen"),
                opt(rule("Params")),
                term("RParen"),
                rule("Block"),
            ]),
        )
        .rule("Params", sep_by1(term("Identifier"), term("Comma")))
        .rule(
            "IfStmt",
            seq([
                term("If"),
                term("LParen"),
                rule("Expression"),
                term("RParen"),
                rule("Block"),
                opt(seq([term("Else"), alt([rule("IfStmt"), rule("Block")])])),
            ]),
        )
        .rule(
            "WhileStmt",
            seq([
                term("While"),
                term("LParen"),
                rule("Expression"),
                term("RParen"),
                rule("Block"),
            ]),
        )
        .rule(
            "ReturnStmt",
            seq([term("Return"), opt(rule("Expression")), term("Semi")]),
        )
        .rule(
            "Block",
            seq([term("LBrace"), many(rule("Statement")), term("RBrace")]),
        )
        .rule("ExprStmt", seq([rule("Expression"), term("Semi")]))
        .rule("Expression", rule("Assignment"))
        .rule(
            "Assignment",
            alt([
                seq([term("Identifier"), term("Eq"), rule("Assignment")]),
                rule("LogicalOr"),
            ]),
        )
        .rule("LogicalOr", binary("LogicalAnd", &["OrOr"]))
        .rule("LogicalAnd", binary("Equality", &["AndAnd"]))
        .rule("Equality", binary("Comparison", &["EqEq", "BangEq"]))
        .rule("Comparison", binary("Term", &["Lt", "LtEq", "Gt", "GtEq"]))
        .rule("Term", binary("Factor", &["Plus", "Minus"]))
        .rule("Factor", binary("Unary", &["Star", "Slash", "Percent"]))
        .rule(
            "Unary",
            alt([
                seq([alt([term("Bang"), term("Minus")]), rule("Unary")]),
                rule("Postfix"),
            ]),
        )
        .rule(
            "Postfix",
            seq([
                rule("Primary"),
                many(alt([
                    rule("CallSuffix"),
                    rule("MemberSuffix"),
                    rule("IndexSuffix"),
                ])),
            ]),
        )
        .rule(
            "CallSuffix",
            seq([term("LParen"), opt(rule("Arguments")), term("RParen")]),
        )
        .rule("Arguments", sep_by1(rule("Expression"), term("Comma")))
        .rule("MemberSuffix", seq([term("Dot"), term("Identifier")]))
        .rule(
            "IndexSuffix",
            seq([term("LBracket"), rule("Expression"), term("RBracket")]),
        )
        .rule(
            "Primary",
            alt([
                rule("Literal"),
                term("Identifier"),
                seq([term("LParen"), rule("Expression"), term("RParen")]),
                seq([term("LBracket"), opt(rule("Arguments")), term("RBracket")]),
            ]),
        )
        .rule(
            "Literal",
            alt([
                term("Null"),
                term("True"),
                term("False"),
                term("Number"),
                term("String"),
            ]),
        )
        .start("Program")
        .build()
}

/// `operand (op operand)*`, where `op` is any of `ops`.
fn binary(operand: &str, ops: &[&str]) -> Pattern {
    let op = match ops {
        [single] => term(*single),
        _ => alt(ops.iter().map(|op| term(*op))),
    };
    seq([rule(operand), many(seq([op, rule(operand)]))])
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod script_tests;
