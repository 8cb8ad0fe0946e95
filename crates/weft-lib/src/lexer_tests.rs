use logos::Logos;

use crate::lexer::{GARBAGE, LexRecovery, Lexed, TokenKind, lex};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    #[token("let")]
    Let,

    #[token("=")]
    Eq,

    #[token(";")]
    Semi,

    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    Comment,
}

impl TokenKind for Kind {
    fn name(self) -> &'static str {
        match self {
            Kind::Let => "Let",
            Kind::Eq => "Eq",
            Kind::Semi => "Semi",
            Kind::Number => "Number",
            Kind::Identifier => "Identifier",
            Kind::Whitespace => "Whitespace",
            Kind::Comment => "Comment",
        }
    }

    fn is_trivia(self) -> bool {
        matches!(self, Kind::Whitespace | Kind::Comment)
    }
}

fn format_tokens(lexed: &Lexed) -> String {
    let mut out = String::new();
    for token in &lexed.tokens {
        let marker = if token.has_line_break_before { " nl" } else { "" };
        out.push_str(&format!(
            "{} {:?} {}:{}{}\n",
            token.name(),
            token.value(),
            token.line,
            token.column,
            marker
        ));
    }
    out
}

fn snapshot(input: &str) -> String {
    let lexed = lex::<Kind>(input, LexRecovery::default()).unwrap();
    format_tokens(&lexed)
}

#[test]
fn positions_and_line_breaks() {
    insta::assert_snapshot!(snapshot("let x = 1;\n// c\nlet y = 22;"), @r#"
    Let "let" 1:1
    Identifier "x" 1:5
    Eq "=" 1:7
    Number "1" 1:9
    Semi ";" 1:10
    Let "let" 3:1 nl
    Identifier "y" 3:5
    Eq "=" 3:7
    Number "22" 3:9
    Semi ";" 3:11
    "#);
}

#[test]
fn tokens_are_indexed_and_offset() {
    let lexed = lex::<Kind>("a  bb", LexRecovery::Abort).unwrap();
    let spans: Vec<_> = lexed.tokens.iter().map(|t| (t.index, t.span())).collect();
    assert_eq!(spans, [(0, 0..1), (1, 3..5)]);
}

#[test]
fn columns_count_characters() {
    let lexed = lex::<Kind>("é = 1", LexRecovery::Coalesce).unwrap();
    let eq = &lexed.tokens[1];
    assert_eq!(eq.name(), "Eq");
    assert_eq!(eq.offset, 3);
    assert_eq!(eq.column, 3);
}

#[test]
fn coalesce_merges_error_runs() {
    let lexed = lex::<Kind>("x = #$ 1", LexRecovery::Coalesce).unwrap();
    insta::assert_snapshot!(format_tokens(&lexed), @r##"
    Identifier "x" 1:1
    Eq "=" 1:3
    Garbage "#$" 1:5
    Number "1" 1:8
    "##);
    assert_eq!(lexed.errors.len(), 1);
    insta::assert_snapshot!(lexed.errors[0], @"invalid input `#$` at 1:5");
}

#[test]
fn coalesce_flushes_trailing_run() {
    let lexed = lex::<Kind>("x @@", LexRecovery::Coalesce).unwrap();
    let last = lexed.tokens.last().unwrap();
    assert_eq!(last.name(), GARBAGE);
    assert_eq!(last.value(), "@@");
    assert_eq!(lexed.errors[0].length, 2);
}

#[test]
fn skip_drops_error_runs() {
    let lexed = lex::<Kind>("x = #$ 1", LexRecovery::Skip).unwrap();
    let names: Vec<_> = lexed.tokens.iter().map(|t| t.name()).collect();
    assert_eq!(names, ["Identifier", "Eq", "Number"]);
    assert_eq!(lexed.tokens[2].index, 2);
    assert!(lexed.has_errors());
}

#[test]
fn abort_returns_first_error() {
    let err = lex::<Kind>("x = #$ 1 %", LexRecovery::Abort).unwrap_err();
    assert_eq!(err.offset, 4);
    assert_eq!(err.text, "#$");
}

#[test]
fn lex_errors_render_as_diagnostics() {
    let source = "x = #$ 1";
    let lexed = lex::<Kind>(source, LexRecovery::Coalesce).unwrap();
    let rendered = lexed.diagnostics().printer().source(source).render();
    insta::assert_snapshot!(rendered, @r"
    error: invalid character `#$`
      |
    1 | x = #$ 1
      |     ^^
    ");
}
