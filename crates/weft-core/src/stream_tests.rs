use crate::{Token, TokenStream};

fn tokens(names: &[&str]) -> Vec<Token> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Token::new(*name, name.to_lowercase()).at(i as u32, 0, 1, 1))
        .collect()
}

#[test]
fn peek_and_advance() {
    let tokens = tokens(&["Identifier", "Dot", "Identifier"]);
    let mut stream = TokenStream::new(&tokens);

    assert_eq!(stream.peek(0).map(Token::name), Some("Identifier"));
    assert_eq!(stream.peek(1).map(Token::name), Some("Dot"));
    assert_eq!(stream.peek(3), None);

    stream.advance();
    assert_eq!(stream.cursor(), 1);
    assert_eq!(stream.current().map(Token::name), Some("Dot"));
    assert_eq!(stream.remaining(), 2);
}

#[test]
fn advance_at_eof_is_noop() {
    let tokens = tokens(&["A"]);
    let mut stream = TokenStream::new(&tokens);

    assert!(stream.advance().is_some());
    assert!(stream.is_eof());
    assert!(stream.advance().is_none());
    assert_eq!(stream.cursor(), 1);
}

#[test]
fn restore_returns_to_checkpoint() {
    let tokens = tokens(&["A", "B", "C"]);
    let mut stream = TokenStream::new(&tokens);

    stream.advance();
    let checkpoint = stream.checkpoint();
    stream.advance();
    stream.advance();
    assert!(stream.is_eof());

    stream.restore(checkpoint);
    assert_eq!(stream.cursor(), 1);
    assert_eq!(checkpoint.position(), 1);
}

#[test]
fn seek_clamps_to_end() {
    let tokens = tokens(&["A", "B"]);
    let mut stream = TokenStream::new(&tokens);

    stream.seek(10);
    assert_eq!(stream.cursor(), 2);
    assert!(stream.is_eof());
}

#[test]
fn empty_stream_is_eof() {
    let stream = TokenStream::new(&[]);
    assert!(stream.is_empty());
    assert!(stream.is_eof());
    assert_eq!(stream.peek(0), None);
}
