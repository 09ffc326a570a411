use super::*;

fn groups_and_texts(stream: &TokenStream) -> Vec<(&str, &str)> {
    stream.tokens().iter().map(|t| (t.group(), t.text())).collect()
}

#[test]
fn lex_drops_whitespace_and_assigns_groups() {
    let stream = TokenStream::lex("(x1, 20) == 'a b'").unwrap();
    assert_eq!(groups_and_texts(&stream), vec![
        (groups::BRACKET, "("),
        (groups::IDENT, "x1"),
        (groups::OPERATOR, ","),
        (groups::NUMBER, "20"),
        (groups::BRACKET, ")"),
        (groups::OPERATOR, "=="),
        (groups::STRING, "'a b'"),
    ]);
}

#[test]
fn lex_keeps_hash_as_an_operator() {
    let stream = TokenStream::lex("a # b").unwrap();
    assert_eq!(groups_and_texts(&stream), vec![
        (groups::IDENT, "a"),
        (groups::OPERATOR, "#"),
        (groups::IDENT, "b"),
    ]);
}

#[test]
fn lex_reports_positions() {
    let stream = TokenStream::lex("[1,\n  2]").unwrap();
    let positions: Vec<_> = stream.tokens().iter().map(|t| (t.line(), t.column())).collect();
    assert_eq!(positions, vec![(1, 1), (1, 2), (1, 3), (2, 3), (2, 4)]);
}

#[test]
fn lex_unterminated_quote() {
    assert_eq!(TokenStream::lex("a 'b"), Err(LexicalError::UnterminatedQuote(Pos { line: 1, column: 3 })));
}

#[test]
fn cursor_walks_both_ways() {
    let stream = TokenStream::from_tokens(vec![
        Token::new("IDENT", "a", 1, 1),
        Token::new("IDENT", "b", 1, 3),
    ]);
    let start = stream.cursor();
    assert_eq!(start.consumed(), 0);
    assert_eq!(start.remaining(), 2);
    assert!(start.token().is_none());
    assert!(start.previous().is_none());
    assert_eq!(start.peek().map(Token::text), Some("a"));

    let one = start.next().unwrap();
    assert_eq!(one.token().map(Token::text), Some("a"));
    assert_eq!(one.peek().map(Token::text), Some("b"));
    assert_eq!(one.remaining(), 1);

    let end = one.next().unwrap();
    assert_eq!(end.remaining(), 0);
    assert!(end.peek().is_none());
    assert!(end.next().is_none());
    assert_eq!(end.previous().unwrap().consumed(), 1);
}

#[test]
fn empty_stream() {
    let stream = TokenStream::lex("  \n ").unwrap();
    assert!(stream.is_empty());
    assert_eq!(stream.cursor().remaining(), 0);
}
