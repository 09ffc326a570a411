use crate::luthor::*;

fn lex(s: &str) -> impl Iterator<Item=Result<String, LexicalError>> + '_ {
    Lexer::new(s).map(|r|r.map(|(_, tok, _)|tok.into()))
}

fn lex_oks(s: &str) -> impl Iterator<Item=String> + '_ {
    Lexer::new(s).filter_map(|r| -> Option<String> { r.map(|(_, tok, _)|tok.into()).ok() })
}

fn kinds(s: &str) -> Vec<TokKind> {
    Lexer::new(s).with_line_comments('#').map(|r| r.unwrap().1.kind()).collect()
}

fn strings<'a>(v: &'a [&str]) -> impl Iterator<Item=String> + 'a {
    v.iter().map(|s|s.to_string())
}

#[test]
fn lexing_basics() {
    assert!(lex("").eq(strings(&[]).map(|s|Ok(s))));
    assert!(lex_oks("a").eq(strings(&["a"])));
    assert!(lex_oks("ab").eq(strings(&["ab"])));
    assert!(lex_oks("a b").eq(strings(&["a", " ", "b"])));
    assert!(lex_oks("a_1 b").eq(strings(&["a_1", " ", "b"])));
    assert!(lex_oks("(1, 20, 39)").eq(strings(&["(", "1", ",", " ", "20", ",", " ", "39", ")"])));
    assert!(lex_oks("[[a]]").eq(strings(&["[", "[", "a", "]", "]"])));
    assert!(lex_oks("a == b").eq(strings(&["a", " ", "==", " ", "b"])));
}

#[test]
fn lexing_quotations() {
    assert!(lex_oks(r#"'x' "y""#).eq(strings(&["'x'", " ", "\"y\""])));
    assert!(lex_oks(r#"|'x'"#).eq(strings(&["|", "'x'"])));
    assert!(lex_oks(r#"'it\'s'"#).eq(strings(&[r#"'it\'s'"#])));
    assert!(lex_oks(r#""a'b""#).eq(strings(&[r#""a'b""#])));
    assert_eq!(lex("'open").collect::<Vec<_>>(),
               vec![Err(LexicalError::UnterminatedQuote(Pos { line: 1, column: 1 }))]);
}

#[test]
fn lexing_comments_are_opt_in() {
    assert_eq!(kinds("a # b c\nd"), vec![
        TokKind::Word(Word::Id),
        TokKind::Space,
        TokKind::Comment,
        TokKind::Space,
        TokKind::Word(Word::Id),
    ]);
    assert!(lex_oks("a#b").eq(strings(&["a", "#", "b"])));
}

#[test]
fn lexing_tracks_positions() {
    let positions: Vec<(String, Pos)> = Lexer::new("A:\n  'x' | y")
        .map(|r| r.unwrap().1)
        .filter(|t| t.kind() != TokKind::Space)
        .map(|t| (t.data().to_string(), t.pos()))
        .collect();
    assert_eq!(positions, vec![
        ("A".to_string(), Pos { line: 1, column: 1 }),
        (":".to_string(), Pos { line: 1, column: 2 }),
        ("'x'".to_string(), Pos { line: 2, column: 3 }),
        ("|".to_string(), Pos { line: 2, column: 7 }),
        ("y".to_string(), Pos { line: 2, column: 9 }),
    ]);
}

#[test]
fn lexing_separators_are_opt_in() {
    let sep = |s: &'static str| -> Vec<String> {
        Lexer::new(s).with_separators(&[':', '|']).map(|r| r.unwrap().1.into()).collect()
    };
    assert_eq!(sep("A:|'x'"), vec!["A", ":", "|", "'x'"]);
    assert_eq!(sep("a||b"), vec!["a", "|", "|", "b"]);
    assert_eq!(sep("a=:=b"), vec!["a", "=", ":", "=", "b"]);
    assert!(lex_oks("a||b").eq(strings(&["a", "||", "b"])));
    assert_eq!(Lexer::new(":").with_separators(&[':']).next().unwrap().unwrap().1.kind(),
               TokKind::Word(Word::Op));
}
