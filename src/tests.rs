use super::*;

const CALL: &str = r#"
# a call with optional arguments
ITOKEN IDENT
TOKEN NUMBER: {"[0-9]+"}

CALL: IDENT '(' ( ARGS ) ')'
ARGS: ARG [ ',' ARG ]
ARG: NUMBER | IDENT | CALL

START CALL
"#;

#[test]
fn end_to_end() -> Result<(), Error> {
    let tree = parse(CALL, "f(1, g(x), h())")?;
    assert_eq!(tree.leaves(), vec!["f", "(", "1", ",", "g", "(", "x", ")", ",", "h", "(", ")", ")"]);
    assert_eq!(tree.root().map(Node::label), Some("CALL"));
    Ok(())
}

#[test]
fn end_to_end_in_steps() -> Result<(), Error> {
    let grammar = Grammar::parse(CALL)?;
    let table = LrTable::build(&grammar)?;
    let parser = GlrParser::new(&grammar, &table).with_config(GlrConfig::default().with_horizon(8));
    for input in ["f()", "f(x)", "f(1, 2, 3)", "f(g(h(1)))"] {
        let tokens = TokenStream::lex(input)?;
        let tree = parser.parse(&tokens)?;
        assert_eq!(tree.leaves().len(), tokens.len(), "{}", input);
    }
    Ok(())
}

#[test]
fn errors_name_their_stage() {
    let grammar_error = parse("A: 'x' |", "x").unwrap_err();
    assert!(matches!(grammar_error, Error::Grammar(_)));
    assert_eq!(grammar_error.to_string(), "grammar: (line:1 column:9) empty rules are not allowed");

    assert_eq!(parse("A: 'x'", "x").unwrap_err(), Error::Table(TableError::NoStartItem));
    assert_eq!(parse(CALL, "f('x)").unwrap_err(),
               Error::Lex(LexicalError::UnterminatedQuote(Pos { line: 1, column: 3 })));
    assert_eq!(parse(CALL, "f(1,)").unwrap_err().to_string(), "parse: unexpected ')' at line 1 column 5");
}
