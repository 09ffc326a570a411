use super::*;

fn number_token() -> Item {
    Item::token("NUMBER", false)
        .with_alternative(Alternative::new(vec![Rule::Regex(Pattern::new("[0-9]+").unwrap())]))
}

#[test]
fn items_keep_insertion_order() {
    let mut g = Grammar::empty();
    g.add_item(Item::new("B").with_alternative(Alternative::new(vec![Rule::string("b")]))).unwrap();
    g.add_item(Item::new("A").with_alternative(Alternative::new(vec![Rule::item("B")]))).unwrap();
    g.add_item(number_token()).unwrap();
    let names: Vec<_> = g.items().map(Item::name).collect();
    assert_eq!(names, vec!["B", "A", "NUMBER"]);
    assert_eq!(g.start(), None);
}

#[test]
fn add_item_refuses_duplicates() {
    let mut g = Grammar::empty();
    g.add_item(Item::new("A").with_alternative(Alternative::new(vec![Rule::string("x")]))).unwrap();
    let rejected = g.add_item(Item::new("A").with_alternative(Alternative::new(vec![Rule::string("y")])));
    assert_eq!(rejected.unwrap_err(), GrammarError::DuplicateItem("A".into()));
    // the first definition is untouched
    assert_eq!(g.item("A").unwrap().alternatives()[0].rules(), &[Rule::string("x")]);
}

#[test]
fn add_item_refuses_missing_or_empty_alternatives() {
    let mut g = Grammar::empty();
    assert_eq!(g.add_item(Item::new("A")).unwrap_err(), GrammarError::NoAlternatives("A".into()));
    assert_eq!(g.add_item(Item::token("NUMBER", false)).unwrap_err(),
               GrammarError::NoAlternatives("NUMBER".into()));

    let with_empty = Item::new("B")
        .with_alternative(Alternative::new(vec![Rule::string("b")]))
        .with_alternative(Alternative::new(vec![]));
    assert_eq!(g.add_item(with_empty).unwrap_err(), GrammarError::EmptyAlternative("B".into()));

    let imported = Item::token("IDENT", true).with_alternative(Alternative::new(vec![Rule::string("x")]));
    assert_eq!(g.add_item(imported).unwrap_err(), GrammarError::ImportedTokenBody("IDENT".into()));

    // {EMPTY} is how an alternative says it matches nothing
    let empty = Item::new("C").with_alternative(Alternative::new(vec![Rule::Special(Special::Empty)]));
    assert_eq!(g.add_item(empty).unwrap().name(), "C");
    assert_eq!(g.items().count(), 1);
}

#[test]
fn start_item_must_exist() {
    let mut g = Grammar::empty();
    assert_eq!(g.set_start("A"), Err(GrammarError::UnknownStartItem("A".into())));
    assert_eq!(g.start(), None);

    g.add_item(Item::new("A").with_alternative(Alternative::new(vec![Rule::string("a")]))).unwrap();
    g.set_start("A").unwrap();
    assert_eq!(g.start(), Some("A"));
}

#[test]
fn token_items() {
    let mut g = Grammar::empty();
    g.add_item(number_token()).unwrap();
    g.add_item(Item::token("IDENT", true)).unwrap();
    g.add_item(Item::new("EXPR").with_alternative(Alternative::new(vec![Rule::item("NUMBER")]))).unwrap();

    assert!(g.token_item("NUMBER").is_some());
    assert!(g.token_item("IDENT").unwrap().is_imported());
    assert!(g.token_item("EXPR").is_none());
    assert!(g.token_item("MISSING").is_none());
    assert_eq!(g.item("EXPR").unwrap().kind(), ItemKind::Rule);
}

#[test]
fn token_text_matching() {
    let number = number_token();
    assert!(number.matches_text("42"));
    assert!(!number.matches_text("4x"));
    assert!(!number.matches_text(""));

    let keyword = Item::token("KW", false)
        .with_alternative(Alternative::new(vec![Rule::string("if")]))
        .with_alternative(Alternative::new(vec![Rule::string("else")]));
    assert!(keyword.matches_text("else"));
    assert!(!keyword.matches_text("elsewhere"));

    // imported tokens have no alternatives of their own to match with
    assert!(!Item::token("IDENT", true).matches_text("x"));
}

#[test]
fn patterns_match_whole_text() {
    let p = Pattern::new("a|b").unwrap();
    assert!(p.is_match("a"));
    assert!(p.is_match("b"));
    assert!(!p.is_match("ab"));
    assert!(Pattern::new("(").is_err());
    assert_eq!(Pattern::new("a+").unwrap(), Pattern::new("a+").unwrap());
    assert_ne!(Pattern::new("a+").unwrap(), Pattern::new("a*").unwrap());
}

#[test]
fn display_uses_grammar_syntax() {
    let mut g = Grammar::empty();
    g.add_item(number_token()).unwrap();
    g.add_item(Item::token("IDENT", true)).unwrap();
    g.add_item(Item::new("LIST")
        .with_alternative(Alternative::new(vec![
            Rule::string("("),
            Rule::item("NUMBER"),
            Rule::Bracket(Bracket::repeated(vec![Rule::string(","), Rule::item("NUMBER")])),
            Rule::string(")"),
        ]))
        .with_alternative(Alternative::new(vec![
            Rule::Bracket(Bracket::optional(vec![Rule::string("it's")])),
            Rule::Special(Special::Eof),
        ])))
        .unwrap();
    g.set_start("LIST").unwrap();

    expect_test::expect![[r#"
        TOKEN NUMBER: {"[0-9]+"}
        ITOKEN IDENT
        LIST: '(' NUMBER [ ',' NUMBER ] ')' | ( 'it\'s' ) {EOF}
        START LIST
    "#]].assert_eq(&g.to_string());
}
