use super::*;

use expect_test::expect;

fn table(text: &str) -> LrTable {
    LrTable::build(&Grammar::parse(text).unwrap()).unwrap()
}

fn productions(table: &LrTable) -> Vec<String> {
    table.productions().iter().map(|p| p.to_string()).collect()
}

#[test]
fn repeated_groups_get_a_helper_item() {
    let t = table("S: 'x' [ 'y' ]\nSTART S");
    assert_eq!(productions(&t), vec!["S#1: 'y'", "S#1: S#1 'y'", "S: 'x'", "S: 'x' S#1"]);
    assert_eq!(t.accept_item(), "S");
    expect![[r#"
        initial: shift 0
        row 0:
            S => accept
            'x' => shift 2, reduce S: 'x'
        row 1:
        row 2:
            S#1 => shift 3, reduce S: 'x' S#1
            'y' => reduce S#1: 'y'
        row 3:
            'y' => reduce S#1: S#1 'y'
        row 4:
        row 5:
    "#]].assert_eq(&t.to_string());
}

#[test]
fn optional_groups_become_variants() {
    let t = table("A: 'a' ( 'b' ( 'c' ) ) 'd'\nSTART A");
    assert_eq!(productions(&t), vec!["A: 'a' 'd'", "A: 'a' 'b' 'd'", "A: 'a' 'b' 'c' 'd'"]);
}

#[test]
fn empty_ends_the_alternative() {
    let t = table("A: 'a' ( 'b' ) {EMPTY} 'c' | {EMPTY}\nSTART A");
    assert_eq!(productions(&t), vec!["A: 'a'", "A: 'a' 'b'", "A: {EMPTY}"]);
}

#[test]
fn identical_variants_collapse() {
    let t = table("A: ( 'x' ) | 'x'\nSTART A");
    assert_eq!(productions(&t), vec!["A: {EMPTY}", "A: 'x'"]);
}

#[test]
fn repeated_group_without_content_needs_no_helper() {
    let t = table("A: 'a' [ ( 'x' ) ] | 'b' [ {EMPTY} ]\nSTART A");
    assert_eq!(productions(&t), vec!["A#1: 'x'", "A#1: A#1 'x'", "A: 'a'", "A: 'a' A#1", "A: 'b'"]);
}

#[test]
fn empty_productions_are_offered_before_any_input() {
    let t = table("S: A 'x'\nA: {EMPTY}\nSTART S");
    let initial: Vec<_> = t.initial_actions().iter().map(|a| a.to_string()).collect();
    assert_eq!(initial, vec!["shift 0", "reduce A: {EMPTY}"]);
}

#[test]
fn token_items_are_guards() {
    let t = table("TOKEN NUMBER: {\"[0-9]+\"}\nE: NUMBER | E '+' NUMBER\nSTART E");
    let row = t.row(0).unwrap();
    let guards: Vec<_> = row.entries().map(|(g, _)| g.to_string()).collect();
    assert_eq!(guards, vec!["E", "NUMBER"]);
    // E may be followed by '+' or end the parse
    let after_e = row.candidates_for(&Rule::item("E")).unwrap();
    assert_eq!(after_e.len(), 2);
    assert!(matches!(after_e[0], Action::Shift(_)));
    assert_eq!(after_e[1], Action::Accept);
    assert!(row.candidates_for(&Rule::string("+")).is_none());
}

#[test]
fn build_errors() {
    let g = Grammar::parse("A: 'x'").unwrap();
    assert_eq!(LrTable::build(&g).unwrap_err(), TableError::NoStartItem);
    assert_eq!(LrTable::with_start(&g, "B").unwrap_err(), TableError::UnknownStartItem("B".into()));
    assert!(LrTable::with_start(&g, "A").is_ok());

    let g = Grammar::parse("ITOKEN IDENT\nA: IDENT\nSTART IDENT").unwrap();
    assert_eq!(LrTable::build(&g).unwrap_err(), TableError::TokenStartItem("IDENT".into()));

    let g = Grammar::parse("A: 'x' [ B ]\nSTART A").unwrap();
    assert_eq!(LrTable::build(&g).unwrap_err(),
               TableError::UndefinedItem { item: "B".into(), referenced_by: "A#1".into() });
}
