//! A grammar language and a backtracking GLR parser driven by it.
//!
//! ```text
//! TOKEN NUMBER: {"[0-9]+"}
//! STAT: '(' EXPR [ ',' EXPR ] ')'
//! EXPR: NUMBER
//! START STAT
//! ```
//!
//! [`Grammar::parse`] reads such a text, [`LrTable::build`] derives a
//! shift/reduce table for it, and [`GlrParser`] runs the table over a
//! [`TokenStream`], producing a [`ParseTree`].

use thiserror::Error;

pub type Spanned<Tok, Loc, Error> = Result<(Loc, Tok, Loc), Error>;

mod luthor;

pub mod dsl;
pub mod glr;
pub mod grammar;
pub mod input;
pub mod node;
pub mod table;

mod display;

pub use dsl::{GrammarSyntaxError, SyntaxErrorKind};
pub use glr::{GlrConfig, GlrParser, ParseError};
pub use grammar::{Alternative, Bracket, Grammar, GrammarError, Item, ItemKind, Pattern, Rule, Special};
pub use input::{Cursor, Token, TokenStream};
pub use luthor::{LexicalError, Pos};
pub use node::{Node, ParseTree};
pub use table::{Action, ActionTable, LrTable, Production, Row, TableError};

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum Error {
    #[error("grammar: {0}")]
    Grammar(#[from] GrammarSyntaxError),
    #[error("table: {0}")]
    Table(#[from] TableError),
    #[error("input: {0}")]
    Lex(#[from] LexicalError),
    #[error("parse: {0}")]
    Parse(#[from] ParseError),
}

/// Reads `grammar`, builds its table and parses `input` with the default
/// configuration.
pub fn parse(grammar: &str, input: &str) -> Result<ParseTree, Error> {
    let grammar = Grammar::parse(grammar)?;
    let table = LrTable::build(&grammar)?;
    let tokens = TokenStream::lex(input)?;
    Ok(GlrParser::new(&grammar, &table).parse(&tokens)?)
}

#[cfg(test)]
mod tests;
