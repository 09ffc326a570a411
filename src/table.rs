//! Shift/reduce tables.
//!
//! The engine only sees the [`ActionTable`] trait: an initial list of
//! candidate actions, rows addressed by index, and the name of the item whose
//! reduction ends a parse. Each row maps a guarding rule to the actions that
//! become candidates once a symbol matching that rule has been pushed.
//!
//! [`LrTable`] builds such a table from a [`Grammar`] by way of an LR(0)
//! automaton. Conflicts are not resolved; every action the automaton allows
//! is kept as a candidate and the engine picks among them by backtracking.

use std::rc::Rc;

use linear_map::LinearMap;
use thiserror::Error;

use crate::display::Rules;
use crate::grammar::{Grammar, Rule};

mod builder;

/// A flattened alternative: no brackets and no `{EMPTY}` left in `rules`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Production {
    pub(crate) item: Rc<str>,
    pub(crate) rules: Vec<Rule>,
}

impl Production {
    pub fn new(item: &str, rules: Vec<Rule>) -> Self { Production { item: item.into(), rules } }

    pub fn item(&self) -> &str { &self.item }
    pub fn rules(&self) -> &[Rule] { &self.rules }
    pub fn len(&self) -> usize { self.rules.len() }
    pub fn is_empty(&self) -> bool { self.rules.is_empty() }
}

impl std::fmt::Display for Production {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.rules.is_empty() {
            write!(w, "{}: {{EMPTY}}", self.item)
        } else {
            write!(w, "{}: {}", self.item, Rules(&self.rules))
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Action {
    /// Continue from the given row with the next input token.
    Shift(usize),
    /// Replace the top `production.len()` stack entries with one reduced
    /// symbol.
    Reduce(Rc<Production>),
    /// The stack may hold a complete parse.
    Accept,
}

impl std::fmt::Display for Action {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Shift(row) => write!(w, "shift {}", row),
            Action::Reduce(p) => write!(w, "reduce {}", p),
            Action::Accept => write!(w, "accept"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Row {
    entries: LinearMap<Rule, Vec<Action>>,
}

impl Row {
    pub fn candidates_for(&self, guard: &Rule) -> Option<&[Action]> {
        self.entries.get(guard).map(|v| &v[..])
    }

    /// Guards in the order they were added, with their candidates.
    pub fn entries(&self) -> impl Iterator<Item=(&Rule, &[Action])> {
        self.entries.iter().map(|(guard, actions)| (guard, &actions[..]))
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub(crate) fn insert(&mut self, guard: Rule, actions: Vec<Action>) {
        self.entries.insert(guard, actions);
    }
}

pub trait ActionTable {
    /// Candidates for the bottom of the stack, before any input is read.
    fn initial_actions(&self) -> &[Action];

    fn row(&self, index: usize) -> Option<&Row>;

    /// Name of the item a complete parse reduces to.
    fn accept_item(&self) -> &str;
}

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum TableError {
    #[error("the grammar has no start item")]
    NoStartItem,
    #[error("the start item '{0}' does not exist")]
    UnknownStartItem(String),
    #[error("the start item '{0}' is a token")]
    TokenStartItem(String),
    #[error("item '{referenced_by}' refers to undefined item '{item}'")]
    UndefinedItem { item: String, referenced_by: String },
}

#[derive(Clone, Debug)]
pub struct LrTable {
    accept: String,
    initial: Vec<Action>,
    rows: Vec<Row>,
    productions: Vec<Rc<Production>>,
}

impl LrTable {
    /// Builds the table for the grammar's declared start item.
    pub fn build(grammar: &Grammar) -> Result<LrTable, TableError> {
        let start = grammar.start().ok_or(TableError::NoStartItem)?;
        LrTable::with_start(grammar, start)
    }

    pub fn with_start(grammar: &Grammar, start: &str) -> Result<LrTable, TableError> {
        match grammar.item(start) {
            None => Err(TableError::UnknownStartItem(start.to_string())),
            Some(item) if item.is_token() => Err(TableError::TokenStartItem(start.to_string())),
            Some(_) => builder::build(grammar, start),
        }
    }

    pub fn rows(&self) -> &[Row] { &self.rows }

    /// Every production the automaton was built from, bracket helpers
    /// included.
    pub fn productions(&self) -> &[Rc<Production>] { &self.productions }
}

impl ActionTable for LrTable {
    fn initial_actions(&self) -> &[Action] { &self.initial }
    fn row(&self, index: usize) -> Option<&Row> { self.rows.get(index) }
    fn accept_item(&self) -> &str { &self.accept }
}

/// Comma separated actions.
struct Actions<'a>(&'a [Action]);

impl std::fmt::Display for Actions<'_> {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, action) in self.0.iter().enumerate() {
            if i > 0 { write!(w, ", ")?; }
            write!(w, "{}", action)?;
        }
        Ok(())
    }
}

/// The initial actions on one line, then each row with its guards.
impl std::fmt::Display for LrTable {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(w, "initial: {}", Actions(&self.initial))?;
        for (i, row) in self.rows.iter().enumerate() {
            writeln!(w, "row {}:", i)?;
            for (guard, actions) in row.entries() {
                writeln!(w, "    {} => {}", guard, Actions(actions))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/table.rs"]
mod tests_for_table;
