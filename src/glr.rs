//! Backtracking GLR driver.
//!
//! The driver follows one branch at a time. Whenever a stack entry is pushed
//! with more than one candidate action, the stack and tree are saved as a
//! checkpoint; when the branch being followed dead-ends, the newest
//! checkpoint is resumed with its next candidate.

use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::grammar::{Grammar, Rule, Special};
use crate::input::TokenStream;
use crate::node::ParseTree;
use crate::table::{Action, ActionTable, Production, Row};

mod stack;

use stack::{Checkpoints, Stack, StateToken, Symbol};

pub const DEFAULT_HORIZON: usize = 100;
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct GlrConfig {
    /// How many choice points are kept for backtracking.
    pub horizon: usize,
    /// Upper bound on driver steps; `None` runs until accept or exhaustion.
    pub step_limit: Option<usize>,
}

impl Default for GlrConfig {
    fn default() -> Self {
        GlrConfig { horizon: DEFAULT_HORIZON, step_limit: Some(DEFAULT_STEP_LIMIT) }
    }
}

impl GlrConfig {
    pub fn with_horizon(self, horizon: usize) -> Self { GlrConfig { horizon, ..self } }
    pub fn with_step_limit(self, step_limit: Option<usize>) -> Self { GlrConfig { step_limit, ..self } }
}

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum ParseError {
    /// No branch got past `token`, the furthest token any branch looked at.
    #[error("unexpected '{token}' at line {line} column {column}")]
    Rejected { token: String, line: usize, column: usize },
    /// Some branch consumed all of the input and still could not accept.
    /// The position is that of the last token.
    #[error("unexpected end of input after line {line} column {column}")]
    UnexpectedEnd { line: usize, column: usize },
    #[error("gave up after {0} steps")]
    StepLimit(usize),
    #[error("the action table has no row {0}")]
    MissingRow(usize),
}

pub struct GlrParser<'g, T> {
    grammar: &'g Grammar,
    table: &'g T,
    config: GlrConfig,
}

impl<'g, T: ActionTable> GlrParser<'g, T> {
    pub fn new(grammar: &'g Grammar, table: &'g T) -> Self {
        GlrParser { grammar, table, config: GlrConfig::default() }
    }

    pub fn with_config(self, config: GlrConfig) -> Self { GlrParser { config, ..self } }

    pub fn config(&self) -> &GlrConfig { &self.config }

    pub fn parse(&self, input: &TokenStream) -> Result<ParseTree, ParseError> {
        let bottom = StateToken::new(Symbol::Start, self.table.initial_actions().into(), input.cursor());
        let run = Run {
            grammar: self.grammar,
            table: self.table,
            config: &self.config,
            input,
            stack: Stack::new(bottom),
            tree: ParseTree::new(),
            checkpoints: Checkpoints::new(self.config.horizon),
            steps: 0,
            furthest: 0,
        };
        run.run()
    }
}

struct Run<'r, 's, T> {
    grammar: &'r Grammar,
    table: &'r T,
    config: &'r GlrConfig,
    input: &'s TokenStream,
    stack: Stack<'s>,
    tree: ParseTree,
    checkpoints: Checkpoints<'s>,
    steps: usize,
    // index of the furthest token examined by any branch
    furthest: usize,
}

impl<'r, 's, T: ActionTable> Run<'r, 's, T> {
    fn run(mut self) -> Result<ParseTree, ParseError> {
        if self.stack.top().actions.len() > 1 {
            self.checkpoints.record(&self.stack, &self.tree);
        }
        loop {
            self.steps += 1;
            if let Some(limit) = self.config.step_limit {
                if self.steps > limit {
                    debug!(steps = limit, "step limit reached");
                    return Err(ParseError::StepLimit(limit));
                }
            }

            let top = self.stack.top().clone();
            let advanced = match top.selected() {
                None | Some(Action::Accept) => {
                    if self.accepts(&top) {
                        debug!(steps = self.steps, tokens = self.input.len(), "accepted");
                        return Ok(self.tree);
                    }
                    // whatever input is left is what kept this branch from accepting
                    self.furthest = self.furthest.max(top.cursor.consumed());
                    false
                }
                Some(Action::Shift(row)) => self.shift(*row, &top)?,
                Some(Action::Reduce(production)) => self.reduce(production, &top)?,
            };

            if !advanced && !self.next_candidate() && !self.backtrack() {
                let error = self.rejection();
                debug!(steps = self.steps, %error, "rejected");
                return Err(error);
            }
        }
    }

    fn accepts(&self, top: &StateToken<'s>) -> bool {
        self.stack.len() == 2
            && top.cursor.remaining() == 0
            && matches!(&top.symbol, Symbol::Reduced(name) if &**name == self.table.accept_item())
    }

    fn row(&self, index: usize) -> Result<&'r Row, ParseError> {
        self.table.row(index).ok_or(ParseError::MissingRow(index))
    }

    fn shift(&mut self, row: usize, top: &StateToken<'s>) -> Result<bool, ParseError> {
        let candidates_row = self.row(row)?;
        let cursor = top.cursor;
        self.furthest = self.furthest.max(cursor.consumed());

        let (symbol, after) = match cursor.peek().zip(cursor.next()) {
            Some((token, next)) => (Symbol::Terminal(token), next),
            None => (Symbol::Eof, cursor),
        };
        let actions = self.candidates(candidates_row, &symbol);
        if actions.is_empty() {
            trace!(row, token = %symbol, "no shift");
            return Ok(false);
        }
        trace!(row, token = %symbol, candidates = actions.len(), "shift");

        match &symbol {
            Symbol::Terminal(token) => self.tree.shift(token.text()),
            _ => self.tree.shift_eof(),
        }
        self.push(StateToken::new(symbol, actions.into(), after));
        Ok(true)
    }

    fn reduce(&mut self, production: &Rc<Production>, top: &StateToken<'s>) -> Result<bool, ParseError> {
        let n = production.len();
        let fits = self.stack.len() > n
            && self.stack.entries().zip(production.rules().iter().rev())
                .all(|(entry, rule)| self.matches(rule, &entry.symbol));
        if !fits {
            trace!(%production, "no reduce");
            return Ok(false);
        }

        let mut stack = self.stack.clone();
        stack.pop(n);
        let row = match stack.top().row() {
            Some(row) => row,
            None => {
                trace!(%production, "no row to continue from");
                return Ok(false);
            }
        };
        let symbol = Symbol::Reduced(production.item.clone());
        let actions = self.candidates(self.row(row)?, &symbol);
        if actions.is_empty() {
            trace!(%production, row, "no goto");
            return Ok(false);
        }
        trace!(%production, row, candidates = actions.len(), "reduce");

        self.stack = stack;
        self.tree.reduce(production.item.clone(), n);
        self.push(StateToken::new(symbol, actions.into(), top.cursor));
        Ok(true)
    }

    fn push(&mut self, token: StateToken<'s>) {
        let choice = token.actions.len() > 1;
        self.stack.push(token);
        if choice {
            self.checkpoints.record(&self.stack, &self.tree);
        }
    }

    /// With a horizon of 0 no entry is ever saved, but a failed action
    /// leaves stack and tree untouched, so the top entry can still move on to
    /// its next candidate in place. Otherwise the newest checkpoint holds the
    /// top entry and backtracking does the same thing.
    fn next_candidate(&mut self) -> bool {
        if self.config.horizon > 0 {
            return false;
        }
        match self.stack.top().advanced() {
            Some(next) => {
                trace!(action = ?next.selected(), "next candidate");
                self.stack.replace_top(next);
                true
            }
            None => false,
        }
    }

    fn backtrack(&mut self) -> bool {
        match self.checkpoints.retry() {
            Some((stack, tree)) => {
                trace!(checkpoints = self.checkpoints.len(), action = ?stack.top().selected(), "backtrack");
                self.stack = stack;
                self.tree = tree;
                true
            }
            None => false,
        }
    }

    /// Candidates of every guard in `row` that `symbol` matches, in row
    /// order. A guard whose candidates repeat an earlier guard's adds nothing.
    fn candidates(&self, row: &Row, symbol: &Symbol<'s>) -> Vec<Action> {
        let mut groups: Vec<&[Action]> = vec![];
        for (guard, actions) in row.entries() {
            if self.matches(guard, symbol) && !groups.contains(&actions) {
                groups.push(actions);
            }
        }
        groups.concat()
    }

    fn matches(&self, guard: &Rule, symbol: &Symbol<'s>) -> bool {
        match (guard, symbol) {
            (Rule::Bracket(_), _) | (Rule::Special(Special::Empty), _) => {
                panic!("`{}` cannot guard an action; brackets and {{EMPTY}} are expanded before tables are built", guard)
            }
            (Rule::Special(Special::Eof), Symbol::Eof) => true,
            (Rule::Item(name), Symbol::Reduced(reduced)) => name.as_str() == &**reduced,
            (Rule::Item(name), Symbol::Terminal(token)) => match self.grammar.token_item(name) {
                Some(item) if item.is_imported() => token.group() == name.as_str(),
                Some(item) => item.matches_text(token.text()),
                None => false,
            },
            (Rule::String(s), Symbol::Terminal(token)) => s.as_str() == token.text(),
            (Rule::Regex(p), Symbol::Terminal(token)) => p.is_match(token.text()),
            _ => false,
        }
    }

    fn rejection(&self) -> ParseError {
        let tokens = self.input.tokens();
        match tokens.get(self.furthest) {
            Some(t) => ParseError::Rejected { token: t.text().to_string(), line: t.line(), column: t.column() },
            None => {
                let (line, column) = tokens.last().map_or((1, 1), |t| (t.line(), t.column()));
                ParseError::UnexpectedEnd { line, column }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/glr.rs"]
mod tests_for_glr;
