use std::collections::VecDeque;
use std::rc::Rc;

use tracing::trace;

use crate::input::{Cursor, Token};
use crate::node::ParseTree;
use crate::table::Action;

#[derive(Clone, Debug)]
pub(crate) enum Symbol<'s> {
    /// Bottom of the stack.
    Start,
    Terminal(&'s Token),
    /// End of input, pushed by a shift under an `{EOF}` guard.
    Eof,
    Reduced(Rc<str>),
}

impl std::fmt::Display for Symbol<'_> {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Symbol::Start => write!(w, "{{START}}"),
            Symbol::Terminal(t) => write!(w, "{:?}", t.text()),
            Symbol::Eof => write!(w, "{{EOF}}"),
            Symbol::Reduced(name) => write!(w, "{}", name),
        }
    }
}

/// A stack entry: the symbol pushed, the actions that are candidates from
/// here on, and which of them is being tried.
#[derive(Clone, Debug)]
pub(crate) struct StateToken<'s> {
    pub(crate) symbol: Symbol<'s>,
    pub(crate) actions: Rc<[Action]>,
    pub(crate) index: usize,
    /// Input position just past the tokens consumed up to this entry.
    pub(crate) cursor: Cursor<'s>,
}

impl<'s> StateToken<'s> {
    pub(crate) fn new(symbol: Symbol<'s>, actions: Rc<[Action]>, cursor: Cursor<'s>) -> Self {
        StateToken { symbol, actions, index: 0, cursor }
    }

    pub(crate) fn selected(&self) -> Option<&Action> { self.actions.get(self.index) }

    /// This entry with its next candidate selected, if it has one left.
    pub(crate) fn advanced(&self) -> Option<StateToken<'s>> {
        (self.index + 1 < self.actions.len()).then(|| StateToken { index: self.index + 1, ..self.clone() })
    }

    /// The row this entry was pushed into. Candidates are laid out as
    /// `Shift(row)` followed by that row's reductions, possibly repeated for
    /// several guards, so the row is given by the nearest shift at or before
    /// the selected action.
    pub(crate) fn row(&self) -> Option<usize> {
        let upto = (self.index + 1).min(self.actions.len());
        self.actions[..upto].iter().rev().find_map(|a| match a {
            Action::Shift(row) => Some(*row),
            _ => None,
        })
    }
}

/// Persistent stack; `clone` is constant time and shares every entry.
#[derive(Clone)]
pub(crate) struct Stack<'s> {
    top: Rc<Frame<'s>>,
}

struct Frame<'s> {
    token: StateToken<'s>,
    below: Option<Rc<Frame<'s>>>,
    len: usize,
}

impl<'s> Stack<'s> {
    pub(crate) fn new(bottom: StateToken<'s>) -> Self {
        Stack { top: Rc::new(Frame { token: bottom, below: None, len: 1 }) }
    }

    pub(crate) fn len(&self) -> usize { self.top.len }

    pub(crate) fn top(&self) -> &StateToken<'s> { &self.top.token }

    pub(crate) fn push(&mut self, token: StateToken<'s>) {
        let len = self.len() + 1;
        self.top = Rc::new(Frame { token, below: Some(self.top.clone()), len });
    }

    /// Drops up to `n` entries; the bottom entry always stays.
    pub(crate) fn pop(&mut self, n: usize) {
        for _ in 0..n {
            match self.top.below.clone() {
                Some(below) => self.top = below,
                None => break,
            }
        }
    }

    pub(crate) fn replace_top(&mut self, token: StateToken<'s>) {
        let (below, len) = (self.top.below.clone(), self.top.len);
        self.top = Rc::new(Frame { token, below, len });
    }

    /// Entries from the top down.
    pub(crate) fn entries(&self) -> impl Iterator<Item=&StateToken<'s>> {
        std::iter::successors(Some(&*self.top), |f| f.below.as_deref()).map(|f| &f.token)
    }
}

struct Checkpoint<'s> {
    stack: Stack<'s>,
    tree: ParseTree,
}

/// The most recent `horizon` choice points. Recording one more drops the
/// oldest, which can then never be revisited.
pub(crate) struct Checkpoints<'s> {
    ring: VecDeque<Checkpoint<'s>>,
    horizon: usize,
}

impl<'s> Checkpoints<'s> {
    pub(crate) fn new(horizon: usize) -> Self {
        Checkpoints { ring: VecDeque::with_capacity(horizon.min(1024)), horizon }
    }

    pub(crate) fn len(&self) -> usize { self.ring.len() }

    pub(crate) fn record(&mut self, stack: &Stack<'s>, tree: &ParseTree) {
        if self.horizon == 0 {
            return;
        }
        if self.ring.len() == self.horizon {
            self.ring.pop_front();
            trace!(horizon = self.horizon, "checkpoint evicted");
        }
        self.ring.push_back(Checkpoint { stack: stack.clone(), tree: tree.clone() });
    }

    /// Moves the newest checkpoint on to its next candidate and hands back
    /// the state to resume from. A checkpoint whose candidates have all been
    /// tried is discarded, and the one before it is retried instead.
    pub(crate) fn retry(&mut self) -> Option<(Stack<'s>, ParseTree)> {
        loop {
            let cp = self.ring.back_mut()?;
            if let Some(next) = cp.stack.top().advanced() {
                cp.stack.replace_top(next);
                return Some((cp.stack.clone(), cp.tree.clone()));
            }
            self.ring.pop_back();
        }
    }
}
