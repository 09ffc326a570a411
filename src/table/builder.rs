use std::rc::Rc;

use indexmap::IndexMap;
use linear_map::LinearMap;
use tracing::debug;

use crate::grammar::{Grammar, Rule, Special};
use super::{Action, LrTable, Production, Row, TableError};

// Productions are numbered from 1; production 0 is the augmented `-> START`,
// whose completion is an `Accept` rather than a `Reduce`.
type LrItem = (usize, usize);

pub(super) fn build(grammar: &Grammar, start: &str) -> Result<LrTable, TableError> {
    let expanded = Expander { grammar, productions: vec![], helpers: 0 }.expand();

    let mut productions = Vec::with_capacity(expanded.len() + 1);
    productions.push(Production { item: "".into(), rules: vec![Rule::item(start)] });
    productions.extend(expanded);

    let mut automaton = Automaton::new(&productions);
    automaton.check_references(grammar)?;
    automaton.run();

    let reductions: Vec<Rc<Production>> = productions[1..].iter().cloned().map(Rc::new).collect();
    let rows = (0..automaton.states.len()).map(|s| {
        let mut row = Row::default();
        for (guard, &target) in automaton.transitions[s].iter() {
            row.insert(guard.clone(), automaton.candidates(target, &reductions));
        }
        row
    }).collect::<Vec<_>>();
    let initial = automaton.candidates(0, &reductions);

    debug!(start, states = rows.len(), productions = reductions.len(), "built LR(0) table");
    Ok(LrTable { accept: start.to_string(), initial, rows, productions: reductions })
}

/// Flattens bracket rules into plain productions.
///
/// `( c )` becomes two variants of the enclosing alternative, one without and
/// one with `c`. `[ c ]` also becomes two variants, the second naming a new
/// left-recursive helper item `OWNER#k` with productions `c` and `OWNER#k c`.
/// `{EMPTY}` ends the sequence it appears in.
struct Expander<'g> {
    grammar: &'g Grammar,
    productions: Vec<Production>,
    helpers: usize,
}

impl<'g> Expander<'g> {
    fn expand(mut self) -> Vec<Production> {
        for item in self.grammar.items().filter(|item| !item.is_token()) {
            self.helpers = 0;
            let owner: Rc<str> = item.name().into();
            for alt in item.alternatives() {
                for rules in self.variants(&owner, alt.rules()) {
                    self.add(Production { item: owner.clone(), rules });
                }
            }
        }
        self.productions
    }

    fn add(&mut self, production: Production) {
        if !self.productions.contains(&production) {
            self.productions.push(production);
        }
    }

    fn variants(&mut self, owner: &Rc<str>, rules: &[Rule]) -> Vec<Vec<Rule>> {
        let mut accum = vec![vec![]];
        for rule in rules {
            let tails = match rule {
                Rule::Special(Special::Empty) => break,
                Rule::Bracket(b) if b.repeat => match self.helper(owner, &b.rules) {
                    Some(helper) => vec![vec![], vec![Rule::Item(helper)]],
                    None => vec![vec![]],
                },
                Rule::Bracket(b) => {
                    let mut tails = vec![vec![]];
                    tails.extend(self.variants(owner, &b.rules));
                    tails
                }
                r => vec![vec![r.clone()]],
            };
            accum = cross(&accum, &tails);
        }
        accum
    }

    /// Declares the helper for a repeated group. Empty bodies are left out;
    /// the group is optional already, and `OWNER#k: OWNER#k` would be a cycle.
    fn helper(&mut self, owner: &Rc<str>, rules: &[Rule]) -> Option<String> {
        let bodies: Vec<_> = self.variants(owner, rules).into_iter().filter(|v| !v.is_empty()).collect();
        if bodies.is_empty() {
            return None;
        }
        self.helpers += 1;
        let name = format!("{}#{}", owner, self.helpers);
        let item: Rc<str> = name.as_str().into();
        for body in &bodies {
            self.add(Production { item: item.clone(), rules: body.clone() });
        }
        for body in bodies {
            let mut rules = vec![Rule::Item(name.clone())];
            rules.extend(body);
            self.add(Production { item: item.clone(), rules });
        }
        Some(name)
    }
}

fn cross(prefixes: &[Vec<Rule>], tails: &[Vec<Rule>]) -> Vec<Vec<Rule>> {
    let mut accum: Vec<Vec<Rule>> = vec![];
    for prefix in prefixes {
        for tail in tails {
            let mut v = prefix.clone();
            v.extend(tail.iter().cloned());
            if !accum.contains(&v) {
                accum.push(v);
            }
        }
    }
    accum
}

struct Automaton<'p> {
    productions: &'p [Production],
    by_item: IndexMap<&'p str, Vec<usize>>,
    // kernel -> closure; a state's number is its index here.
    states: IndexMap<Vec<LrItem>, Vec<LrItem>>,
    transitions: Vec<LinearMap<Rule, usize>>,
}

impl<'p> Automaton<'p> {
    fn new(productions: &'p [Production]) -> Self {
        let mut by_item: IndexMap<&'p str, Vec<usize>> = IndexMap::new();
        for (i, p) in productions.iter().enumerate().skip(1) {
            by_item.entry(&*p.item).or_default().push(i);
        }
        Automaton { productions, by_item, states: IndexMap::new(), transitions: vec![] }
    }

    /// Every item a production refers to is either a token or has
    /// productions of its own.
    fn check_references(&self, grammar: &Grammar) -> Result<(), TableError> {
        for p in self.productions {
            for rule in &p.rules {
                if let Rule::Item(name) = rule {
                    if grammar.token_item(name).is_none() && !self.by_item.contains_key(name.as_str()) {
                        return Err(TableError::UndefinedItem {
                            item: name.clone(),
                            referenced_by: p.item.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn closure(&self, kernel: &[LrItem]) -> Vec<LrItem> {
        let mut items = kernel.to_vec();
        let mut i = 0;
        while let Some(&(p, dot)) = items.get(i) {
            i += 1;
            if let Some(Rule::Item(name)) = self.productions[p].rules.get(dot) {
                for &q in self.by_item.get(name.as_str()).into_iter().flatten() {
                    if !items.contains(&(q, 0)) {
                        items.push((q, 0));
                    }
                }
            }
        }
        items
    }

    fn state(&mut self, mut kernel: Vec<LrItem>) -> usize {
        kernel.sort_unstable();
        kernel.dedup();
        if let Some(s) = self.states.get_index_of(&kernel) {
            return s;
        }
        let closure = self.closure(&kernel);
        self.states.insert_full(kernel, closure).0
    }

    fn run(&mut self) {
        self.state(vec![(0, 0)]);
        let mut s = 0;
        while let Some(closure) = self.states.get_index(s).map(|(_, c)| c.clone()) {
            let mut gotos: LinearMap<Rule, Vec<LrItem>> = LinearMap::new();
            for (p, dot) in closure {
                if let Some(symbol) = self.productions[p].rules.get(dot) {
                    match gotos.get_mut(symbol) {
                        Some(kernel) => kernel.push((p, dot + 1)),
                        None => { gotos.insert(symbol.clone(), vec![(p, dot + 1)]); }
                    }
                }
            }
            let mut row = LinearMap::new();
            for (symbol, kernel) in gotos {
                let target = self.state(kernel);
                row.insert(symbol, target);
            }
            self.transitions.push(row);
            s += 1;
        }
    }

    /// What may happen once state `s` has been entered: carry on from its own
    /// row, reduce any production it completes, or accept.
    fn candidates(&self, s: usize, reductions: &[Rc<Production>]) -> Vec<Action> {
        let mut actions = vec![];
        if !self.transitions[s].is_empty() {
            actions.push(Action::Shift(s));
        }
        let mut accept = false;
        for &(p, dot) in self.states.get_index(s).map_or(&[][..], |(_, c)| &c[..]) {
            if dot < self.productions[p].rules.len() {
                continue;
            }
            match p {
                0 => accept = true,
                p => actions.push(Action::Reduce(reductions[p - 1].clone())),
            }
        }
        if accept {
            actions.push(Action::Accept);
        }
        actions
    }
}
