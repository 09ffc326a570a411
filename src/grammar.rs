use indexmap::map::Entry;
use indexmap::IndexMap;
use regex::Regex;
use thiserror::Error;

// A grammar is an ordered collection of uniquely named items, plus an
// optional start item. Each item owns one or more alternatives (right-hand
// sides), and each alternative is a sequence of rules:
//
// r ::= NAME              <item reference>
//    |  'text'            <string literal>
//    |  {"regex"}         <regex, only inside TOKEN items>
//    |  {EMPTY}           <empty match; drops the rest of the alternative>
//    |  {EOF}             <end of input>
//    |  ( r ... )         <optional, at most once>
//    |  [ r ... ]         <optional, repeated>

#[derive(PartialEq, Eq, Debug, Default)]
pub struct Grammar {
    items: IndexMap<String, Item>,
    start: Option<String>,
}

impl Grammar {
    pub fn empty() -> Self { Grammar::default() }

    pub fn items(&self) -> impl Iterator<Item=&Item> { self.items.values() }

    pub fn item(&self, name: &str) -> Option<&Item> { self.items.get(name) }

    pub fn contains_item(&self, name: &str) -> bool { self.items.contains_key(name) }

    /// Adds `item` at the end of the grammar. The name must be free, and the
    /// item must have only non-empty alternatives: at least one, unless it is
    /// an imported token, which has none.
    pub fn add_item(&mut self, item: Item) -> Result<&Item, GrammarError> {
        let name = || item.name.clone();
        match (item.is_imported(), item.alternatives.is_empty()) {
            (true, false) => return Err(GrammarError::ImportedTokenBody(name())),
            (false, true) => return Err(GrammarError::NoAlternatives(name())),
            _ => {}
        }
        if item.alternatives.iter().any(Alternative::is_empty) {
            return Err(GrammarError::EmptyAlternative(name()));
        }
        match self.items.entry(item.name.clone()) {
            Entry::Occupied(_) => Err(GrammarError::DuplicateItem(item.name)),
            Entry::Vacant(slot) => Ok(&*slot.insert(item)),
        }
    }

    pub fn start(&self) -> Option<&str> { self.start.as_deref() }

    /// Makes `name` the start item; it has to be defined already.
    pub fn set_start(&mut self, name: impl Into<String>) -> Result<(), GrammarError> {
        let name = name.into();
        if !self.contains_item(&name) {
            return Err(GrammarError::UnknownStartItem(name));
        }
        self.start = Some(name);
        Ok(())
    }

    /// The token-item named `name`, if there is one.
    pub fn token_item(&self, name: &str) -> Option<&Item> {
        self.item(name).filter(|item| item.is_token())
    }
}

/// A grammar built by hand that breaks one of the rules the grammar reader
/// enforces.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum GrammarError {
    #[error("item '{0}' is already defined")]
    DuplicateItem(String),
    #[error("item '{0}' has no alternatives")]
    NoAlternatives(String),
    #[error("item '{0}' has an empty alternative")]
    EmptyAlternative(String),
    #[error("imported token '{0}' cannot have alternatives")]
    ImportedTokenBody(String),
    #[error("the start item '{0}' does not exist")]
    UnknownStartItem(String),
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ItemKind {
    /// An ordinary nonterminal.
    Rule,
    /// Matches exactly one token. An imported token-item is satisfied by the
    /// token's lexical group; otherwise by its own string/regex alternatives.
    Token { imported: bool },
}

#[derive(PartialEq, Eq, Debug)]
pub struct Item {
    pub(crate) name: String,
    pub(crate) kind: ItemKind,
    pub(crate) alternatives: Vec<Alternative>,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Item { name: name.into(), kind: ItemKind::Rule, alternatives: vec![] }
    }

    pub fn token(name: impl Into<String>, imported: bool) -> Self {
        Item { name: name.into(), kind: ItemKind::Token { imported }, alternatives: vec![] }
    }

    pub fn with_alternative(mut self, alt: Alternative) -> Self {
        self.alternatives.push(alt);
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn kind(&self) -> ItemKind { self.kind }
    pub fn alternatives(&self) -> &[Alternative] { &self.alternatives }

    pub fn is_token(&self) -> bool { matches!(self.kind, ItemKind::Token { .. }) }
    pub fn is_imported(&self) -> bool { self.kind == ItemKind::Token { imported: true } }

    /// Does `text` satisfy one of this token-item's alternatives?
    ///
    /// Only the leading string or regex rule of each alternative is
    /// consulted; the grammar reader guarantees there is nothing else.
    pub fn matches_text(&self, text: &str) -> bool {
        self.alternatives.iter().any(|alt| match alt.rules().first() {
            Some(Rule::String(s)) => s == text,
            Some(Rule::Regex(p)) => p.is_match(text),
            _ => false,
        })
    }
}

/// A non-empty sequence of rules; `{EMPTY}` stands for matching nothing.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Alternative(pub(crate) Vec<Rule>);

impl Alternative {
    /// An empty `rules` is only refused once the item is added to a grammar.
    pub fn new(rules: Vec<Rule>) -> Self { Alternative(rules) }
    pub fn rules(&self) -> &[Rule] { &self.0 }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Rule {
    Item(String),
    String(String),
    Regex(Pattern),
    Special(Special),
    Bracket(Bracket),
}

impl Rule {
    pub fn item(name: impl Into<String>) -> Self { Rule::Item(name.into()) }
    pub fn string(s: impl Into<String>) -> Self { Rule::String(s.into()) }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Special {
    Empty,
    Eof,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Bracket {
    pub(crate) repeat: bool,
    pub(crate) rules: Vec<Rule>,
}

impl Bracket {
    pub fn optional(rules: Vec<Rule>) -> Self { Bracket { repeat: false, rules } }
    pub fn repeated(rules: Vec<Rule>) -> Self { Bracket { repeat: true, rules } }
    pub fn is_repeat(&self) -> bool { self.repeat }
    pub fn rules(&self) -> &[Rule] { &self.rules }
}

/// A compiled regex terminal. Matching is against the whole token text, and
/// two patterns are equal when their sources are.
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Pattern { source, regex })
    }

    pub fn source(&self) -> &str { &self.source }

    pub fn is_match(&self, text: &str) -> bool { self.regex.is_match(text) }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool { self.source == other.source }
}

impl Eq for Pattern {}

#[cfg(test)]
#[path = "tests/grammar.rs"]
mod tests_for_grammar;
