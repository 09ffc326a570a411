//! Reader for the grammar language.
//!
//! ```text
//! # comments run to the end of the line
//! TOKEN NUMBER: {"[0-9]+"}
//! ITOKEN IDENT
//!
//! STAT: '(' EXPR [ ',' EXPR ] ')'
//!     | '[' EXPR ( ',' EXPR ) ']'
//!
//! EXPR: NUMBER | IDENT
//! START STAT
//! ```
//!
//! The reader makes a single pass over the tokens. It remembers the item
//! being defined, the alternative being filled, and the brackets that are
//! still open; a closed bracket is attached to whatever encloses it.

use thiserror::Error;
use tracing::debug;

use crate::grammar::{Alternative, Bracket, Grammar, GrammarError, Item, Pattern, Rule, Special};
use crate::luthor::{LexicalError, Pos};

pub(crate) mod tokens;

use tokens::Tok;

#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("({pos}) {kind}")]
pub struct GrammarSyntaxError {
    pub pos: Pos,
    pub kind: SyntaxErrorKind,
}

impl GrammarSyntaxError {
    fn new(pos: Pos, kind: SyntaxErrorKind) -> Self { GrammarSyntaxError { pos, kind } }
    pub fn line(&self) -> usize { self.pos.line }
    pub fn column(&self) -> usize { self.pos.column }

    fn model(pos: Pos, e: GrammarError) -> Self {
        let kind = match e {
            GrammarError::DuplicateItem(name) => E::DuplicateItem(name),
            GrammarError::UnknownStartItem(name) => E::UnknownStartItem(name),
            GrammarError::ImportedTokenBody(name) => E::ImportedTokenBody(name),
            GrammarError::NoAlternatives(_) | GrammarError::EmptyAlternative(_) => E::EmptyAlternative,
        };
        GrammarSyntaxError::new(pos, kind)
    }
}

impl From<LexicalError> for GrammarSyntaxError {
    fn from(e: LexicalError) -> Self {
        match e {
            LexicalError::UnterminatedQuote(pos) => GrammarSyntaxError::new(pos, SyntaxErrorKind::UnterminatedQuote),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum SyntaxErrorKind {
    #[error("invalid syntax '{0}'")]
    InvalidToken(String),
    #[error("unterminated quotation")]
    UnterminatedQuote,
    #[error("multiple definitions of the same item name '{0}'")]
    DuplicateItem(String),
    #[error("empty rules are not allowed")]
    EmptyAlternative,
    #[error("empty brackets are not allowed")]
    EmptyBracket,
    #[error("invalid bracket close character '{0}'")]
    MismatchedBracket(String),
    #[error("bracket was not closed properly")]
    UnclosedBracket,
    #[error("alternatives cannot be split inside a bracket")]
    BarInsideBracket,
    #[error("the start item '{0}' does not exist")]
    UnknownStartItem(String),
    #[error("invalid {keyword} argument, expected an item name got '{found}'")]
    ExpectedItemName { keyword: &'static str, found: String },
    #[error("invalid brace contents '{0}', expected a quoted regex, EMPTY or EOF")]
    MalformedBrace(String),
    #[error("invalid regex '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },
    #[error("regex matches are only allowed inside TOKEN items")]
    RegexOutsideToken,
    #[error("'{0}' is not inside an item definition")]
    RuleOutsideItem(String),
    #[error("imported token '{0}' cannot have rules")]
    ImportedTokenBody(String),
    #[error("token '{0}' only accepts a single string or regex per alternative")]
    TokenBody(String),
}

use SyntaxErrorKind as E;

impl Grammar {
    /// Reads a grammar written in the grammar language.
    pub fn parse(text: &str) -> Result<Grammar, GrammarSyntaxError> {
        let (toks, end) = tokens::tokenize(text)?;
        let grammar = Reader::new(&toks).read(end)?;
        debug!(items = grammar.items().count(), start = ?grammar.start(), "read grammar");
        Ok(grammar)
    }
}

/// The item being defined and where its definition starts. It joins the
/// grammar once its last alternative is closed.
struct Current {
    pos: Pos,
    item: Item,
}

struct Reader<'t, 'a> {
    toks: &'t [(Pos, Tok<'a>)],
    i: usize,
    grammar: Grammar,
    current: Option<Current>,
    alternative: Vec<Rule>,
    brackets: Vec<(Pos, Bracket)>,
    start: Option<(Pos, String)>,
}

impl<'t, 'a> Reader<'t, 'a> {
    fn new(toks: &'t [(Pos, Tok<'a>)]) -> Self {
        Reader {
            toks,
            i: 0,
            grammar: Grammar::empty(),
            current: None,
            alternative: vec![],
            brackets: vec![],
            start: None,
        }
    }

    fn read(mut self, end: Pos) -> Result<Grammar, GrammarSyntaxError> {
        while let Some(&(pos, tok)) = self.toks.get(self.i) {
            self.i += 1;
            self.step(pos, tok)?;
        }

        if let Some((pos, _)) = self.brackets.last() {
            return Err(GrammarSyntaxError::new(*pos, E::UnclosedBracket));
        }
        self.finish_alternative(end)?;
        self.finish_item()?;

        if let Some((pos, name)) = self.start.take() {
            self.grammar.set_start(name).map_err(|e| GrammarSyntaxError::model(pos, e))?;
        }
        Ok(self.grammar)
    }

    fn next_tok(&mut self) -> Option<(Pos, Tok<'a>)> {
        let t = self.toks.get(self.i).copied();
        if t.is_some() { self.i += 1; }
        t
    }

    /// The token following a keyword.
    fn keyword_arg(&mut self, keyword: &'static str, pos: Pos) -> Result<(Pos, Tok<'a>), GrammarSyntaxError> {
        self.next_tok().ok_or_else(|| {
            GrammarSyntaxError::new(pos, E::ExpectedItemName { keyword, found: String::new() })
        })
    }

    fn step(&mut self, pos: Pos, tok: Tok<'a>) -> Result<(), GrammarSyntaxError> {
        match tok {
            Tok::ItemName(name) => self.begin_item(pos, Item::new(name)),

            Tok::KW_TOKEN => match self.keyword_arg("TOKEN", pos)? {
                (_, Tok::ItemName(name)) => self.begin_item(pos, Item::token(name, false)),
                (p, t) => Err(GrammarSyntaxError::new(p, E::ExpectedItemName { keyword: "TOKEN", found: t.to_string() })),
            },

            Tok::KW_ITOKEN => match self.keyword_arg("ITOKEN", pos)? {
                (_, Tok::Name(name)) => self.begin_item(pos, Item::token(name, true)),
                (p, t) => Err(GrammarSyntaxError::new(p, E::ExpectedItemName { keyword: "ITOKEN", found: t.to_string() })),
            },

            Tok::KW_START => match self.keyword_arg("START", pos)? {
                (p, Tok::Name(name)) => { self.start = Some((p, name.to_string())); Ok(()) }
                (p, t) => Err(GrammarSyntaxError::new(p, E::ExpectedItemName { keyword: "START", found: t.to_string() })),
            },

            Tok::BAR => {
                self.body(pos, tok)?;
                if !self.brackets.is_empty() {
                    return Err(GrammarSyntaxError::new(pos, E::BarInsideBracket));
                }
                self.finish_alternative(pos)
            }

            Tok::Literal(q, raw) => {
                self.body(pos, tok)?;
                self.add_rule(pos, Rule::String(tokens::literal_text(raw, q)))
            }

            Tok::Name(name) => {
                self.body(pos, tok)?;
                self.add_rule(pos, Rule::Item(name.to_string()))
            }

            Tok::CURLY_BRACE_OPEN => {
                self.body(pos, tok)?;
                let rule = self.brace(pos)?;
                self.add_rule(pos, rule)
            }

            Tok::PAREN_OPEN | Tok::SQUARE_BRACKET_OPEN => {
                self.body(pos, tok)?;
                let repeat = tok == Tok::SQUARE_BRACKET_OPEN;
                self.brackets.push((pos, Bracket { repeat, rules: vec![] }));
                Ok(())
            }

            Tok::PAREN_CLOSE | Tok::SQUARE_BRACKET_CLOSE => {
                self.body(pos, tok)?;
                let repeat = tok == Tok::SQUARE_BRACKET_CLOSE;
                let bracket = match self.brackets.pop() {
                    Some((_, b)) if b.repeat == repeat => b,
                    _ => return Err(GrammarSyntaxError::new(pos, E::MismatchedBracket(tok.to_string()))),
                };
                if bracket.rules.is_empty() {
                    return Err(GrammarSyntaxError::new(pos, E::EmptyBracket));
                }
                self.add_rule(pos, Rule::Bracket(bracket))
            }

            Tok::CURLY_BRACE_CLOSE | Tok::COLON | Tok::Invalid(_) => {
                Err(GrammarSyntaxError::new(pos, E::InvalidToken(tok.to_string())))
            }
        }
    }

    /// Checks that a body token may appear here: there must be an item being
    /// defined, and it must not be an imported token.
    fn body(&self, pos: Pos, tok: Tok<'a>) -> Result<(), GrammarSyntaxError> {
        match &self.current {
            None => Err(GrammarSyntaxError::new(pos, E::RuleOutsideItem(tok.to_string()))),
            Some(Current { item, .. }) if item.is_imported() => {
                Err(GrammarSyntaxError::new(pos, E::ImportedTokenBody(item.name().to_string())))
            }
            Some(_) => Ok(()),
        }
    }

    /// `{` has been read: expects a quoted regex, `EMPTY` or `EOF`, then `}`.
    fn brace(&mut self, pos: Pos) -> Result<Rule, GrammarSyntaxError> {
        let (inner_pos, inner) = self.next_tok()
            .ok_or_else(|| GrammarSyntaxError::new(pos, E::MalformedBrace(String::new())))?;
        let rule = match inner {
            Tok::Literal(q, raw) => {
                let source = tokens::pattern_text(raw, q);
                let pattern = Pattern::new(source.clone()).map_err(|e| {
                    GrammarSyntaxError::new(inner_pos, E::InvalidRegex { pattern: source, reason: e.to_string() })
                })?;
                Rule::Regex(pattern)
            }
            Tok::Name("EMPTY") => Rule::Special(Special::Empty),
            Tok::Name("EOF") => Rule::Special(Special::Eof),
            t => return Err(GrammarSyntaxError::new(inner_pos, E::MalformedBrace(t.to_string()))),
        };
        match self.next_tok() {
            Some((_, Tok::CURLY_BRACE_CLOSE)) => Ok(rule),
            Some((p, t)) => Err(GrammarSyntaxError::new(p, E::MalformedBrace(t.to_string()))),
            None => Err(GrammarSyntaxError::new(inner_pos, E::MalformedBrace(inner.to_string()))),
        }
    }

    fn add_rule(&mut self, pos: Pos, rule: Rule) -> Result<(), GrammarSyntaxError> {
        if let Some((_, bracket)) = self.brackets.last_mut() {
            if let Rule::Regex(_) = rule {
                return Err(GrammarSyntaxError::new(pos, E::RegexOutsideToken));
            }
            bracket.rules.push(rule);
            return Ok(());
        }

        match self.current.as_ref().map(|c| &c.item) {
            Some(item) if item.is_token() => {
                let single_terminal = matches!(rule, Rule::String(_) | Rule::Regex(_));
                if !single_terminal || !self.alternative.is_empty() {
                    return Err(GrammarSyntaxError::new(pos, E::TokenBody(item.name().to_string())));
                }
            }
            Some(_) => {
                if let Rule::Regex(_) = rule {
                    return Err(GrammarSyntaxError::new(pos, E::RegexOutsideToken));
                }
            }
            None => unreachable!("body() is checked before any rule is added"),
        }
        self.alternative.push(rule);
        Ok(())
    }

    /// Closes the current alternative of the current item, if any.
    fn finish_alternative(&mut self, pos: Pos) -> Result<(), GrammarSyntaxError> {
        let item = match &mut self.current {
            Some(Current { item, .. }) if !item.is_imported() => item,
            _ => return Ok(()),
        };
        if self.alternative.is_empty() {
            return Err(GrammarSyntaxError::new(pos, E::EmptyAlternative));
        }
        item.alternatives.push(Alternative(std::mem::take(&mut self.alternative)));
        Ok(())
    }

    /// Hands the current item over to the grammar. A name that is already
    /// taken is reported where the second definition starts.
    fn finish_item(&mut self) -> Result<(), GrammarSyntaxError> {
        match self.current.take() {
            Some(Current { pos, item }) => {
                self.grammar.add_item(item).map_err(|e| GrammarSyntaxError::model(pos, e))?;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn begin_item(&mut self, pos: Pos, item: Item) -> Result<(), GrammarSyntaxError> {
        if let Some((p, _)) = self.brackets.last() {
            return Err(GrammarSyntaxError::new(*p, E::UnclosedBracket));
        }
        self.finish_alternative(pos)?;
        self.finish_item()?;
        self.current = Some(Current { pos, item });
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/dsl.rs"]
mod tests_for_dsl;
