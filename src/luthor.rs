//! The Luthor lexer is very simple-minded. There are six categories
//! of "tokens":
//!
//! 1. whitespace: a string made up solely of whitespace characters
//!
//! 2. identifier word: a string made up solely of alphanumeric or underscore
//! characters, where the first character is alphabetic or an underscore
//!
//! 3. numeric word: a string made up solely of alphanumeric or underscore
//! characters, where the first character is numeric
//!
//! 4. operative word: a string made up solely of non-whitespace,
//! non-alphanumeric characters. A run of operators stops at brackets, quotes
//! and at the comment character, so `|'x'` lexes as `|` followed by `'x'`.
//!
//! 5. bracket: every open or close bracket is a token on its own; we don't
//! merge sequences of brackets into one token.
//!
//! 6. quotation: content delimited by `'` or `"`, where a backslash escapes
//! the character that follows it. The token data keeps the delimiters.
//!
//! Line comments and separators are opt-in. The grammar reader asks for `#`
//! comments and for `:` and `|` as separators; a separator is a token on its
//! own, like a bracket, so `A:|'x'` lexes as `A`, `:`, `|`, `'x'`. Runtime
//! input is lexed without either.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::Spanned;
use derive_more::Display;
use thiserror::Error;
use unicode_brackets::UnicodeBrackets;

/// 1-based source position.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
#[display(fmt = "line:{} column:{}", line, column)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub(crate) fn start() -> Self { Pos { line: 1, column: 1 } }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Word {
    Op,
    Num,
    Id,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TokKind {
    Bracket,
    Word(Word),
    /// Holds the delimiting quote character.
    Quote(char),
    Space,
    Comment,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Tok<'a> {
    kind: TokKind,
    data: &'a str,
    pos: Pos,
}

impl<'a> Tok<'a> {
    pub fn kind(&self) -> TokKind { self.kind }
    pub fn data(&self) -> &'a str { self.data }
    pub fn pos(&self) -> Pos { self.pos }
}

impl AsRef<str> for Tok<'_> {
    fn as_ref(&self) -> &str { self.data }
}

impl From<Tok<'_>> for String {
    fn from(tok: Tok<'_>) -> String { tok.data.to_string() }
}

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum LexicalError {
    #[error("({0}) unterminated quotation")]
    UnterminatedQuote(Pos),
}

trait IsOperative { fn is_operative(self) -> bool; }
impl IsOperative for char {
    fn is_operative(self) -> bool {
        !self.is_alphanumeric() && !self.is_whitespace() && self != '_'
    }
}

fn is_quote(c: char) -> bool { c == '\'' || c == '"' }

fn is_bracket(c: char) -> bool { c.is_open_bracket() || c.is_close_bracket() }

/// Characters a particular lexer treats specially.
#[derive(Copy, Clone, Default)]
struct Classes {
    comment: Option<char>,
    separators: &'static [char],
}

impl Classes {
    fn is_separator(&self, c: char) -> bool { self.separators.contains(&c) }
}

pub struct Lexer<'input> {
    input: &'input str,
    chars: Peekable<CharIndices<'input>>,
    classes: Classes,
    pos: Pos,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        Lexer { input, chars: input.char_indices().peekable(), classes: Classes::default(), pos: Pos::start() }
    }

    /// Position just past the last character read so far.
    pub fn pos(&self) -> Pos { self.pos }

    /// Treat everything from `c` up to the end of the line as a comment token.
    pub fn with_line_comments(mut self, c: char) -> Self {
        self.classes.comment = Some(c);
        self
    }

    /// Make each of `chars` a single-character operator token.
    pub fn with_separators(mut self, chars: &'static [char]) -> Self {
        self.classes.separators = chars;
        self
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let (i, c) = self.chars.next()?;
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some((i, c))
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn offset(&mut self) -> usize {
        match self.chars.peek() {
            Some((i, _)) => *i,
            None => self.input.len(),
        }
    }
}

/// Very regular token matching (no extra context needed)
enum R {
    WordOp,
    WordNum,
    WordId,
    Bracket,
    Separator,
    Space,
    Comment,
}

enum RegAction { Complete, Continue, }

impl R {
    fn from_start_char(c: char, classes: &Classes) -> Self {
        if Some(c) == classes.comment { R::Comment }
        else if classes.is_separator(c) { R::Separator }
        else if c.is_numeric() { R::WordNum }
        else if c.is_alphabetic() || c == '_' { R::WordId }
        else if c.is_whitespace() { R::Space }
        else if is_bracket(c) { R::Bracket }
        else { R::WordOp }
    }

    fn action(&self, p: char, classes: &Classes) -> RegAction {
        let go = match self {
            R::Bracket | R::Separator => false,
            R::WordNum | R::WordId => p.is_alphanumeric() || p == '_',
            R::WordOp => {
                p.is_operative() && !is_quote(p) && !is_bracket(p)
                    && Some(p) != classes.comment && !classes.is_separator(p)
            }
            R::Space => p.is_whitespace(),
            R::Comment => p != '\n' && p != '\r',
        };
        if go { RegAction::Continue } else { RegAction::Complete }
    }

    fn kind(&self) -> TokKind {
        match self {
            R::Bracket => TokKind::Bracket,
            R::WordOp | R::Separator => TokKind::Word(Word::Op),
            R::WordNum => TokKind::Word(Word::Num),
            R::WordId => TokKind::Word(Word::Id),
            R::Space => TokKind::Space,
            R::Comment => TokKind::Comment,
        }
    }
}

impl<'input> Lexer<'input> {
    fn read_regular(&mut self, (start, c): (usize, char), pos: Pos) -> <Self as Iterator>::Item {
        let r = R::from_start_char(c, &self.classes);
        while let Some(p) = self.peek() {
            match r.action(p, &self.classes) {
                RegAction::Continue => { self.bump(); }
                RegAction::Complete => break,
            }
        }
        let (input, end) = (self.input, self.offset());
        Ok((start, Tok { kind: r.kind(), data: &input[start..end], pos }, end))
    }

    fn read_quotation(&mut self, (start, delim): (usize, char), pos: Pos) -> <Self as Iterator>::Item {
        loop {
            match self.bump() {
                None => return Err(LexicalError::UnterminatedQuote(pos)),
                // whatever follows the backslash is content, even the delimiter.
                Some((_, '\\')) => {
                    if self.bump().is_none() {
                        return Err(LexicalError::UnterminatedQuote(pos));
                    }
                }
                Some((_, c)) if c == delim => break,
                Some(_) => continue,
            }
        }
        let (input, end) = (self.input, self.offset());
        Ok((start, Tok { kind: TokKind::Quote(delim), data: &input[start..end], pos }, end))
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Spanned<Tok<'input>, usize, LexicalError>;
    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.pos;
        let ic = self.bump()?;
        if is_quote(ic.1) {
            Some(self.read_quotation(ic, pos))
        } else {
            Some(self.read_regular(ic, pos))
        }
    }
}

#[cfg(test)]
#[path = "tests/luthor.rs"]
mod tests_for_luthor;
