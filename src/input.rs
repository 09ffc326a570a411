//! Runtime input: the tokens a grammar is matched against.

use crate::luthor::{self, LexicalError, Pos, TokKind, Word};

/// Lexical group names given out by [`TokenStream::lex`]. An imported
/// token-item (`ITOKEN NUMBER`) matches tokens whose group equals its name.
pub mod groups {
    pub const IDENT: &str = "IDENT";
    pub const NUMBER: &str = "NUMBER";
    pub const OPERATOR: &str = "OPERATOR";
    pub const BRACKET: &str = "BRACKET";
    pub const STRING: &str = "STRING";
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    group: String,
    text: String,
    pos: Pos,
}

impl Token {
    pub fn new(group: impl Into<String>, text: impl Into<String>, line: usize, column: usize) -> Self {
        Token { group: group.into(), text: text.into(), pos: Pos { line, column } }
    }

    pub fn group(&self) -> &str { &self.group }
    pub fn text(&self) -> &str { &self.text }
    pub fn line(&self) -> usize { self.pos.line }
    pub fn column(&self) -> usize { self.pos.column }
    pub fn pos(&self) -> Pos { self.pos }
}

impl std::fmt::Display for Token {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "{}", self.text)
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn from_tokens(tokens: Vec<Token>) -> Self { TokenStream { tokens } }

    /// Splits `input` with the luthor lexer. Whitespace is dropped; every
    /// other token keeps its text and is put in one of the [`groups`].
    pub fn lex(input: &str) -> Result<Self, LexicalError> {
        let mut tokens = vec![];
        for r in luthor::Lexer::new(input) {
            let (_, tok, _) = r?;
            let group = match tok.kind() {
                TokKind::Space | TokKind::Comment => continue,
                TokKind::Bracket => groups::BRACKET,
                TokKind::Word(Word::Id) => groups::IDENT,
                TokKind::Word(Word::Num) => groups::NUMBER,
                TokKind::Word(Word::Op) => groups::OPERATOR,
                TokKind::Quote(_) => groups::STRING,
            };
            tokens.push(Token { group: group.to_string(), text: tok.data().to_string(), pos: tok.pos() });
        }
        Ok(TokenStream { tokens })
    }

    pub fn tokens(&self) -> &[Token] { &self.tokens }
    pub fn len(&self) -> usize { self.tokens.len() }
    pub fn is_empty(&self) -> bool { self.tokens.is_empty() }

    /// A cursor placed before the first token.
    pub fn cursor(&self) -> Cursor<'_> { Cursor { stream: self, consumed: 0 } }
}

/// A position between two tokens of a stream. `token()` is the token just
/// behind the cursor, `peek()` the one just ahead of it.
#[derive(Copy, Clone, Debug)]
pub struct Cursor<'s> {
    stream: &'s TokenStream,
    consumed: usize,
}

impl<'s> Cursor<'s> {
    pub fn token(&self) -> Option<&'s Token> {
        self.consumed.checked_sub(1).and_then(|i| self.stream.tokens.get(i))
    }

    pub fn peek(&self) -> Option<&'s Token> { self.stream.tokens.get(self.consumed) }

    pub fn next(&self) -> Option<Cursor<'s>> {
        self.peek().map(|_| Cursor { stream: self.stream, consumed: self.consumed + 1 })
    }

    pub fn previous(&self) -> Option<Cursor<'s>> {
        self.consumed.checked_sub(1).map(|consumed| Cursor { stream: self.stream, consumed })
    }

    /// Number of tokens still ahead of the cursor.
    pub fn remaining(&self) -> usize { self.stream.tokens.len() - self.consumed }

    /// Number of tokens behind the cursor.
    pub fn consumed(&self) -> usize { self.consumed }
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests_for_input;
