//! Maps luthor tokens onto the tokens of the grammar language.

use crate::luthor::{self, LexicalError, Pos, TokKind as K, Word};

#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tok<'a> {
    // "TOKEN"
    KW_TOKEN,
    // "ITOKEN"
    KW_ITOKEN,
    // "START"
    KW_START,

    // "("
    PAREN_OPEN,
    // ")"
    PAREN_CLOSE,
    // "{"
    CURLY_BRACE_OPEN,
    // "}"
    CURLY_BRACE_CLOSE,
    // "["
    SQUARE_BRACKET_OPEN,
    // "]"
    SQUARE_BRACKET_CLOSE,
    // ":"
    COLON,
    // "|"
    BAR,

    // r"[A-Za-z0-9_]+\s*:" (the colon is consumed)
    ItemName(&'a str),
    // r"[A-Za-z0-9_]+"
    Name(&'a str),
    // r#""(\\"|[^"])*""# or r"'(\\'|[^'])*'", delimiter and raw content
    Literal(char, &'a str),

    // (other)
    Invalid(&'a str),
}

impl std::fmt::Display for Tok<'_> {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Tok::KW_TOKEN => write!(w, "TOKEN"),
            Tok::KW_ITOKEN => write!(w, "ITOKEN"),
            Tok::KW_START => write!(w, "START"),
            Tok::PAREN_OPEN => write!(w, "("),
            Tok::PAREN_CLOSE => write!(w, ")"),
            Tok::CURLY_BRACE_OPEN => write!(w, "{{"),
            Tok::CURLY_BRACE_CLOSE => write!(w, "}}"),
            Tok::SQUARE_BRACKET_OPEN => write!(w, "["),
            Tok::SQUARE_BRACKET_CLOSE => write!(w, "]"),
            Tok::COLON => write!(w, ":"),
            Tok::BAR => write!(w, "|"),
            Tok::ItemName(s) => write!(w, "{}:", s),
            Tok::Name(s) | Tok::Invalid(s) => write!(w, "{}", s),
            Tok::Literal(q, s) => write!(w, "{q}{s}{q}"),
        }
    }
}

/// Tokenizes grammar text, dropping whitespace and `#` comments. Also
/// returns the position just past the end of the text.
pub fn tokenize(input: &str) -> Result<(Vec<(Pos, Tok<'_>)>, Pos), LexicalError> {
    let mut lexer = luthor::Lexer::new(input).with_line_comments('#').with_separators(&[':', '|']);
    let raw = (&mut lexer)
        .map(|r| r.map(|(_, tok, _)| tok))
        .collect::<Result<Vec<_>, _>>()?;
    let end = lexer.pos();

    let mut toks = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let t = raw[i];
        i += 1;
        let tok = match (t.data(), t.kind()) {
            (_, K::Space | K::Comment) => continue,

            (s, K::Bracket) => match s {
                "(" => Tok::PAREN_OPEN,
                ")" => Tok::PAREN_CLOSE,
                "{" => Tok::CURLY_BRACE_OPEN,
                "}" => Tok::CURLY_BRACE_CLOSE,
                "[" => Tok::SQUARE_BRACKET_OPEN,
                "]" => Tok::SQUARE_BRACKET_CLOSE,
                s => Tok::Invalid(s),
            },

            (":", K::Word(Word::Op)) => Tok::COLON,
            ("|", K::Word(Word::Op)) => Tok::BAR,
            (s, K::Word(Word::Op)) => Tok::Invalid(s),

            (s, K::Quote(q)) => Tok::Literal(q, &s[1..(s.len()-1)]),

            (s, K::Word(Word::Id | Word::Num)) if !s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') => {
                Tok::Invalid(s)
            }
            (s, K::Word(Word::Id | Word::Num)) => {
                // an item declaration is a name followed by a colon, with
                // nothing but whitespace in between.
                let mut j = i;
                while j < raw.len() && raw[j].kind() == K::Space { j += 1; }
                if j < raw.len() && raw[j].kind() == K::Word(Word::Op) && raw[j].data() == ":" {
                    i = j + 1;
                    Tok::ItemName(s)
                } else {
                    match s {
                        "TOKEN" => Tok::KW_TOKEN,
                        "ITOKEN" => Tok::KW_ITOKEN,
                        "START" => Tok::KW_START,
                        s => Tok::Name(s),
                    }
                }
            }
        };
        toks.push((t.pos(), tok));
    }
    Ok((toks, end))
}

/// Content of a string literal: `\<quote>` and `\\` lose their backslash,
/// any other escape is kept as written.
pub fn literal_text(raw: &str, quote: char) -> String {
    unescape(raw, |c| c == quote || c == '\\')
}

/// Content of a regex literal: only `\<quote>` is unescaped, so regex
/// escapes such as `\d` or `\\` reach the regex engine untouched.
pub fn pattern_text(raw: &str, quote: char) -> String {
    unescape(raw, |c| c == quote)
}

fn unescape(raw: &str, drops_backslash: impl Fn(char) -> bool) -> String {
    let mut s = String::with_capacity(raw.len());
    let mut cs = raw.chars();
    while let Some(c) = cs.next() {
        if c == '\\' {
            match cs.next() {
                Some(e) if drops_backslash(e) => s.push(e),
                Some(e) => { s.push('\\'); s.push(e); }
                None => s.push('\\'),
            }
        } else {
            s.push(c);
        }
    }
    s
}
