use crate::grammar::{Alternative, Bracket, Grammar, Item, ItemKind, Pattern, Rule, Special};

/// Writes `s` between `quote` characters, escaping the quote and backslashes
/// when `escape_backslash` is set.
fn write_quoted(w: &mut std::fmt::Formatter, s: &str, quote: char, escape_backslash: bool) -> std::fmt::Result {
    write!(w, "{}", quote)?;
    for c in s.chars() {
        if c == quote || (escape_backslash && c == '\\') {
            write!(w, "\\")?;
        }
        write!(w, "{}", c)?;
    }
    write!(w, "{}", quote)
}

impl std::fmt::Display for Special {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Special::Empty => write!(w, "{{EMPTY}}"),
            Special::Eof => write!(w, "{{EOF}}"),
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "{{")?;
        write_quoted(w, self.source(), '"', false)?;
        write!(w, "}}")
    }
}

impl std::fmt::Display for Bracket {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (open, close) = if self.repeat { ('[', ']') } else { ('(', ')') };
        write!(w, "{} {} {}", open, Rules(&self.rules), close)
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Rule::Item(name) => write!(w, "{}", name),
            Rule::String(s) => write_quoted(w, s, '\'', true),
            Rule::Regex(p) => write!(w, "{}", p),
            Rule::Special(s) => write!(w, "{}", s),
            Rule::Bracket(b) => write!(w, "{}", b),
        }
    }
}

/// Space separated rules, as they are written in an alternative.
pub(crate) struct Rules<'a>(pub(crate) &'a [Rule]);

impl std::fmt::Display for Rules<'_> {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, rule) in self.0.iter().enumerate() {
            if i > 0 { write!(w, " ")?; }
            write!(w, "{}", rule)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Alternative {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "{}", Rules(&self.0))
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.kind {
            ItemKind::Token { imported: true } => return write!(w, "ITOKEN {}", self.name),
            ItemKind::Token { imported: false } => write!(w, "TOKEN {}:", self.name)?,
            ItemKind::Rule => write!(w, "{}:", self.name)?,
        }
        for (i, alt) in self.alternatives.iter().enumerate() {
            if i > 0 { write!(w, " |")?; }
            write!(w, " {}", alt)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Grammar {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        for item in self.items() {
            writeln!(w, "{}", item)?;
        }
        if let Some(start) = self.start() {
            writeln!(w, "START {}", start)?;
        }
        Ok(())
    }
}
