use std::rc::Rc;

mod tree;

pub use tree::ParseTree;

/// A parse tree node. Leaves carry the text of a consumed token; a parent
/// carries the name of the item whose alternative produced its children.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Node {
    label: Rc<str>,
    kind: NodeKind,
    children: Vec<Rc<Node>>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum NodeKind {
    Token,
    /// Matched by `{EOF}`; consumes nothing.
    Eof,
    Parent,
}

const EOF_LABEL: &str = "{EOF}";

impl Node {
    pub(crate) fn leaf(text: &str) -> Rc<Node> {
        Rc::new(Node { label: text.into(), kind: NodeKind::Token, children: vec![] })
    }

    pub(crate) fn eof() -> Rc<Node> {
        Rc::new(Node { label: EOF_LABEL.into(), kind: NodeKind::Eof, children: vec![] })
    }

    pub(crate) fn parent(label: Rc<str>, children: Vec<Rc<Node>>) -> Rc<Node> {
        Rc::new(Node { label, kind: NodeKind::Parent, children })
    }

    pub fn label(&self) -> &str { &self.label }

    /// Leaves are tokens or the end of input; a parent may still have no
    /// children when it was produced by an empty alternative.
    pub fn is_leaf(&self) -> bool { self.kind != NodeKind::Parent }

    pub fn is_eof(&self) -> bool { self.kind == NodeKind::Eof }

    pub fn children(&self) -> impl Iterator<Item=&Node> + '_ {
        self.children.iter().map(|c| &**c)
    }

    /// Texts of the consumed tokens below this node, in input order. End of
    /// input leaves are not tokens and are left out.
    pub fn leaves(&self) -> Vec<&str> {
        let mut accum = vec![];
        self.collect_leaves(&mut accum);
        accum
    }

    fn collect_leaves<'a>(&'a self, accum: &mut Vec<&'a str>) {
        if self.kind == NodeKind::Token {
            accum.push(&self.label);
        }
        for child in &self.children {
            child.collect_leaves(accum);
        }
    }
}

const NONTERM_BRACKETS: (char, char) = ('(', ')');

impl std::fmt::Display for Node {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_leaf() {
            return write!(w, "{:?}", &*self.label);
        }
        let bd = NONTERM_BRACKETS;
        write!(w, "{NT}{b}", NT=self.label, b=bd.0)?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 { write!(w, " ")?; }
            write!(w, "{}", child)?;
        }
        write!(w, "{d}", d=bd.1)
    }
}
