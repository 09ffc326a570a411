use std::rc::Rc;

use crate::node::Node;

/// The forest of roots built while parsing. A shift pushes a leaf; a reduce
/// replaces the last `n` roots with one parent. Once parsing is accepted the
/// forest holds a single root.
///
/// Roots are kept in a persistent list, so cloning a tree (which every
/// checkpoint does) shares all of it.
#[derive(Clone, Default)]
pub struct ParseTree {
    top: Option<Rc<Link>>,
}

struct Link {
    node: Rc<Node>,
    below: Option<Rc<Link>>,
    len: usize,
}

impl ParseTree {
    pub fn new() -> Self { ParseTree::default() }

    pub fn len(&self) -> usize { self.top.as_ref().map_or(0, |l| l.len) }

    pub fn is_empty(&self) -> bool { self.top.is_none() }

    fn push(&mut self, node: Rc<Node>) {
        let len = self.len() + 1;
        self.top = Some(Rc::new(Link { node, below: self.top.take(), len }));
    }

    pub(crate) fn shift(&mut self, text: &str) {
        self.push(Node::leaf(text));
    }

    pub(crate) fn shift_eof(&mut self) {
        self.push(Node::eof());
    }

    pub(crate) fn reduce(&mut self, label: Rc<str>, n: usize) {
        let mut children = Vec::with_capacity(n);
        for _ in 0..n {
            let link = match self.top.take() {
                Some(link) => link,
                None => panic!("reduce of {} by {} roots on a forest of {}", label, n, children.len()),
            };
            children.push(link.node.clone());
            self.top = link.below.clone();
        }
        children.reverse();
        self.push(Node::parent(label, children));
    }

    /// Roots, oldest first.
    pub fn roots(&self) -> Vec<&Node> {
        let mut accum = Vec::with_capacity(self.len());
        let mut link = self.top.as_deref();
        while let Some(l) = link {
            accum.push(&*l.node);
            link = l.below.as_deref();
        }
        accum.reverse();
        accum
    }

    /// The root of a completed parse.
    pub fn root(&self) -> Option<&Node> {
        match self.roots()[..] {
            [root] => Some(root),
            _ => None,
        }
    }

    pub fn leaves(&self) -> Vec<&str> {
        self.roots().into_iter().flat_map(|r| r.leaves()).collect()
    }
}

impl PartialEq for ParseTree {
    fn eq(&self, other: &Self) -> bool { self.roots() == other.roots() }
}

impl Eq for ParseTree {}

impl std::fmt::Debug for ParseTree {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "ParseTree({})", self)
    }
}

impl std::fmt::Display for ParseTree {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, root) in self.roots().into_iter().enumerate() {
            if i > 0 { write!(w, " ")?; }
            write!(w, "{}", root)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/tree.rs"]
mod tests_for_tree;
