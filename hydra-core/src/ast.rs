//! Parse-tree nodes.

use std::fmt::Write as _;

use crate::token::Kind;

/// A typed node of the parse tree.
///
/// Statement nodes own their sub-expressions; loop nodes additionally own
/// their body statements after program assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: Kind,
    pub value: String,
    pub children: Vec<Node>,
    /// One-based source line the node was parsed from.
    pub line: Option<usize>,
}

impl Node {
    #[must_use]
    pub fn new(kind: Kind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            children: Vec::new(),
            line: None,
        }
    }

    #[must_use]
    pub fn with_children(kind: Kind, value: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            kind,
            value: value.into(),
            children,
            line: None,
        }
    }

    /// A node marking a failed parse.
    #[must_use]
    pub fn error() -> Self {
        Self::new(Kind::Error, "")
    }

    /// Tag this node and every descendant with `line`.
    pub fn set_line(&mut self, line: usize) {
        self.line = Some(line);
        for child in &mut self.children {
            child.set_line(line);
        }
    }

    /// Whether this node or any descendant is an `Error` node.
    #[must_use]
    pub fn contains_error(&self) -> bool {
        self.kind == Kind::Error || self.children.iter().any(Self::contains_error)
    }

    /// Compact one-line rendering of the subtree, used for tracing.
    ///
    /// `Assignment(=)[Variable(a), Number(5.0)]`
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out);
        out
    }

    fn dump_into(&self, out: &mut String) {
        let _ = write!(out, "{}({})", self.kind, self.value);
        if self.children.is_empty() {
            return;
        }
        out.push('[');
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            child.dump_into(out);
        }
        out.push(']');
    }
}
