//! Concrete syntax tree.
//!
//! Every successful rule invocation produces one [`CstNode`]. Its children are
//! the in-order flattening of the [`Match`] the rule body produced: sequences
//! and repetition lists are spliced in, absent optionals disappear.


use std::fmt::{self, Display, Formatter, Write};
use std::ops::Range;
use std::sync::Arc;

use serde::Serialize;
use weft_core::Token;

use crate::grammar::RuleId;

/// Result of evaluating one combinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match {
    Token(Token),
    Node(Arc<CstNode>),
    Seq(Vec<Match>),
    /// Accumulated repetition results, possibly empty.
    List(Vec<Match>),
    /// An optional that did not match.
    Absent,
}

impl Match {
    /// Appends the CST elements of this match to `out`.
    pub fn flatten_into(self, out: &mut Vec<Element>) {
        match self {
            Match::Token(token) => out.push(Element::Token(token)),
            Match::Node(node) => out.push(Element::Node(node)),
            Match::Seq(items) | Match::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
            Match::Absent => {}
        }
    }

    pub fn flatten(self) -> Vec<Element> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Match::Absent)
    }

    /// Item count of a repetition list; `None` for other matches.
    pub fn list_len(&self) -> Option<usize> {
        match self {
            Match::List(items) => Some(items.len()),
            _ => None,
        }
    }
}

/// Child of a CST node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node(Arc<CstNode>),
    Token(Token),
}

impl Element {
    pub fn as_node(&self) -> Option<&CstNode> {
        match self {
            Element::Node(node) => Some(node),
            Element::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Element::Token(token) => Some(token),
            Element::Node(_) => None,
        }
    }
}

/// One matched rule. `start..end` is the token range it consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CstNode {
    name: Arc<str>,
    rule: RuleId,
    children: Vec<Element>,
    start: u32,
    end: u32,
}

impl CstNode {
    pub fn new(name: Arc<str>, rule: RuleId, children: Vec<Element>, start: u32, end: u32) -> Self {
        Self {
            name,
            rule,
            children,
            start,
            end,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule(&self) -> RuleId {
        self.rule
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Index of the first consumed token.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Cursor after the match.
    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn token_range(&self) -> Range<u32> {
        self.start..self.end
    }

    /// True for nodes that consumed no tokens.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn child_nodes(&self) -> impl Iterator<Item = &CstNode> {
        self.children.iter().filter_map(Element::as_node)
    }

    /// First direct child node with the given rule name.
    pub fn child(&self, name: &str) -> Option<&CstNode> {
        self.child_nodes().find(|n| n.name() == name)
    }

    /// All leaf tokens, in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        for child in &self.children {
            match child {
                Element::Token(token) => out.push(token),
                Element::Node(node) => node.collect_tokens(out),
            }
        }
    }

    /// Byte range in the source covered by this node's tokens.
    pub fn source_range(&self) -> Option<Range<usize>> {
        let tokens = self.tokens();
        let first = tokens.first()?;
        let last = tokens.last()?;
        Some(first.offset as usize..last.end_offset() as usize)
    }

    /// Indented text dump, one node or token per line.
    pub fn dump(&self) -> String {
        self.to_string()
    }

    fn dump_into(&self, w: &mut impl Write, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        writeln!(w, "{indent}{} {}..{}", self.name, self.start, self.end)?;
        for child in &self.children {
            match child {
                Element::Node(node) => node.dump_into(w, depth + 1)?,
                Element::Token(token) => {
                    writeln!(w, "{indent}  {} {:?}", token.name(), token.value())?
                }
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Display for CstNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.dump_into(f, 0)
    }
}
