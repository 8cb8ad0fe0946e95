//! Name-based combinator patterns used to define rules.

/// Unresolved rule body. Terminals and rule references are plain names until
/// [`GrammarBuilder::build`](super::GrammarBuilder::build) resolves them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Term(String),
    Seq(Vec<Pattern>),
    Alt(Vec<Pattern>),
    Opt(Box<Pattern>),
    Many(Box<Pattern>),
    Rule(String),
}

impl Pattern {
    /// Prepends `branch` to this pattern's alternation, or wraps both in a new one.
    ///
    /// Dialects use this to give a new construct priority over an inherited rule.
    pub fn with_leading_branch(self, branch: Pattern) -> Pattern {
        match self {
            Pattern::Alt(mut branches) => {
                branches.insert(0, branch);
                Pattern::Alt(branches)
            }
            other => Pattern::Alt(vec![branch, other]),
        }
    }

    /// Appends `branch` to this pattern's alternation, or wraps both in a new one.
    pub fn with_trailing_branch(self, branch: Pattern) -> Pattern {
        match self {
            Pattern::Alt(mut branches) => {
                branches.push(branch);
                Pattern::Alt(branches)
            }
            other => Pattern::Alt(vec![other, branch]),
        }
    }
}

/// Consume one token named `name`.
pub fn term(name: impl Into<String>) -> Pattern {
    Pattern::Term(name.into())
}

/// Invoke the rule named `name`.
pub fn rule(name: impl Into<String>) -> Pattern {
    Pattern::Rule(name.into())
}

pub fn seq(items: impl IntoIterator<Item = Pattern>) -> Pattern {
    Pattern::Seq(items.into_iter().collect())
}

/// Ordered choice: earlier branches take priority.
pub fn alt(branches: impl IntoIterator<Item = Pattern>) -> Pattern {
    Pattern::Alt(branches.into_iter().collect())
}

pub fn opt(inner: Pattern) -> Pattern {
    Pattern::Opt(Box::new(inner))
}

pub fn many(inner: Pattern) -> Pattern {
    Pattern::Many(Box::new(inner))
}

/// One or more: `inner inner*`.
pub fn many1(inner: Pattern) -> Pattern {
    seq([inner.clone(), many(inner)])
}

/// One or more `item`s separated by `sep`: `item (sep item)*`.
pub fn sep_by1(item: Pattern, sep: Pattern) -> Pattern {
    seq([item.clone(), many(seq([sep, item]))])
}
