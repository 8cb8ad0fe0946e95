//! Grammar construction and name resolution.

use std::sync::Arc;

use indexmap::IndexMap;
use weft_core::Interner;

use super::pattern::Pattern;
use super::{Expr, Grammar, Rule, RuleId};

/// Errors detected while building a grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("grammar has no rules")]
    Empty,

    #[error("rule `{0}` is defined more than once")]
    DuplicateRule(String),

    #[error("rule `{rule}` references undefined rule `{reference}`")]
    UndefinedReference { rule: String, reference: String },

    #[error("cannot override undefined rule `{0}`")]
    UnknownOverride(String),

    #[error("start rule `{0}` is not defined")]
    UnknownStart(String),

    #[error("grammar definition failed with {} errors", .0.len())]
    Multiple(Vec<GrammarError>),
}

impl GrammarError {
    /// Individual errors, flattening [`GrammarError::Multiple`].
    pub fn errors(&self) -> &[GrammarError] {
        match self {
            GrammarError::Multiple(errors) => errors,
            single => std::slice::from_ref(single),
        }
    }
}

/// Collects rule patterns and resolves them into a [`Grammar`].
///
/// Rules keep their registration order; that order defines [`RuleId`]s and the
/// order in which validation reports findings.
#[derive(Debug, Clone, Default)]
pub struct GrammarBuilder {
    rules: IndexMap<String, Pattern>,
    start: Option<String>,
    errors: Vec<GrammarError>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from every rule of `base`, keeping its start rule.
    ///
    /// Inherited rules can be replaced with [`override_rule`](Self::override_rule)
    /// and new rules added with [`rule`](Self::rule).
    pub fn extend(base: &Grammar) -> Self {
        let rules = base
            .rules()
            .map(|r| (r.name().to_owned(), to_pattern(base, r.body())))
            .collect();
        Self {
            rules,
            start: base.start().map(|r| r.name().to_owned()),
            errors: Vec::new(),
        }
    }

    /// Registers a new rule. Registering the same name twice is an error.
    pub fn rule(mut self, name: impl Into<String>, pattern: Pattern) -> Self {
        let name = name.into();
        if self.rules.contains_key(&name) {
            self.errors.push(GrammarError::DuplicateRule(name));
            return self;
        }
        self.rules.insert(name, pattern);
        self
    }

    /// Replaces an existing rule. The closure receives the previous pattern.
    pub fn override_rule(
        mut self,
        name: impl Into<String>,
        f: impl FnOnce(Pattern) -> Pattern,
    ) -> Self {
        let name = name.into();
        match self.rules.get_mut(&name) {
            Some(slot) => {
                let previous = std::mem::replace(slot, Pattern::Seq(Vec::new()));
                *slot = f(previous);
            }
            None => self.errors.push(GrammarError::UnknownOverride(name)),
        }
        self
    }

    /// Designates the rule used by [`Parser::parse_start`](crate::engine::Parser::parse_start).
    pub fn start(mut self, name: impl Into<String>) -> Self {
        self.start = Some(name.into());
        self
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        let mut errors = self.errors;

        if self.rules.is_empty() {
            errors.push(GrammarError::Empty);
        }

        let start = match &self.start {
            Some(name) => match self.rules.get_index_of(name) {
                Some(index) => Some(RuleId::new(index)),
                None => {
                    errors.push(GrammarError::UnknownStart(name.clone()));
                    None
                }
            },
            None => None,
        };

        let mut terminals = Interner::new();
        let mut rules = Vec::with_capacity(self.rules.len());
        for (index, (name, pattern)) in self.rules.iter().enumerate() {
            let mut resolver = Resolver {
                rule: name,
                names: &self.rules,
                terminals: &mut terminals,
                errors: &mut errors,
            };
            let body = resolver.resolve(pattern);
            rules.push(Rule {
                id: RuleId::new(index),
                name: Arc::from(name.as_str()),
                body,
            });
        }

        match errors.len() {
            0 => Ok(Grammar::from_parts(rules, terminals, start)),
            1 => Err(errors.remove(0)),
            _ => Err(GrammarError::Multiple(errors)),
        }
    }
}

struct Resolver<'a> {
    rule: &'a str,
    names: &'a IndexMap<String, Pattern>,
    terminals: &'a mut Interner,
    errors: &'a mut Vec<GrammarError>,
}

impl Resolver<'_> {
    fn resolve(&mut self, pattern: &Pattern) -> Expr {
        match pattern {
            Pattern::Term(name) => Expr::Term(self.terminals.intern(name)),
            Pattern::Seq(items) => Expr::Seq(items.iter().map(|p| self.resolve(p)).collect()),
            Pattern::Alt(items) => Expr::Alt(items.iter().map(|p| self.resolve(p)).collect()),
            Pattern::Opt(inner) => Expr::Opt(Box::new(self.resolve(inner))),
            Pattern::Many(inner) => Expr::Many(Box::new(self.resolve(inner))),
            Pattern::Rule(name) => match self.names.get_index_of(name) {
                Some(index) => Expr::Ref(RuleId::new(index)),
                None => {
                    self.errors.push(GrammarError::UndefinedReference {
                        rule: self.rule.to_owned(),
                        reference: name.clone(),
                    });
                    // Placeholder keeps resolution going so every bad name is reported.
                    Expr::Alt(Vec::new())
                }
            },
        }
    }
}

fn to_pattern(grammar: &Grammar, expr: &Expr) -> Pattern {
    match expr {
        Expr::Term(sym) => Pattern::Term(grammar.terminal_name(*sym).to_owned()),
        Expr::Seq(items) => Pattern::Seq(items.iter().map(|e| to_pattern(grammar, e)).collect()),
        Expr::Alt(items) => Pattern::Alt(items.iter().map(|e| to_pattern(grammar, e)).collect()),
        Expr::Opt(inner) => Pattern::Opt(Box::new(to_pattern(grammar, inner))),
        Expr::Many(inner) => Pattern::Many(Box::new(to_pattern(grammar, inner))),
        Expr::Ref(id) => Pattern::Rule(grammar.get(*id).name().to_owned()),
    }
}
