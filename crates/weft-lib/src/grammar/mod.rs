//! Grammar representation.
//!
//! A grammar is an explicit registry of named rules whose bodies are
//! first-class combinator trees ([`Expr`]). The same tree is interpreted by the
//! parsing engine and walked structurally by the analyzer, so one definition is
//! both executable and introspectable.
//!
//! Grammars are assembled with [`GrammarBuilder`] from [`Pattern`]s, which name
//! rules and terminals by string. Building resolves every name: rule references
//! become dense [`RuleId`]s and terminal names are interned into [`Symbol`]s.
//! After `build` a grammar is immutable and can be shared across threads.

mod builder;
mod display;
mod pattern;


use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use serde::Serialize;
use weft_core::{Interner, Symbol};

use crate::analyze::{AnalyzerConfig, GrammarModel, GrammarValidationError, ValidationReport};

pub use builder::{GrammarBuilder, GrammarError};
pub use display::ExprDisplay;
pub use pattern::{Pattern, alt, many, many1, opt, rule, sep_by1, seq, term};

/// Dense rule identifier, equal to the rule's registration order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct RuleId(u32);

impl RuleId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Combinator tree of a rule body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Consume one token whose name is the interned terminal.
    Term(Symbol),
    /// Ordered composition; all elements must match.
    Seq(Vec<Expr>),
    /// Ordered choice; the first matching branch wins.
    Alt(Vec<Expr>),
    /// Zero or one.
    Opt(Box<Expr>),
    /// Zero or more.
    Many(Box<Expr>),
    /// Invoke another rule.
    Ref(RuleId),
}

impl Expr {
    /// Direct sub-expressions, in order.
    pub fn children(&self) -> &[Expr] {
        match self {
            Expr::Seq(items) | Expr::Alt(items) => items,
            Expr::Opt(inner) | Expr::Many(inner) => std::slice::from_ref(inner.as_ref()),
            Expr::Term(_) | Expr::Ref(_) => &[],
        }
    }

    /// Follows a child-index path from this expression.
    pub fn at(&self, path: &[u32]) -> Option<&Expr> {
        let mut expr = self;
        for &step in path {
            expr = expr.children().get(step as usize)?;
        }
        Some(expr)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Term(_) => "Term",
            Expr::Seq(_) => "Seq",
            Expr::Alt(_) => "Alt",
            Expr::Opt(_) => "Opt",
            Expr::Many(_) => "Many",
            Expr::Ref(_) => "Ref",
        }
    }
}

/// A named production.
#[derive(Debug, Clone)]
pub struct Rule {
    id: RuleId,
    name: Arc<str>,
    body: Expr,
}

impl Rule {
    #[inline]
    pub fn id(&self) -> RuleId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared name handle, reused by every CST node this rule produces.
    #[inline]
    pub fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub fn body(&self) -> &Expr {
        &self.body
    }
}

/// Immutable registry of rules plus the terminal vocabulary.
#[derive(Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
    by_name: IndexMap<Arc<str>, RuleId>,
    terminals: Interner,
    start: Option<RuleId>,
    model: OnceLock<GrammarModel>,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    pub(crate) fn from_parts(rules: Vec<Rule>, terminals: Interner, start: Option<RuleId>) -> Self {
        let by_name = rules
            .iter()
            .map(|r| (Arc::clone(&r.name), r.id))
            .collect();
        Self {
            rules,
            by_name,
            terminals,
            start,
            model: OnceLock::new(),
        }
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rule_id(name).map(|id| self.get(id))
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.by_name.get(name).copied()
    }

    /// Rule by id.
    ///
    /// # Panics
    /// Panics if the id belongs to another grammar with fewer rules.
    #[inline]
    pub fn get(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(Rule::name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn start(&self) -> Option<&Rule> {
        self.start.map(|id| self.get(id))
    }

    /// Symbol of a terminal name, if any rule mentions it.
    #[inline]
    pub fn terminal(&self, name: &str) -> Option<Symbol> {
        self.terminals.get(name)
    }

    #[inline]
    pub fn terminal_name(&self, sym: Symbol) -> &str {
        &self.terminals[sym]
    }

    pub fn terminals(&self) -> &Interner {
        &self.terminals
    }

    /// Structural model used by the analyzer, built on first use.
    pub fn model(&self) -> &GrammarModel {
        self.model.get_or_init(|| GrammarModel::build(self))
    }

    /// Runs the analyzer with default bounds.
    pub fn validate(&self) -> Result<ValidationReport, GrammarValidationError> {
        self.validate_with(&AnalyzerConfig::default())
    }

    /// Runs the analyzer and fails if any error-severity defect was found.
    ///
    /// Warnings (exhausted path budgets) are returned in the report.
    pub fn validate_with(
        &self,
        config: &AnalyzerConfig,
    ) -> Result<ValidationReport, GrammarValidationError> {
        let report = self.analyze(config);
        if report.has_errors() {
            return Err(GrammarValidationError::new(report));
        }
        Ok(report)
    }

    /// Runs the analyzer and returns every finding, errors included.
    pub fn analyze(&self, config: &AnalyzerConfig) -> ValidationReport {
        crate::analyze::analyze(self, config)
    }

    /// Formats an expression of this grammar in EBNF-like notation.
    pub fn display<'g>(&'g self, expr: &'g Expr) -> ExprDisplay<'g> {
        ExprDisplay::new(self, expr)
    }
}
