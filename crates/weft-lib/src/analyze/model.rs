//! Structural model of a grammar.
//!
//! Derived once from the rule bodies, never from input:
//! - every alternation site, addressed by rule, ordinal and expression path
//! - nullability of each rule (fixpoint over the rule set)
//! - the reference graph, and the left-call graph of references reachable
//!   before any token is consumed

use indexmap::IndexSet;

use crate::grammar::{Expr, Grammar, RuleId};

/// One `Alt` node of a rule body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltSite {
    pub rule: RuleId,
    /// Preorder index among the alternations of the same rule.
    pub ordinal: u32,
    /// Child indices from the rule body down to the `Alt`.
    pub path: Vec<u32>,
    pub branches: u32,
}

#[derive(Debug, Clone)]
pub struct GrammarModel {
    sites: Vec<AltSite>,
    nullable: Vec<bool>,
    references: Vec<IndexSet<RuleId>>,
    left_calls: Vec<IndexSet<RuleId>>,
}

impl GrammarModel {
    pub(crate) fn build(grammar: &Grammar) -> Self {
        let mut sites = Vec::new();
        let mut references = Vec::with_capacity(grammar.len());
        for rule in grammar.rules() {
            let mut ordinal = 0;
            let mut path = Vec::new();
            collect_sites(rule.id(), rule.body(), &mut path, &mut ordinal, &mut sites);

            let mut refs = IndexSet::new();
            collect_refs(rule.body(), &mut refs);
            references.push(refs);
        }

        let nullable = nullable_fixpoint(grammar);

        let left_calls = grammar
            .rules()
            .map(|rule| {
                let mut calls = IndexSet::new();
                collect_left_calls(rule.body(), &nullable, &mut calls);
                calls
            })
            .collect();

        Self {
            sites,
            nullable,
            references,
            left_calls,
        }
    }

    /// All alternation sites, in rule order then preorder.
    pub fn sites(&self) -> &[AltSite] {
        &self.sites
    }

    pub fn sites_of(&self, rule: RuleId) -> impl Iterator<Item = &AltSite> {
        self.sites.iter().filter(move |site| site.rule == rule)
    }

    /// Whether the rule can match without consuming a token.
    pub fn is_nullable(&self, rule: RuleId) -> bool {
        self.nullable[rule.index()]
    }

    pub fn expr_nullable(&self, expr: &Expr) -> bool {
        expr_nullable(expr, &self.nullable)
    }

    /// Rules referenced anywhere in the body of `rule`.
    pub fn references(&self, rule: RuleId) -> &IndexSet<RuleId> {
        &self.references[rule.index()]
    }

    /// Rules `rule` may invoke before consuming a token.
    pub fn left_calls(&self, rule: RuleId) -> &IndexSet<RuleId> {
        &self.left_calls[rule.index()]
    }
}

fn collect_sites(
    rule: RuleId,
    expr: &Expr,
    path: &mut Vec<u32>,
    ordinal: &mut u32,
    out: &mut Vec<AltSite>,
) {
    if let Expr::Alt(branches) = expr {
        out.push(AltSite {
            rule,
            ordinal: *ordinal,
            path: path.clone(),
            branches: branches.len() as u32,
        });
        *ordinal += 1;
    }
    for (i, child) in expr.children().iter().enumerate() {
        path.push(i as u32);
        collect_sites(rule, child, path, ordinal, out);
        path.pop();
    }
}

fn collect_refs(expr: &Expr, out: &mut IndexSet<RuleId>) {
    if let Expr::Ref(id) = expr {
        out.insert(*id);
    }
    for child in expr.children() {
        collect_refs(child, out);
    }
}

fn nullable_fixpoint(grammar: &Grammar) -> Vec<bool> {
    let mut nullable = vec![false; grammar.len()];
    loop {
        let mut changed = false;
        for rule in grammar.rules() {
            let idx = rule.id().index();
            if !nullable[idx] && expr_nullable(rule.body(), &nullable) {
                nullable[idx] = true;
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

fn expr_nullable(expr: &Expr, nullable: &[bool]) -> bool {
    match expr {
        Expr::Term(_) => false,
        Expr::Seq(items) => items.iter().all(|e| expr_nullable(e, nullable)),
        Expr::Alt(branches) => branches.iter().any(|e| expr_nullable(e, nullable)),
        Expr::Opt(_) | Expr::Many(_) => true,
        Expr::Ref(id) => nullable[id.index()],
    }
}

/// Records references reachable before a token; returns whether `expr` is nullable.
fn collect_left_calls(expr: &Expr, nullable: &[bool], out: &mut IndexSet<RuleId>) -> bool {
    match expr {
        Expr::Term(_) => false,
        Expr::Ref(id) => {
            out.insert(*id);
            nullable[id.index()]
        }
        Expr::Seq(items) => items
            .iter()
            .all(|item| collect_left_calls(item, nullable, out)),
        Expr::Alt(branches) => branches
            .iter()
            .map(|branch| collect_left_calls(branch, nullable, out))
            .fold(false, |acc, n| acc || n),
        Expr::Opt(inner) | Expr::Many(inner) => {
            collect_left_calls(inner, nullable, out);
            true
        }
    }
}
