//! Recursion checks the engine can only paper over at runtime.
//!
//! - Left recursion: a cycle in the left-call graph. The engine's guard turns
//!   the re-entry into a mismatch, so the recursive branch can never match.
//! - Nullable repetition: `Many` over an expression that matches empty input
//!   stops after its first zero-width iteration.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use super::model::GrammarModel;
use crate::grammar::{Expr, Grammar, RuleId};

/// Rules that can invoke one another without consuming a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeftRecursion {
    /// The cycle, starting and ending at the same rule.
    pub cycle: Vec<String>,
}

impl fmt::Display for LeftRecursion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain: Vec<_> = self.cycle.iter().map(|name| format!("`{name}`")).collect();
        write!(f, "left recursion: {}", chain.join(" -> "))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NullableRepetition {
    pub rule: String,
    /// The repetition, rendered.
    pub expr: String,
}

impl fmt::Display for NullableRepetition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rule `{}` repeats an expression that matches empty input: {}",
            self.rule, self.expr
        )
    }
}

pub(crate) fn left_recursion(grammar: &Grammar, model: &GrammarModel) -> Vec<LeftRecursion> {
    SccFinder::find(grammar, model)
        .into_iter()
        .filter(|scc| scc.len() > 1 || model.left_calls(scc[0]).contains(&scc[0]))
        .map(|scc| LeftRecursion {
            cycle: cycle_in(model, &scc)
                .into_iter()
                .map(|id| grammar.get(id).name().to_owned())
                .collect(),
        })
        .collect()
}

pub(crate) fn nullable_repetitions(
    grammar: &Grammar,
    model: &GrammarModel,
) -> Vec<NullableRepetition> {
    let mut out = Vec::new();
    for rule in grammar.rules() {
        let mut found = Vec::new();
        collect_nullable_many(rule.body(), model, &mut found);
        out.extend(found.into_iter().map(|expr| NullableRepetition {
            rule: rule.name().to_owned(),
            expr: grammar.display(expr).to_string(),
        }));
    }
    out
}

fn collect_nullable_many<'g>(expr: &'g Expr, model: &GrammarModel, out: &mut Vec<&'g Expr>) {
    if let Expr::Many(inner) = expr
        && model.expr_nullable(inner)
    {
        out.push(expr);
    }
    for child in expr.children() {
        collect_nullable_many(child, model, out);
    }
}

/// A cycle through the component, from its lowest rule id back to it.
fn cycle_in(model: &GrammarModel, scc: &[RuleId]) -> Vec<RuleId> {
    let members: IndexSet<RuleId> = scc.iter().copied().collect();
    let Some(&start) = members.iter().min() else {
        return Vec::new();
    };

    // Breadth-first over left calls inside the component.
    let mut parent: IndexMap<RuleId, RuleId> = IndexMap::new();
    let mut queue = vec![start];
    let mut head = 0;
    while head < queue.len() {
        let current = queue[head];
        head += 1;
        for &next in model.left_calls(current) {
            if !members.contains(&next) {
                continue;
            }
            if next == start {
                let mut cycle = vec![current];
                let mut node = current;
                while let Some(&p) = parent.get(&node) {
                    cycle.push(p);
                    node = p;
                }
                cycle.reverse();
                cycle.push(start);
                return cycle;
            }
            if !parent.contains_key(&next) {
                parent.insert(next, current);
                queue.push(next);
            }
        }
    }
    vec![start]
}

struct SccFinder<'a> {
    model: &'a GrammarModel,
    index: usize,
    stack: Vec<RuleId>,
    on_stack: IndexSet<RuleId>,
    indices: IndexMap<RuleId, usize>,
    lowlinks: IndexMap<RuleId, usize>,
    sccs: Vec<Vec<RuleId>>,
}

impl<'a> SccFinder<'a> {
    fn find(grammar: &Grammar, model: &'a GrammarModel) -> Vec<Vec<RuleId>> {
        let mut finder = Self {
            model,
            index: 0,
            stack: Vec::new(),
            on_stack: IndexSet::new(),
            indices: IndexMap::new(),
            lowlinks: IndexMap::new(),
            sccs: Vec::new(),
        };

        for rule in grammar.rules() {
            if !finder.indices.contains_key(&rule.id()) {
                finder.strongconnect(rule.id());
            }
        }

        finder.sccs
    }

    fn strongconnect(&mut self, id: RuleId) {
        self.indices.insert(id, self.index);
        self.lowlinks.insert(id, self.index);
        self.index += 1;
        self.stack.push(id);
        self.on_stack.insert(id);

        let model = self.model;
        for &next in model.left_calls(id) {
            if !self.indices.contains_key(&next) {
                self.strongconnect(next);
                let low = self.lowlinks[&next].min(self.lowlinks[&id]);
                self.lowlinks.insert(id, low);
            } else if self.on_stack.contains(&next) {
                let low = self.indices[&next].min(self.lowlinks[&id]);
                self.lowlinks.insert(id, low);
            }
        }

        if self.lowlinks[&id] == self.indices[&id] {
            let mut scc = Vec::new();
            while let Some(member) = self.stack.pop() {
                self.on_stack.swap_remove(&member);
                scc.push(member);
                if member == id {
                    break;
                }
            }
            scc.sort();
            self.sccs.push(scc);
        }
    }
}
