//! Bounded enumeration of the token paths a branch can start with.
//!
//! The walk is depth-first over an explicit continuation stack, so a sequence
//! contributes its later elements too, until the lookahead bound. Forks
//! (alternation branches, optional take/skip, repetition continue/stop) are
//! queued as cloned states and explored take-first.
//!
//! Termination does not depend on the grammar:
//! - every repetition iteration must add a token or the repetition stops
//! - a rule already on the expansion chain cuts the path as [`PathEnd::Cyclic`]
//! - the chain never grows past `max_depth`
//! - at most `max_paths` distinct paths are produced per call

use indexmap::IndexSet;
use serde::Serialize;
use weft_core::Symbol;

use super::AnalyzerConfig;
use super::model::GrammarModel;
use crate::grammar::{Expr, Grammar, RuleId};

/// How an enumerated path ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PathEnd {
    /// The branch can end exactly here.
    Complete,
    /// The lookahead bound was reached while input is still required.
    Truncated,
    /// A rule already being expanded was reached again.
    Cyclic,
    /// The expansion depth bound was reached.
    DepthLimit,
}

impl PathEnd {
    pub fn is_cut(self) -> bool {
        self != PathEnd::Complete
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    pub tokens: Vec<Symbol>,
    pub end: PathEnd,
}

impl Path {
    pub fn is_complete(&self) -> bool {
        self.end == PathEnd::Complete
    }

    pub fn names(&self, grammar: &Grammar) -> Vec<String> {
        names(grammar, &self.tokens)
    }
}

pub(crate) fn names(grammar: &Grammar, tokens: &[Symbol]) -> Vec<String> {
    tokens
        .iter()
        .map(|&sym| grammar.terminal_name(sym).to_owned())
        .collect()
}

#[derive(Debug, Default)]
pub(crate) struct Exploration {
    pub paths: IndexSet<Path>,
    /// `max_paths` was reached with states still queued.
    pub exhausted: bool,
}

#[derive(Clone, Copy)]
enum Item<'g> {
    Expr(&'g Expr),
    /// Pops the innermost rule off the expansion chain.
    Leave,
    /// Decides whether a repetition runs again; holds the path length at the
    /// start of the iteration just finished.
    Repeat(&'g Expr, usize),
}

#[derive(Clone)]
struct State<'g> {
    tokens: Vec<Symbol>,
    stack: Vec<Item<'g>>,
    chain: Vec<RuleId>,
}

pub(crate) struct PathExplorer<'g> {
    grammar: &'g Grammar,
    model: &'g GrammarModel,
    max_paths: usize,
    max_depth: usize,
}

impl<'g> PathExplorer<'g> {
    pub fn new(grammar: &'g Grammar, config: &AnalyzerConfig) -> Self {
        Self {
            grammar,
            model: grammar.model(),
            max_paths: config.max_paths,
            max_depth: config.max_depth,
        }
    }

    /// Enumerates paths of `branch`, an alternative inside rule `owner`, up to
    /// `bound` tokens.
    ///
    /// `keep` sees the token prefix after every terminal; a state it rejects is
    /// dropped without producing a path.
    pub fn explore(
        &self,
        owner: RuleId,
        branch: &'g Expr,
        bound: usize,
        keep: impl Fn(&[Symbol]) -> bool,
    ) -> Exploration {
        let mut out = Exploration::default();
        let mut work = vec![State {
            tokens: Vec::new(),
            stack: vec![Item::Expr(branch)],
            chain: vec![owner],
        }];

        while let Some(mut state) = work.pop() {
            let Some(end) = self.run(&mut state, bound, &keep, &mut work) else {
                continue;
            };
            out.paths.insert(Path {
                tokens: state.tokens,
                end,
            });
            if out.paths.len() >= self.max_paths && !work.is_empty() {
                out.exhausted = true;
                break;
            }
        }

        out
    }

    /// Advances one state until it ends or is dropped; forks go to `work`.
    fn run(
        &self,
        state: &mut State<'g>,
        bound: usize,
        keep: &impl Fn(&[Symbol]) -> bool,
        work: &mut Vec<State<'g>>,
    ) -> Option<PathEnd> {
        loop {
            if state.tokens.len() >= bound {
                let end = if self.pending_nullable(state) {
                    PathEnd::Complete
                } else {
                    PathEnd::Truncated
                };
                return Some(end);
            }

            let Some(item) = state.stack.pop() else {
                return Some(PathEnd::Complete);
            };

            match item {
                Item::Leave => {
                    state.chain.pop();
                }
                Item::Repeat(body, start) => {
                    // A zero-width iteration ends the repetition.
                    if state.tokens.len() > start {
                        work.push(state.clone());
                        let len = state.tokens.len();
                        state.stack.push(Item::Repeat(body, len));
                        state.stack.push(Item::Expr(body));
                    }
                }
                Item::Expr(expr) => match expr {
                    Expr::Term(sym) => {
                        state.tokens.push(*sym);
                        if !keep(&state.tokens) {
                            return None;
                        }
                    }
                    Expr::Seq(items) => {
                        state.stack.extend(items.iter().rev().map(Item::Expr));
                    }
                    Expr::Alt(branches) => {
                        let (first, rest) = branches.split_first()?;
                        for other in rest.iter().rev() {
                            let mut fork = state.clone();
                            fork.stack.push(Item::Expr(other));
                            work.push(fork);
                        }
                        state.stack.push(Item::Expr(first));
                    }
                    Expr::Opt(inner) => {
                        work.push(state.clone());
                        state.stack.push(Item::Expr(inner.as_ref()));
                    }
                    Expr::Many(inner) => {
                        work.push(state.clone());
                        let len = state.tokens.len();
                        state.stack.push(Item::Repeat(inner.as_ref(), len));
                        state.stack.push(Item::Expr(inner.as_ref()));
                    }
                    Expr::Ref(id) => {
                        if state.chain.contains(id) {
                            return Some(PathEnd::Cyclic);
                        }
                        if state.chain.len() >= self.max_depth {
                            return Some(PathEnd::DepthLimit);
                        }
                        state.chain.push(*id);
                        state.stack.push(Item::Leave);
                        state.stack.push(Item::Expr(self.grammar.get(*id).body()));
                    }
                },
            }
        }
    }

    fn pending_nullable(&self, state: &State<'g>) -> bool {
        state.stack.iter().all(|item| match item {
            Item::Expr(expr) => self.model.expr_nullable(expr),
            Item::Leave | Item::Repeat(..) => true,
        })
    }
}
