//! Combinator interpreter.
//!
//! Rule bodies are evaluated directly from the grammar's [`Expr`] trees.
//! Every combinator either yields a [`Match`] with the cursor advanced past
//! it, or yields `None` with the cursor exactly where it was before the
//! attempt. Only resource limits escape as errors.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use weft_core::{Symbol, Token};

use super::cache::{CacheEntry, CacheStats, PackratCache};
use super::config::{ParseConfig, Trailing};
use super::error::{FailureReason, ParseFailure, RuntimeError};
use super::state::ParserState;
use super::trace::{NoopTracer, Tracer};
use crate::cst::{CstNode, Match};
use crate::grammar::{Expr, Grammar, RuleId};
use crate::{Error, Result};

/// Counters reported with every parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub cache: CacheStats,
    /// Combinator steps taken.
    pub steps: u32,
    /// Times the left-recursion guard cut an invocation.
    pub guard_hits: u64,
}

/// Successful top-level parse.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub root: Arc<CstNode>,
    /// Cursor after the start rule; less than the token count only with
    /// [`Trailing::Allow`].
    pub end: u32,
    pub stats: ParseStats,
}

/// One parse session over one token slice.
///
/// Owns its parser state and packrat cache. Top-level parses consume the
/// parser, so neither can be reused for another token stream.
pub struct Parser<'g, 't> {
    grammar: &'g Grammar,
    state: ParserState<'t>,
    cache: PackratCache,
    /// Terminal symbol of each token, resolved once up front.
    kinds: Vec<Option<Symbol>>,
    /// `(rule, start)` invocations currently being evaluated.
    active: HashSet<(RuleId, u32)>,
    guard_hits: u64,
    exec_fuel: u32,
    config: ParseConfig,
}

impl<'g, 't> Parser<'g, 't> {
    pub fn new(grammar: &'g Grammar, tokens: &'t [Token]) -> Self {
        Self::with_config(grammar, tokens, ParseConfig::default())
    }

    pub fn with_config(grammar: &'g Grammar, tokens: &'t [Token], config: ParseConfig) -> Self {
        let kinds = tokens.iter().map(|t| grammar.terminal(t.name())).collect();
        Self {
            grammar,
            state: ParserState::new(tokens),
            cache: PackratCache::new(config.cache),
            kinds,
            active: HashSet::new(),
            guard_hits: 0,
            exec_fuel: config.limits.exec_fuel,
            config,
        }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn cursor(&self) -> u32 {
        self.state.cursor()
    }

    pub fn stats(&self) -> ParseStats {
        ParseStats {
            cache: self.cache.stats(),
            steps: self.config.limits.exec_fuel - self.exec_fuel,
            guard_hits: self.guard_hits,
        }
    }

    /// Parses the whole input with the named start rule.
    ///
    /// Uses `NoopTracer`, which gets completely optimized away.
    pub fn parse(self, start: &str) -> Result<ParseOutput> {
        self.parse_with(start, &mut NoopTracer)
    }

    /// Parses with a tracer for debugging.
    pub fn parse_with<T: Tracer>(mut self, start: &str, tracer: &mut T) -> Result<ParseOutput> {
        let rule = self
            .grammar
            .rule_id(start)
            .ok_or_else(|| Error::UnknownRule(start.to_owned()))?;
        self.run(rule, tracer)
    }

    /// Parses with the grammar's designated start rule.
    pub fn parse_start(mut self) -> Result<ParseOutput> {
        let rule = self.grammar.start().ok_or(Error::NoStartRule)?.id();
        self.run(rule, &mut NoopTracer)
    }

    /// Evaluates one expression at the current cursor.
    ///
    /// `None` is an ordinary mismatch; the cursor is then unchanged. The
    /// session stays usable, so hosts can parse fragments one after another.
    pub fn eval(&mut self, expr: &Expr) -> Result<Option<Match>> {
        self.eval_with(expr, &mut NoopTracer)
    }

    pub fn eval_with<T: Tracer>(&mut self, expr: &Expr, tracer: &mut T) -> Result<Option<Match>> {
        Ok(self.eval_expr(expr, tracer)?)
    }

    fn run<T: Tracer>(&mut self, rule: RuleId, tracer: &mut T) -> Result<ParseOutput> {
        debug!(
            rule = self.grammar.get(rule).name(),
            tokens = self.kinds.len(),
            cache = self.cache.is_enabled(),
            "parse started"
        );

        let root = self.invoke(rule, tracer)?;
        let stats = self.stats();
        debug!(
            matched = root.is_some(),
            end = self.state.cursor(),
            steps = stats.steps,
            cache_hits = stats.cache.hits,
            cache_misses = stats.cache.misses,
            "parse finished"
        );

        let Some(root) = root else {
            return Err(self.failure(FailureReason::NoMatch).into());
        };
        if self.config.trailing == Trailing::Reject && !self.state.is_eof() {
            return Err(self.failure(FailureReason::TrailingInput).into());
        }
        Ok(ParseOutput {
            root,
            end: self.state.cursor(),
            stats,
        })
    }

    fn failure(&mut self, reason: FailureReason) -> ParseFailure {
        let furthest = self.state.take_furthest();
        // A repetition that stopped early leaves the real failure past the cursor.
        let reason = match &furthest {
            Some(f) if f.position > self.state.cursor() => FailureReason::NoMatch,
            _ => reason,
        };
        let position = match reason {
            FailureReason::TrailingInput => self.state.cursor(),
            FailureReason::NoMatch => furthest.as_ref().map_or(0, |f| f.position),
        };
        let (expected, call_stack) = match furthest {
            Some(f) if f.position == position => (
                f.expected
                    .iter()
                    .map(|&sym| self.grammar.terminal_name(sym).to_owned())
                    .collect(),
                f.call_stack
                    .iter()
                    .map(|&id| self.grammar.get(id).name().to_owned())
                    .collect(),
            ),
            _ => (Vec::new(), Vec::new()),
        };
        ParseFailure {
            position,
            found: self.state.stream().get(position).cloned(),
            expected,
            call_stack,
            reason,
        }
    }

    fn eval_expr<T: Tracer>(
        &mut self,
        expr: &Expr,
        tracer: &mut T,
    ) -> std::result::Result<Option<Match>, RuntimeError> {
        if self.exec_fuel == 0 {
            return Err(RuntimeError::ExecFuelExhausted);
        }
        self.exec_fuel -= 1;

        match expr {
            Expr::Term(sym) => Ok(self.terminal(*sym, tracer)),
            Expr::Seq(items) => self.sequence(items, tracer),
            Expr::Alt(branches) => self.alternation(branches, tracer),
            Expr::Opt(inner) => self.optional(inner, tracer),
            Expr::Many(inner) => self.repetition(inner, tracer),
            Expr::Ref(rule) => Ok(self.invoke(*rule, tracer)?.map(Match::Node)),
        }
    }

    fn terminal<T: Tracer>(&mut self, sym: Symbol, tracer: &mut T) -> Option<Match> {
        let position = self.state.cursor();
        let matched = self.kinds.get(position as usize).copied().flatten() == Some(sym);
        tracer.trace_terminal(sym, position, self.state.peek(), matched);

        if !matched {
            self.state.record_failure(sym);
            return None;
        }
        self.state.advance().map(|token| Match::Token(token.clone()))
    }

    fn sequence<T: Tracer>(
        &mut self,
        items: &[Expr],
        tracer: &mut T,
    ) -> std::result::Result<Option<Match>, RuntimeError> {
        let checkpoint = self.state.checkpoint();
        tracer.trace_checkpoint(checkpoint.position());

        let mut matches = Vec::with_capacity(items.len());
        for item in items {
            match self.eval_expr(item, tracer)? {
                Some(m) => matches.push(m),
                None => {
                    // Partial matches are not observable: rewind past every element.
                    self.state.restore(checkpoint);
                    tracer.trace_backtrack(self.state.cursor());
                    return Ok(None);
                }
            }
        }

        tracer.trace_commit(self.state.cursor());
        Ok(Some(Match::Seq(matches)))
    }

    fn alternation<T: Tracer>(
        &mut self,
        branches: &[Expr],
        tracer: &mut T,
    ) -> std::result::Result<Option<Match>, RuntimeError> {
        for branch in branches {
            let checkpoint = self.state.checkpoint();
            tracer.trace_checkpoint(checkpoint.position());

            if let Some(m) = self.eval_expr(branch, tracer)? {
                tracer.trace_commit(self.state.cursor());
                return Ok(Some(m));
            }

            self.state.restore(checkpoint);
            tracer.trace_backtrack(self.state.cursor());
        }
        Ok(None)
    }

    fn optional<T: Tracer>(
        &mut self,
        inner: &Expr,
        tracer: &mut T,
    ) -> std::result::Result<Option<Match>, RuntimeError> {
        let checkpoint = self.state.checkpoint();
        tracer.trace_checkpoint(checkpoint.position());

        match self.eval_expr(inner, tracer)? {
            Some(m) => {
                tracer.trace_commit(self.state.cursor());
                Ok(Some(m))
            }
            None => {
                self.state.restore(checkpoint);
                tracer.trace_backtrack(self.state.cursor());
                Ok(Some(Match::Absent))
            }
        }
    }

    fn repetition<T: Tracer>(
        &mut self,
        inner: &Expr,
        tracer: &mut T,
    ) -> std::result::Result<Option<Match>, RuntimeError> {
        let mut items = Vec::new();
        loop {
            let checkpoint = self.state.checkpoint();
            tracer.trace_checkpoint(checkpoint.position());

            match self.eval_expr(inner, tracer)? {
                Some(m) if self.state.cursor() > checkpoint.position() => {
                    tracer.trace_commit(self.state.cursor());
                    items.push(m);
                }
                // A failed or zero-width iteration ends the loop.
                _ => {
                    self.state.restore(checkpoint);
                    tracer.trace_backtrack(self.state.cursor());
                    break;
                }
            }
        }
        Ok(Some(Match::List(items)))
    }

    /// Invokes a rule through the packrat cache and the left-recursion guard.
    fn invoke<T: Tracer>(
        &mut self,
        rule: RuleId,
        tracer: &mut T,
    ) -> std::result::Result<Option<Arc<CstNode>>, RuntimeError> {
        let start = self.state.cursor();

        if let Some(entry) = self.cache.get(rule, start) {
            tracer.trace_cache_hit(rule, start, entry.matched().then_some(entry.end));
            if entry.matched() {
                self.state.seek(entry.end);
            }
            return Ok(entry.node);
        }

        if self.state.depth() as u32 >= self.config.limits.recursion_limit {
            return Err(RuntimeError::RecursionLimitExceeded);
        }

        if !self.active.insert((rule, start)) {
            self.guard_hits += 1;
            tracer.trace_left_recursion(rule, start);
            return Ok(None);
        }

        let guard_hits = self.guard_hits;
        let grammar = self.grammar;
        let definition = grammar.get(rule);

        tracer.trace_enter(rule, start);
        self.state.push_rule(rule);
        let result = self.eval_expr(definition.body(), tracer);
        self.state.pop_rule();
        self.active.remove(&(rule, start));

        let node = match result? {
            Some(m) => Some(Arc::new(CstNode::new(
                Arc::clone(definition.shared_name()),
                rule,
                m.flatten(),
                start,
                self.state.cursor(),
            ))),
            None => {
                self.state.seek(start);
                None
            }
        };
        tracer.trace_exit(rule, start, node.as_ref().map(|n| n.end()));

        // Outcomes that depended on the guard cutting an active invocation
        // are context-sensitive and must not be replayed elsewhere.
        if self.guard_hits == guard_hits {
            let entry = CacheEntry {
                node: node.clone(),
                end: self.state.cursor(),
            };
            self.cache.store(rule, start, entry);
        }

        Ok(node)
    }
}
