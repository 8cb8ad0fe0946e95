//! Tracing infrastructure for debugging parse sessions.
//!
//! # Design: Zero-Cost Abstraction
//!
//! The interpreter is generic over [`Tracer`]. With [`NoopTracer`] every hook
//! is an `#[inline(always)]` empty function and the calls disappear.
//! [`PrintTracer`] collects an indented, optionally colored execution trace.
//!
//! Tracing-only state (indentation depth, collected lines) lives in the tracer,
//! never in the parser state.

use weft_core::{Colors, Style, Symbol, Token};

use crate::grammar::{Grammar, RuleId};

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Rule entry/exit, terminal attempts, cache hits.
    #[default]
    Default,
    /// Adds token text on terminal attempts and backtrack lines.
    Verbose,
}

/// Instrumentation hooks called by the interpreter.
///
/// All methods receive raw ids and cursor positions; name resolution and
/// formatting happen in the implementation.
pub trait Tracer {
    /// Before evaluating a rule body (after the cache missed).
    fn trace_enter(&mut self, rule: RuleId, position: u32);

    /// After a rule body finished. `end` is `None` on failure.
    fn trace_exit(&mut self, rule: RuleId, start: u32, end: Option<u32>);

    /// A rule invocation was answered by the packrat cache.
    fn trace_cache_hit(&mut self, rule: RuleId, position: u32, end: Option<u32>);

    /// A rule re-entered itself at the same position and was cut.
    fn trace_left_recursion(&mut self, rule: RuleId, position: u32);

    /// A terminal was tried against `found` (`None` at end of input).
    fn trace_terminal(
        &mut self,
        terminal: Symbol,
        position: u32,
        found: Option<&Token>,
        matched: bool,
    );

    /// A backtracking point was saved.
    fn trace_checkpoint(&mut self, position: u32);

    /// The attempt started at the last checkpoint succeeded and was kept.
    fn trace_commit(&mut self, position: u32);

    /// The cursor was restored; `position` is the cursor after restoring.
    fn trace_backtrack(&mut self, position: u32);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter(&mut self, _rule: RuleId, _position: u32) {}

    #[inline(always)]
    fn trace_exit(&mut self, _rule: RuleId, _start: u32, _end: Option<u32>) {}

    #[inline(always)]
    fn trace_cache_hit(&mut self, _rule: RuleId, _position: u32, _end: Option<u32>) {}

    #[inline(always)]
    fn trace_left_recursion(&mut self, _rule: RuleId, _position: u32) {}

    #[inline(always)]
    fn trace_terminal(
        &mut self,
        _terminal: Symbol,
        _position: u32,
        _found: Option<&Token>,
        _matched: bool,
    ) {
    }

    #[inline(always)]
    fn trace_checkpoint(&mut self, _position: u32) {}

    #[inline(always)]
    fn trace_commit(&mut self, _position: u32) {}

    #[inline(always)]
    fn trace_backtrack(&mut self, _position: u32) {}
}

/// Tracer that collects a readable execution trace.
pub struct PrintTracer<'g> {
    grammar: &'g Grammar,
    verbosity: Verbosity,
    colors: Colors,
    lines: Vec<String>,
    depth: usize,
}

impl<'g> PrintTracer<'g> {
    pub fn new(grammar: &'g Grammar, verbosity: Verbosity, colors: Colors) -> Self {
        Self {
            grammar,
            verbosity,
            colors,
            lines: Vec::new(),
            depth: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Collected trace, one event per line.
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }

    /// Print all trace lines.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }

    fn push(&mut self, content: String) {
        let indent = "  ".repeat(self.depth);
        self.lines.push(format!("{indent}{content}"));
    }

    fn rule_name(&self, rule: RuleId) -> String {
        self.colors.paint(Style::Rule, self.grammar.get(rule).name())
    }

    fn at(&self, position: u32) -> String {
        self.colors.paint(Style::Muted, format_args!("@{position}"))
    }

    fn span(&self, start: u32, end: u32) -> String {
        self.colors.paint(Style::Muted, format_args!("@{start}..{end}"))
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_enter(&mut self, rule: RuleId, position: u32) {
        let line = format!("{} {}", self.rule_name(rule), self.at(position));
        self.push(line);
        self.depth += 1;
    }

    fn trace_exit(&mut self, rule: RuleId, start: u32, end: Option<u32>) {
        self.depth = self.depth.saturating_sub(1);
        let line = match end {
            Some(end) => format!("{} {}", self.rule_name(rule), self.span(start, end)),
            None => format!(
                "{} {} {}",
                self.rule_name(rule),
                self.at(start),
                self.colors.paint(Style::Failed, "failed")
            ),
        };
        self.push(line);
    }

    fn trace_cache_hit(&mut self, rule: RuleId, position: u32, end: Option<u32>) {
        let outcome = match end {
            Some(end) => format!("cached ..{end}"),
            None => String::from("cached failure"),
        };
        let line = format!(
            "{} {} {}",
            self.rule_name(rule),
            self.at(position),
            self.colors.paint(Style::Muted, outcome)
        );
        self.push(line);
    }

    fn trace_left_recursion(&mut self, rule: RuleId, position: u32) {
        let line = format!(
            "{} {} {}",
            self.rule_name(rule),
            self.at(position),
            self.colors.paint(Style::Failed, "left-recursive")
        );
        self.push(line);
    }

    fn trace_terminal(
        &mut self,
        terminal: Symbol,
        position: u32,
        found: Option<&Token>,
        matched: bool,
    ) {
        let verb = match matched {
            true => self.colors.paint(Style::Matched, "match"),
            false => self.colors.paint(Style::Failed, "miss"),
        };
        let name = self.grammar.terminal_name(terminal);
        let mut line = format!("{verb} {name} {}", self.at(position));
        if self.verbosity == Verbosity::Verbose {
            let found = match found {
                Some(token) => format!("{:?}", token.value()),
                None => String::from("<eof>"),
            };
            line.push(' ');
            line.push_str(&self.colors.paint(Style::Muted, found));
        }
        self.push(line);
    }

    fn trace_checkpoint(&mut self, _position: u32) {}

    fn trace_commit(&mut self, _position: u32) {}

    fn trace_backtrack(&mut self, position: u32) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let line = format!(
            "{} {}",
            self.colors.paint(Style::Muted, "backtrack"),
            self.at(position)
        );
        self.push(line);
    }
}
