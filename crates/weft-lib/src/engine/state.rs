//! Parser state: token cursor, rule call stack, furthest failure.

use indexmap::IndexSet;
use weft_core::{Checkpoint, Symbol, Token, TokenStream};

use crate::grammar::RuleId;

/// Deepest position any terminal failed at, with what was expected there.
#[derive(Debug, Clone, Default)]
pub struct Furthest {
    pub position: u32,
    pub expected: IndexSet<Symbol>,
    /// Rule call stack when the first expectation at `position` was recorded.
    pub call_stack: Vec<RuleId>,
}

/// State owned by one parse session.
///
/// Backtracking never copies the call stack: a failed rule pops itself, so
/// only the cursor needs checkpointing.
#[derive(Debug)]
pub struct ParserState<'t> {
    stream: TokenStream<'t>,
    call_stack: Vec<RuleId>,
    furthest: Option<Furthest>,
}

impl<'t> ParserState<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            call_stack: Vec::new(),
            furthest: None,
        }
    }

    #[inline]
    pub fn stream(&self) -> &TokenStream<'t> {
        &self.stream
    }

    #[inline]
    pub fn cursor(&self) -> u32 {
        self.stream.cursor()
    }

    #[inline]
    pub fn checkpoint(&self) -> Checkpoint {
        self.stream.checkpoint()
    }

    #[inline]
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.stream.restore(checkpoint);
    }

    #[inline]
    pub fn seek(&mut self, position: u32) {
        self.stream.seek(position);
    }

    #[inline]
    pub fn peek(&self) -> Option<&'t Token> {
        self.stream.current()
    }

    #[inline]
    pub fn advance(&mut self) -> Option<&'t Token> {
        self.stream.advance()
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.stream.is_eof()
    }

    pub fn push_rule(&mut self, rule: RuleId) {
        self.call_stack.push(rule);
    }

    pub fn pop_rule(&mut self) {
        self.call_stack.pop();
    }

    pub fn depth(&self) -> usize {
        self.call_stack.len()
    }

    pub fn call_stack(&self) -> &[RuleId] {
        &self.call_stack
    }

    /// Records that `expected` failed to match at the current cursor.
    ///
    /// A strictly deeper position replaces the record; an equal one extends
    /// the expected set.
    pub fn record_failure(&mut self, expected: Symbol) {
        let position = self.cursor();
        match &mut self.furthest {
            Some(f) if f.position > position => {}
            Some(f) if f.position == position => {
                f.expected.insert(expected);
            }
            _ => {
                let mut set = IndexSet::new();
                set.insert(expected);
                self.furthest = Some(Furthest {
                    position,
                    expected: set,
                    call_stack: self.call_stack.clone(),
                });
            }
        }
    }

    pub fn furthest(&self) -> Option<&Furthest> {
        self.furthest.as_ref()
    }

    pub fn take_furthest(&mut self) -> Option<Furthest> {
        self.furthest.take()
    }
}
