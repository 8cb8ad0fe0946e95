#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the weft engine and the grammars built on it.
//!
//! - [`Token`]: one lexical token with position and line-break metadata
//! - [`TokenStream`]: a cursor over a token slice with O(1) checkpoint/restore
//! - [`Interner`]: terminal-name interning into cheap [`Symbol`] handles
//! - [`Colors`]: optional ANSI styling for trace and dump output

mod colors;
mod interner;
mod stream;
mod token;

#[cfg(test)]
mod stream_tests;

pub use colors::{Colors, Style};
pub use interner::{Interner, Symbol};
pub use stream::{Checkpoint, TokenStream};
pub use token::Token;
