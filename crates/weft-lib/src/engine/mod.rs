//! Parsing engine: combinator interpreter, packrat cache, tracing.

mod cache;
mod config;
mod error;
mod interpreter;
mod state;
pub mod trace;

#[cfg(test)]
mod cache_tests;

pub use cache::{CacheEntry, CacheStats, PackratCache};
pub use config::{CacheConfig, FuelLimits, ParseConfig, Trailing};
pub use error::{FailureReason, ParseFailure, RuntimeError};
pub use interpreter::{ParseOutput, ParseStats, Parser};
pub use state::{Furthest, ParserState};
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
