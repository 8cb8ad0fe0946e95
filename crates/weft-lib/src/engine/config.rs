//! Parse-session configuration.

use std::num::NonZeroUsize;

/// Runtime limits for one parse session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuelLimits {
    /// Maximum combinator steps (default: 10,000,000).
    pub exec_fuel: u32,
    /// Maximum nested rule invocations (default: 1,024).
    pub recursion_limit: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 10_000_000,
            recursion_limit: 1024,
        }
    }
}

/// Packrat cache policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Maximum live entries; `None` keeps every entry for the whole session.
    pub capacity: Option<NonZeroUsize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: None,
        }
    }
}

impl CacheConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            capacity: None,
        }
    }

    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self {
            enabled: true,
            capacity: Some(capacity),
        }
    }
}

/// What a top-level parse does with tokens left after the start rule matched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Trailing {
    /// Unconsumed tokens fail the parse.
    #[default]
    Reject,
    /// Unconsumed tokens are left for the caller.
    Allow,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseConfig {
    pub limits: FuelLimits,
    pub cache: CacheConfig,
    pub trailing: Trailing,
}

impl ParseConfig {
    pub fn with_limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_trailing(mut self, trailing: Trailing) -> Self {
        self.trailing = trailing;
        self
    }
}
