//! Run-scoped state shared by action selection and verification.

use crate::prompt::NO_HISTORY;
use crate::rate_limit::RateLimiter;
use std::sync::Arc;

/// Append-only log of executed-action descriptions, replayed into every
/// oracle prompt so later calls see what was already done.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    entries: Vec<String>,
}

impl Memory {
    pub fn record(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// History section of an oracle prompt.
    pub fn history_block(&self) -> String {
        if self.entries.is_empty() {
            NO_HISTORY.to_string()
        } else {
            self.entries.join("\n")
        }
    }
}

/// Mutable context carried through one goal run.
pub struct RunContext {
    pub memory: Memory,
    /// The oracle's latest description of where the app is. Seeded before
    /// the first action, then overwritten by each `state_update`.
    pub current_state: String,
    pub limiter: Arc<RateLimiter>,
}

impl RunContext {
    pub fn new(rate_capacity: usize) -> Self {
        Self {
            memory: Memory::default(),
            current_state: "App launched".to_string(),
            limiter: Arc::new(RateLimiter::new(rate_capacity)),
        }
    }

    pub fn with_limiter(limiter: Arc<RateLimiter>) -> Self {
        Self {
            memory: Memory::default(),
            current_state: "App launched".to_string(),
            limiter,
        }
    }
}
