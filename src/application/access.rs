//! # Access Guard
//!
//! Decides whether an invoking user may run commands. A pure membership test
//! over the configured allowlist; no side effects, no platform types.

use std::collections::HashSet;

/// Allowlist gate consulted before every command handler.
///
/// An empty allowlist allows everyone. That is the documented open mode, not
/// an accident: deployments opt into gating by listing at least one
/// identifier, and startup logs a warning when the gate is open.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    allowed: HashSet<String>,
}

impl AccessGuard {
    pub fn new<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self { allowed: ids.into_iter().collect() }
    }

    /// True when the allowlist is empty and every user passes.
    pub fn is_open(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Whether `user_id` may invoke commands.
    pub fn is_allowed(&self, user_id: &str) -> bool {
        self.is_open() || self.allowed.contains(user_id)
    }
}
