//! Data structures shared by the resolver, the runtime and the reconciler.
//!
//! Everything here is rebuilt on every invocation.  The only state that
//! survives between runs is the [`Fingerprint`] stored as a label on each
//! container the runtime launched for us.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::FingerprintError;

/// Launch configuration for a declared container, as published in DNS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesiredCommand {
    /// Arguments passed to `docker run -d` after our own flags, as a single
    /// shell-quoted string.
    Command(String),
    /// No suffix answered with a usable command.  The container must not run.
    Disabled,
}

impl DesiredCommand {
    /// Treat empty or whitespace-only record values as disabled.
    pub fn from_record(value: Option<String>) -> Self {
        match value {
            Some(command) if !command.trim().is_empty() => DesiredCommand::Command(command),
            _ => DesiredCommand::Disabled,
        }
    }
}

/// Reversible encoding of a launch command, stored as the ownership label.
///
/// Comparing fingerprints is a byte-exact comparison of the raw command
/// strings, so quoting differences that tokenize identically still count as
/// a change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint a raw command line.
    pub fn encode(command: &str) -> Self {
        Self(STANDARD.encode(command.as_bytes()))
    }

    /// Wrap a label value read back from the runtime.
    pub fn from_label(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Recover the command line this fingerprint was computed from.
    pub fn decode(&self) -> Result<String, FingerprintError> {
        let bytes = STANDARD.decode(self.0.as_bytes())?;
        Ok(String::from_utf8(bytes)?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the reconciler did for a single container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A missing container was started.
    Started,
    /// A container with a stale fingerprint was replaced.
    Restarted,
    /// A disabled or undeclared container was killed and removed.
    Removed,
    /// The container already matched its declared command.
    Unchanged,
    /// Disabled and not present; nothing to do.
    Absent,
    /// The command could not be tokenized.
    Skipped,
    /// A runtime operation needed for convergence failed.
    Failed,
}

/// Tally of outcomes for one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub started: usize,
    pub restarted: usize,
    pub removed: usize,
    pub unchanged: usize,
    pub absent: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ReconcileReport {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Started => self.started += 1,
            Outcome::Restarted => self.restarted += 1,
            Outcome::Removed => self.removed += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Absent => self.absent += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
    }

    /// True when the pass issued no start, kill or remove actions.
    pub fn is_converged(&self) -> bool {
        self.started == 0 && self.restarted == 0 && self.removed == 0 && self.failed == 0
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} started, {} restarted, {} removed, {} unchanged, {} absent, {} skipped, {} failed",
            self.started,
            self.restarted,
            self.removed,
            self.unchanged,
            self.absent,
            self.skipped,
            self.failed
        )
    }
}
