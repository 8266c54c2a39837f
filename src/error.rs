//! Error types for dns-provision.
//!
//! Only [`ProvisionError`] is fatal. Lookup, runtime and fingerprint errors
//! are scoped to a single suffix or container and are logged by the caller.

use thiserror::Error;

/// Configuration errors that abort the process before reconciliation.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The container runtime executable could not be found or executed.
    #[error("supplied docker command {cmd:?} is not executable in the current environment: {source}")]
    RuntimeNotExecutable {
        cmd: String,
        #[source]
        source: which::Error,
    },

    /// No hostname override was given and the system hostname is unusable.
    #[error("could not determine system hostname: {0}")]
    Hostname(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The system resolver configuration could not be loaded.
    #[error("failed to create DNS resolver: {0}")]
    Resolver(#[from] hickory_resolver::error::ResolveError),
}

/// Outcome of a failed TXT lookup for a single name.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The name has no TXT records (NXDOMAIN or an empty answer).
    #[error("no TXT records for {0}")]
    NotFound(String),

    /// The lookup could not be completed (timeout, SERVFAIL, ...).
    #[error("TXT lookup for {name} failed: {reason}")]
    Transport { name: String, reason: String },

    /// The queried name is not a valid domain name.
    #[error("invalid DNS name {name}: {reason}")]
    InvalidName { name: String, reason: String },
}

/// Errors from invoking the container runtime CLI.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The runtime executable could not be spawned.
    #[error("failed to spawn docker {op}: {source}")]
    Spawn {
        op: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The runtime exited unsuccessfully.
    #[error("docker {op} exited with status {status:?}: {stderr}")]
    Failed {
        op: &'static str,
        status: Option<i32>,
        stderr: String,
    },
}

/// A label value that is not a valid command fingerprint.
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("fingerprint is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("fingerprint does not decode to UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
