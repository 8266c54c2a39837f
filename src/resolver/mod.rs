//! Suffix-walking TXT resolution.
//!
//! Configuration is published at `<base>.<suffix>` for every tail of the
//! host's name, most specific first.  For `web1.prod.example.com` and base
//! `containers.docker` the walk queries:
//!
//! ```text
//! containers.docker.web1.prod.example.com
//! containers.docker.prod.example.com
//! containers.docker.example.com
//! containers.docker.com
//! ```
//!
//! A miss or a failed lookup at one suffix never ends the walk; it only moves
//! on to the next, shorter suffix.

use async_trait::async_trait;
use log::{debug, warn};

use crate::error::LookupError;

pub mod hickory;
pub use hickory::HickoryTxtResolver;

/// Anything that can answer TXT queries.
#[async_trait]
pub trait TxtResolver: Send + Sync {
    /// Look up the TXT records for a fully qualified name.  Each element of
    /// the result is one record, with its character-strings concatenated.
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, LookupError>;
}

/// How far a walk continues after a suffix answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// Stop at the first suffix with a non-empty answer.
    FirstMatch,
    /// Query every suffix and keep every answer.
    Inherited,
}

impl WalkMode {
    pub fn from_inheritance(inherit: bool) -> Self {
        if inherit {
            WalkMode::Inherited
        } else {
            WalkMode::FirstMatch
        }
    }
}

/// The records found at one suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxtAnswer {
    pub name: String,
    pub values: Vec<String>,
}

/// Every tail of `hostname`, from the full name down to the top-level label.
pub fn domain_suffixes(hostname: &str) -> Vec<String> {
    let hostname = hostname.trim_end_matches('.');
    if hostname.is_empty() {
        return Vec::new();
    }
    let labels: Vec<&str> = hostname.split('.').collect();
    (0..labels.len()).map(|idx| labels[idx..].join(".")).collect()
}

/// Walks the suffixes of a hostname with a [`TxtResolver`].
pub struct SuffixWalker<R> {
    resolver: R,
}

impl<R: TxtResolver> SuffixWalker<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Query `<base>.<suffix>` for each suffix of `hostname` in order.
    ///
    /// Returns the answering suffixes in walk order: at most one in
    /// [`WalkMode::FirstMatch`].  An empty result means nothing is configured.
    pub async fn resolve_chain(&self, base: &str, hostname: &str, mode: WalkMode) -> Vec<TxtAnswer> {
        let mut answers = Vec::new();

        for suffix in domain_suffixes(hostname) {
            let name = format!("{}.{}", base, suffix);

            match self.resolver.lookup_txt(&name).await {
                Ok(values) if values.is_empty() => {
                    debug!("Lookup {} returned an empty answer", name);
                }
                Ok(values) => {
                    debug!("Lookup {} found {:?}", name, values);
                    answers.push(TxtAnswer { name, values });
                    if mode == WalkMode::FirstMatch {
                        break;
                    }
                }
                Err(e @ LookupError::NotFound(_)) => {
                    debug!("Failed querying {}: {}", name, e);
                }
                Err(e) => {
                    warn!("Failed querying {}: {}", name, e);
                }
            }
        }

        answers
    }
}
