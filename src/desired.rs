//! Desired state as published in DNS.
//!
//! The declared set lives at `<prefix>.<suffix>`, one container name per TXT
//! record.  Each container's launch command lives at
//! `<name>.<prefix>.<suffix>` and is always resolved single-level: the first
//! suffix that answers wins, even when inheritance is enabled for the
//! declared set.

use std::collections::BTreeSet;

use log::{debug, info};

use crate::config::Settings;
use crate::resolver::{SuffixWalker, TxtResolver, WalkMode};
use crate::types::DesiredCommand;

pub struct DesiredStateBuilder<R> {
    walker: SuffixWalker<R>,
    prefix: String,
    hostname: String,
    inherit: bool,
}

impl<R: TxtResolver> DesiredStateBuilder<R> {
    pub fn new(resolver: R, prefix: impl Into<String>, hostname: impl Into<String>, inherit: bool) -> Self {
        Self {
            walker: SuffixWalker::new(resolver),
            prefix: prefix.into(),
            hostname: hostname.into(),
            inherit,
        }
    }

    pub fn from_settings(resolver: R, settings: &Settings) -> Self {
        Self::new(
            resolver,
            settings.prefix.clone(),
            settings.hostname.clone(),
            settings.inheritance,
        )
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Names of every container DNS declares for this host.
    pub async fn declared_containers(&self) -> BTreeSet<String> {
        let mode = WalkMode::from_inheritance(self.inherit);
        let answers = self
            .walker
            .resolve_chain(&self.prefix, &self.hostname, mode)
            .await;

        let mut containers = BTreeSet::new();
        for answer in answers {
            debug!("Lookup {} found containers {:?}", answer.name, answer.values);
            for name in answer.values {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                containers.insert(name.to_string());
            }
        }
        containers
    }

    /// Launch command for `container`, or [`DesiredCommand::Disabled`] when no
    /// suffix publishes one.  Only the first value of the answering record is
    /// used.
    pub async fn resolve_command(&self, container: &str) -> DesiredCommand {
        let base = format!("{}.{}", container, self.prefix);
        let answer = self
            .walker
            .resolve_chain(&base, &self.hostname, WalkMode::FirstMatch)
            .await
            .into_iter()
            .next();

        let command = DesiredCommand::from_record(answer.and_then(|a| {
            debug!("Lookup {} found config {:?}", a.name, a.values.first());
            a.values.into_iter().next()
        }));
        if command == DesiredCommand::Disabled {
            info!("{}: container launch disabled by missing config", container);
        }
        command
    }
}
