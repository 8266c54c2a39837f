//! Convergence of the runtime towards the state published in DNS.
//!
//! One call to [`Reconciler::run`] is a single sequential pass:
//!
//! 1. resolve the declared container set;
//! 2. kill and remove every labelled container that is no longer declared;
//! 3. for each declared name, resolve its command and start, replace, remove
//!    or leave its container.
//!
//! Every runtime action is best-effort.  Failures are logged and counted in
//! the [`ReconcileReport`] but never stop the pass, and a repeated pass with
//! unchanged DNS issues no actions at all.

use log::{debug, error, info, warn};

use crate::desired::DesiredStateBuilder;
use crate::inspect::{applied_fingerprint, managed_containers, AppliedState};
use crate::resolver::TxtResolver;
use crate::runtime::ContainerRuntime;
use crate::types::{DesiredCommand, Fingerprint, Outcome, ReconcileReport};

pub struct Reconciler<R, C> {
    desired: DesiredStateBuilder<R>,
    runtime: C,
}

impl<R: TxtResolver, C: ContainerRuntime> Reconciler<R, C> {
    pub fn new(desired: DesiredStateBuilder<R>, runtime: C) -> Self {
        Self { desired, runtime }
    }

    pub async fn run(&self) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        debug!("Starting DNS query for {}", self.desired.hostname());
        let declared = self.desired.declared_containers().await;
        info!("DNS specifies containers: {:?}", declared);

        if let Some(managed) = managed_containers(&self.runtime).await {
            for name in managed.difference(&declared) {
                info!(
                    "{}: managed container not in provision data, removing",
                    name
                );
                report.record(self.stop_and_remove(name).await);
            }
        }

        for name in &declared {
            let command = self.desired.resolve_command(name).await;
            report.record(self.converge(name, command).await);
        }

        report
    }

    /// Bring a single declared container in line with `command`.
    pub async fn converge(&self, name: &str, command: DesiredCommand) -> Outcome {
        let command = match command {
            DesiredCommand::Command(command) => command,
            DesiredCommand::Disabled => {
                return match applied_fingerprint(&self.runtime, name).await {
                    AppliedState::Missing => {
                        debug!("{}: container did not exist, no need to remove", name);
                        Outcome::Absent
                    }
                    _ => {
                        info!("{}: removing disabled container", name);
                        self.stop_and_remove(name).await
                    }
                };
            }
        };

        let args = match shell_words::split(&command) {
            Ok(args) => args,
            Err(e) => {
                error!(
                    "{}: could not split command line {:?} - skipping: {}",
                    name, command, e
                );
                return Outcome::Skipped;
            }
        };
        let fresh = Fingerprint::encode(&command);

        match applied_fingerprint(&self.runtime, name).await {
            AppliedState::Missing => {
                info!("{}: starting container", name);
                self.start(name, &fresh, &args, Outcome::Started).await
            }
            AppliedState::Applied(existing) if existing == fresh => {
                debug!("{}: launch config is identical, taking no action", name);
                Outcome::Unchanged
            }
            AppliedState::Applied(existing) => {
                debug!(
                    "{}: comparing command encodings: {} != {}",
                    name, existing, fresh
                );
                info!("{}: configuration has changed, replacing container", name);
                self.stop_and_remove(name).await;
                self.start(name, &fresh, &args, Outcome::Restarted).await
            }
            AppliedState::Unlabelled => {
                warn!(
                    "{}: existing container was not provisioned by us, replacing it",
                    name
                );
                self.stop_and_remove(name).await;
                self.start(name, &fresh, &args, Outcome::Restarted).await
            }
        }
    }

    async fn start(&self, name: &str, fingerprint: &Fingerprint, args: &[String], ok: Outcome) -> Outcome {
        match self.runtime.run(name, fingerprint, args).await {
            Ok(()) => ok,
            Err(e) => {
                error!("{}: error starting container: {}", name, e);
                Outcome::Failed
            }
        }
    }

    /// Kill then remove.  Kill failures are expected for stopped containers
    /// and do not prevent the removal.
    async fn stop_and_remove(&self, name: &str) -> Outcome {
        if let Err(e) = self.runtime.kill(name).await {
            warn!("{}: kill failed: {}", name, e);
        }
        match self.runtime.remove(name).await {
            Ok(()) => Outcome::Removed,
            Err(e) => {
                warn!("{}: remove failed: {}", name, e);
                Outcome::Failed
            }
        }
    }
}
