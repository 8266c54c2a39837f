//! Running state as reported by the container runtime.

use std::collections::BTreeSet;

use log::{debug, error};

use crate::runtime::ContainerRuntime;
use crate::types::Fingerprint;

/// What the runtime knows about a container name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedState {
    /// No such container, or the runtime could not be asked.
    Missing,
    /// A container with this name exists but we did not create it.
    Unlabelled,
    /// A container we created, tagged with the command it was started with.
    Applied(Fingerprint),
}

/// Names of every container carrying the ownership label.
///
/// `None` when the runtime could not list containers; cleanup must then be
/// skipped rather than assuming nothing is running.
pub async fn managed_containers<C>(runtime: &C) -> Option<BTreeSet<String>>
where
    C: ContainerRuntime + ?Sized,
{
    match runtime.list_managed().await {
        Ok(names) => {
            let names: BTreeSet<String> = names.into_iter().collect();
            debug!("Containers we have labelled found: {:?}", names);
            Some(names)
        }
        Err(e) => {
            error!("Failed to list containers - will not attempt cleanup: {}", e);
            None
        }
    }
}

/// The fingerprint last applied to `name`.
pub async fn applied_fingerprint<C>(runtime: &C, name: &str) -> AppliedState
where
    C: ContainerRuntime + ?Sized,
{
    match runtime.inspect(name).await {
        Ok(Some(label)) => AppliedState::Applied(Fingerprint::from_label(label)),
        Ok(None) => AppliedState::Unlabelled,
        Err(e) => {
            debug!("{}: inspect failed, treating as missing: {}", name, e);
            AppliedState::Missing
        }
    }
}
