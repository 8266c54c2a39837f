use async_trait::async_trait;

use crate::error::RuntimeError;
use crate::types::Fingerprint;

pub mod command;
pub mod docker;
pub use command::{CommandOutput, CommandRunner, ProcessRunner};
pub use docker::DockerRuntime;

/// Operations the reconciler needs from a container runtime.
///
/// Implementations own the ownership label: containers started through
/// [`ContainerRuntime::run`] carry it, and [`ContainerRuntime::list_managed`]
/// only reports containers that do.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Names of all labelled containers, running or stopped.
    async fn list_managed(&self) -> Result<Vec<String>, RuntimeError>;

    /// Ownership label value of an existing container.  `Ok(None)` means the
    /// container exists without the label; an error usually means it does not
    /// exist at all.
    async fn inspect(&self, name: &str) -> Result<Option<String>, RuntimeError>;

    /// Start a detached container tagged with `fingerprint`.
    async fn run(&self, name: &str, fingerprint: &Fingerprint, args: &[String]) -> Result<(), RuntimeError>;

    async fn kill(&self, name: &str) -> Result<(), RuntimeError>;

    async fn remove(&self, name: &str) -> Result<(), RuntimeError>;
}
