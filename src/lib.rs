//! dns-provision - converge local docker containers onto DNS TXT records.
//!
//! A host's desired containers are published under its own name:
//!
//! ```text
//! containers.docker.web1.prod.example.com.             TXT "nginx-edge"
//! nginx-edge.containers.docker.web1.prod.example.com.  TXT "-p 80:80 nginx:1.25"
//! ```
//!
//! Both records are looked up by walking the suffixes of the hostname, so
//! they may equally be published at `prod.example.com` or `example.com` to
//! cover a whole group of hosts.  Each run compares the resolved commands
//! against the fingerprint label on the containers it started earlier and
//! starts, replaces or removes containers until the two agree.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use dns_provision::{Config, DesiredStateBuilder, DockerRuntime, HickoryTxtResolver, Reconciler};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Config::default().validate()?;
//!     let desired = DesiredStateBuilder::from_settings(HickoryTxtResolver::from_system_conf()?, &settings);
//!     let runtime = DockerRuntime::new(settings.docker_cmd.clone(), settings.label.clone());
//!     let report = Reconciler::new(desired, runtime).run().await;
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod desired;
pub mod error;
pub mod inspect;
pub mod reconcile;
pub mod resolver;
pub mod runtime;
pub mod types;

pub use config::{Args, Config, Settings};
pub use desired::DesiredStateBuilder;
pub use error::{FingerprintError, LookupError, ProvisionError, RuntimeError};
pub use inspect::AppliedState;
pub use reconcile::Reconciler;
pub use resolver::{HickoryTxtResolver, SuffixWalker, TxtResolver, WalkMode};
pub use runtime::{ContainerRuntime, DockerRuntime};
pub use types::{DesiredCommand, Fingerprint, Outcome, ReconcileReport};
