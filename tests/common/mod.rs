//! Shared test infrastructure: an in-memory TXT zone and an in-memory
//! container runtime that both record what was asked of them.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use dns_provision::{
    ContainerRuntime, DesiredStateBuilder, Fingerprint, LookupError, Reconciler, RuntimeError,
    TxtResolver,
};

// --- Constants ---

pub const PREFIX: &str = "containers.docker";
pub const HOSTNAME: &str = "web1.prod.example.com";

// --- FakeZone ---

/// TXT records keyed by name.  Clones share the same records and query log.
#[derive(Clone, Default)]
pub struct FakeZone {
    records: Arc<Mutex<HashMap<String, Vec<String>>>>,
    broken: Arc<Mutex<HashSet<String>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeZone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_txt(self, name: &str, values: &[&str]) -> Self {
        self.set_txt(name, values);
        self
    }

    /// Lookups of `name` fail with a transport error.
    pub fn with_failure(self, name: &str) -> Self {
        self.broken.lock().unwrap().insert(name.to_string());
        self
    }

    pub fn set_txt(&self, name: &str, values: &[&str]) {
        self.records.lock().unwrap().insert(
            name.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
    }

    pub fn delete(&self, name: &str) {
        self.records.lock().unwrap().remove(name);
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn clear_queries(&self) {
        self.queries.lock().unwrap().clear();
    }
}

#[async_trait]
impl TxtResolver for FakeZone {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, LookupError> {
        self.queries.lock().unwrap().push(name.to_string());
        if self.broken.lock().unwrap().contains(name) {
            return Err(LookupError::Transport {
                name: name.to_string(),
                reason: "timed out".to_string(),
            });
        }
        self.records
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }
}

// --- FakeRuntime ---

/// A runtime call as the reconciler issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Run {
        name: String,
        fingerprint: String,
        args: Vec<String>,
    },
    Kill(String),
    Remove(String),
}

/// Containers by name, with their ownership label if any.  Behaves like the
/// docker CLI: `run` refuses an existing name, `kill`/`rm`/`inspect` fail
/// for unknown names.
#[derive(Clone, Default)]
pub struct FakeRuntime {
    containers: Arc<Mutex<BTreeMap<String, Option<String>>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    failing_runs: Arc<Mutex<HashSet<String>>>,
    failing_kills: Arc<Mutex<HashSet<String>>>,
    failing_removes: Arc<Mutex<HashSet<String>>>,
    list_broken: Arc<Mutex<bool>>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// A container previously started by us with `command`.
    pub fn with_managed(self, name: &str, command: &str) -> Self {
        self.containers.lock().unwrap().insert(
            name.to_string(),
            Some(Fingerprint::encode(command).as_str().to_string()),
        );
        self
    }

    /// A container started by someone else.
    pub fn with_foreign(self, name: &str) -> Self {
        self.containers.lock().unwrap().insert(name.to_string(), None);
        self
    }

    pub fn with_failing_run(self, name: &str) -> Self {
        self.failing_runs.lock().unwrap().insert(name.to_string());
        self
    }

    /// `kill` of `name` fails even though the container exists.
    pub fn with_failing_kill(self, name: &str) -> Self {
        self.failing_kills.lock().unwrap().insert(name.to_string());
        self
    }

    /// `rm` of `name` fails and the container stays behind.
    pub fn with_failing_remove(self, name: &str) -> Self {
        self.failing_removes.lock().unwrap().insert(name.to_string());
        self
    }

    pub fn with_broken_list(self) -> Self {
        *self.list_broken.lock().unwrap() = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn label_of(&self, name: &str) -> Option<String> {
        self.containers.lock().unwrap().get(name).cloned().flatten()
    }

    pub fn names(&self) -> Vec<String> {
        self.containers.lock().unwrap().keys().cloned().collect()
    }

    fn no_such(op: &'static str, name: &str) -> RuntimeError {
        RuntimeError::Failed {
            op,
            status: Some(1),
            stderr: format!("Error: No such container: {}", name),
        }
    }
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn list_managed(&self) -> Result<Vec<String>, RuntimeError> {
        if *self.list_broken.lock().unwrap() {
            return Err(RuntimeError::Failed {
                op: "ps",
                status: Some(1),
                stderr: "Cannot connect to the Docker daemon".to_string(),
            });
        }
        Ok(self
            .containers
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, label)| label.is_some())
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn inspect(&self, name: &str) -> Result<Option<String>, RuntimeError> {
        self.containers
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| Self::no_such("inspect", name))
    }

    async fn run(&self, name: &str, fingerprint: &Fingerprint, args: &[String]) -> Result<(), RuntimeError> {
        self.calls.lock().unwrap().push(Call::Run {
            name: name.to_string(),
            fingerprint: fingerprint.as_str().to_string(),
            args: args.to_vec(),
        });
        if self.failing_runs.lock().unwrap().contains(name) {
            return Err(RuntimeError::Failed {
                op: "run",
                status: Some(125),
                stderr: "Unable to find image".to_string(),
            });
        }
        let mut containers = self.containers.lock().unwrap();
        if containers.contains_key(name) {
            return Err(RuntimeError::Failed {
                op: "run",
                status: Some(125),
                stderr: format!("Conflict. The container name \"/{}\" is already in use", name),
            });
        }
        containers.insert(name.to_string(), Some(fingerprint.as_str().to_string()));
        Ok(())
    }

    async fn kill(&self, name: &str) -> Result<(), RuntimeError> {
        self.calls.lock().unwrap().push(Call::Kill(name.to_string()));
        if self.failing_kills.lock().unwrap().contains(name) {
            return Err(RuntimeError::Failed {
                op: "kill",
                status: Some(1),
                stderr: format!("Error response from daemon: cannot kill container: {}", name),
            });
        }
        if self.containers.lock().unwrap().contains_key(name) {
            Ok(())
        } else {
            Err(Self::no_such("kill", name))
        }
    }

    async fn remove(&self, name: &str) -> Result<(), RuntimeError> {
        self.calls.lock().unwrap().push(Call::Remove(name.to_string()));
        if self.failing_removes.lock().unwrap().contains(name) {
            return Err(RuntimeError::Failed {
                op: "rm",
                status: Some(1),
                stderr: format!("Error response from daemon: cannot remove container {}", name),
            });
        }
        match self.containers.lock().unwrap().remove(name) {
            Some(_) => Ok(()),
            None => Err(Self::no_such("rm", name)),
        }
    }
}

// --- Helpers ---

pub fn reconciler(zone: &FakeZone, runtime: &FakeRuntime, inherit: bool) -> Reconciler<FakeZone, FakeRuntime> {
    let desired = DesiredStateBuilder::new(zone.clone(), PREFIX, HOSTNAME, inherit);
    Reconciler::new(desired, runtime.clone())
}

pub fn run_call(name: &str, command: &str, args: &[&str]) -> Call {
    Call::Run {
        name: name.to_string(),
        fingerprint: Fingerprint::encode(command).as_str().to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
    }
}
