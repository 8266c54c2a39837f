use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;

use super::command::{CommandRunner, ProcessRunner};
use super::ContainerRuntime;
use crate::error::RuntimeError;
use crate::types::Fingerprint;

/// Printed by `docker inspect -f '{{index ...}}'` when the label is missing.
const NO_VALUE: &str = "<no value>";

/// Drives the `docker` CLI (or any compatible executable such as `podman`).
pub struct DockerRuntime<E = ProcessRunner> {
    docker_cmd: PathBuf,
    label: String,
    runner: E,
}

impl DockerRuntime<ProcessRunner> {
    pub fn new(docker_cmd: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self::with_runner(docker_cmd, label, ProcessRunner)
    }
}

impl<E: CommandRunner> DockerRuntime<E> {
    pub fn with_runner(docker_cmd: impl Into<PathBuf>, label: impl Into<String>, runner: E) -> Self {
        Self {
            docker_cmd: docker_cmd.into(),
            label: label.into(),
            runner,
        }
    }

    async fn exec(&self, op: &'static str, args: Vec<String>) -> Result<String, RuntimeError> {
        debug!("Running {} {:?}", self.docker_cmd.display(), args);
        let output = self
            .runner
            .output(&self.docker_cmd, &args)
            .await
            .map_err(|source| RuntimeError::Spawn { op, source })?;

        if output.success {
            Ok(output.stdout)
        } else {
            Err(RuntimeError::Failed {
                op,
                status: output.status,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl<E: CommandRunner> ContainerRuntime for DockerRuntime<E> {
    async fn list_managed(&self) -> Result<Vec<String>, RuntimeError> {
        let args = vec![
            "ps".to_string(),
            "-a".to_string(),
            "--format".to_string(),
            "{{ .Names }}".to_string(),
            "-f".to_string(),
            format!("label={}", self.label),
        ];
        let stdout = self.exec("ps", args).await?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn inspect(&self, name: &str) -> Result<Option<String>, RuntimeError> {
        let args = vec![
            "inspect".to_string(),
            "-f".to_string(),
            format!("{{{{index .Config.Labels \"{}\"}}}}", self.label),
            name.to_string(),
        ];
        let stdout = self.exec("inspect", args).await?;
        let value = stdout.trim();
        if value.is_empty() || value == NO_VALUE {
            Ok(None)
        } else {
            Ok(Some(value.to_string()))
        }
    }

    async fn run(&self, name: &str, fingerprint: &Fingerprint, args: &[String]) -> Result<(), RuntimeError> {
        let mut argv = vec![
            "run".to_string(),
            "-d".to_string(),
            "--name".to_string(),
            name.to_string(),
            "--label".to_string(),
            format!("{}={}", self.label, fingerprint),
        ];
        argv.extend(args.iter().cloned());
        self.exec("run", argv).await.map(|_| ())
    }

    async fn kill(&self, name: &str) -> Result<(), RuntimeError> {
        self.exec("kill", vec!["kill".to_string(), name.to_string()])
            .await
            .map(|_| ())
    }

    async fn remove(&self, name: &str) -> Result<(), RuntimeError> {
        self.exec("rm", vec!["rm".to_string(), name.to_string()])
            .await
            .map(|_| ())
    }
}
