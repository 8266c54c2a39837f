use std::path::PathBuf;

use clap::Parser;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::ProvisionError;

/// Provision docker containers from DNS TXT records keyed by this host's name.
#[derive(Parser, Debug, Default, Serialize)]
#[command(name = "dns-provision", version, about, long_about = None)]
pub struct Args {
    /// Prefixed name for DNS configuration records. Prepended to the hostname.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_prefix: Option<String>,

    /// Hostname to query as. Defaults to the system hostname.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Path to the docker command.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_cmd: Option<String>,

    /// Merge the declared container list from every domain suffix.
    #[arg(long)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub inheritance: bool,

    /// Logging level or env_logger filter.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Container label holding the applied command fingerprint.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Additional TOML configuration file.
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    pub dns_prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub docker_cmd: String,
    pub inheritance: bool,
    pub log_level: String,
    pub label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dns_prefix: "containers.docker".into(),
            hostname: None,
            docker_cmd: "docker".into(),
            inheritance: false,
            log_level: "info".into(),
            label: "docker-dns-provision.command".into(),
        }
    }
}

/// Validated configuration handed to the resolver and runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub prefix: String,
    pub hostname: String,
    pub docker_cmd: PathBuf,
    pub inheritance: bool,
    pub label: String,
}

impl Config {
    /// Layered sources, lowest precedence first: defaults, `dns-provision.toml`,
    /// `dns-provision.json`, `--config`, `DNS_PROVISION_*`, then flags.
    pub fn figment(args: &Args) -> Result<Figment, ProvisionError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("dns-provision.toml"))
            .merge(Json::file("dns-provision.json"));

        if let Some(path) = &args.config {
            if !path.is_file() {
                return Err(ProvisionError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment
            .merge(Env::prefixed("DNS_PROVISION_"))
            .merge(Serialized::defaults(args)))
    }

    pub fn load(args: &Args) -> anyhow::Result<Self> {
        Self::figment(args)?
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
    }

    /// Resolve the runtime executable and hostname.  Either failing makes it
    /// unsafe to reconcile anything.
    pub fn validate(&self) -> Result<Settings, ProvisionError> {
        let prefix = self.dns_prefix.trim_matches('.').to_string();
        if prefix.is_empty() {
            return Err(ProvisionError::Config("dns_prefix must not be empty".into()));
        }
        if self.label.is_empty() || self.label.contains('=') {
            return Err(ProvisionError::Config(format!(
                "invalid container label {:?}",
                self.label
            )));
        }

        let docker_cmd =
            which::which(&self.docker_cmd).map_err(|source| ProvisionError::RuntimeNotExecutable {
                cmd: self.docker_cmd.clone(),
                source,
            })?;

        let hostname = match self.hostname.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => system_hostname()?,
        };

        Ok(Settings {
            prefix,
            hostname,
            docker_cmd,
            inheritance: self.inheritance,
            label: self.label.clone(),
        })
    }
}

fn system_hostname() -> Result<String, ProvisionError> {
    let name = hostname::get()
        .map_err(|e| ProvisionError::Hostname(e.to_string()))?
        .into_string()
        .map_err(|raw| ProvisionError::Hostname(format!("{:?} is not valid UTF-8", raw)))?;
    if name.is_empty() {
        return Err(ProvisionError::Hostname("system hostname is empty".into()));
    }
    Ok(name)
}
