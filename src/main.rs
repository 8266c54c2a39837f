//! dns-provision entry point.
//!
//! One invocation is one reconciliation pass; schedule it on boot or from a
//! timer.  Only configuration errors produce a non-zero exit.

use clap::Parser;
use log::{error, info};

use dns_provision::{
    Args, Config, DesiredStateBuilder, DockerRuntime, HickoryTxtResolver, Reconciler,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let cfg = Config::load(&args)?;

    // Initialize logging; RUST_LOG takes precedence over the configured level
    let env = env_logger::Env::default().default_filter_or(cfg.log_level.as_str());
    env_logger::Builder::from_env(env).init();

    let settings = match cfg.validate() {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };
    info!("Using hostname {}", settings.hostname);

    let resolver = HickoryTxtResolver::from_system_conf()?;
    let desired = DesiredStateBuilder::from_settings(resolver, &settings);
    let runtime = DockerRuntime::new(settings.docker_cmd.clone(), settings.label.clone());

    let report = Reconciler::new(desired, runtime).run().await;
    info!("Reconciliation complete: {}", report);
    Ok(())
}
