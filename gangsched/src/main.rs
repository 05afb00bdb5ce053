mod cli;
mod config;
mod kube_api;

use anyhow::Context;
use clap::Parser;
use log::info;

use cli::{Cli, Commands};
use config::Config;
use gangsched_core::{run, StdNodeRng};
use kube_api::KubeClusterApi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::PrintConfig { config } => {
            let cfg = Config::load(config)?;
            println!("{}", serde_yaml::to_string(&cfg_debug(&cfg))?);
        }
        Commands::Run { config } => {
            let cfg = Config::load(config).context("failed to load config")?;
            info!("starting gangsched as {:?}", cfg.scheduler_name);

            let api = KubeClusterApi::connect(cfg.cluster.kubeconfig.as_deref())
                .await
                .context("failed to connect to cluster")?;
            let mut rng = StdNodeRng::from_os_entropy();

            run(&api, &mut rng, &cfg.scheduler_name, &cfg.group_annotation)
                .await
                .context("scheduling loop exited with an error")?;
        }
    }

    Ok(())
}

/// `Config` isn't `Serialize` (it's loaded, never re-emitted as input), so
/// `print-config` reports it through a small mirror struct instead.
fn cfg_debug(cfg: &Config) -> serde_json::Value {
    serde_json::json!({
        "schedulerName": cfg.scheduler_name,
        "groupAnnotation": cfg.group_annotation,
        "priorityAnnotation": cfg.priority_annotation,
        "cluster": {
            "kubeconfig": cfg.cluster.kubeconfig,
        },
    })
}
