use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gangsched", version, about = "Gang-aware scheduler CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the scheduling loop against the configured cluster.
    Run {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Load and print the effective configuration, then exit.
    PrintConfig {
        #[arg(short, long)]
        config: PathBuf,
    },
}
