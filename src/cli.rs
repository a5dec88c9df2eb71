//! CLI parsing for aliscan

use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "aliscan")]
#[command(about = "Security agent and snapshot audits for Alibaba Cloud ECS", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose tracing output on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report Security Center agent presence for ECS assets
    Agent(commands::agent::Args),

    /// Report automatic snapshot policy coverage for ECS disks
    Snapshot(commands::snapshot::Args),

    /// Audit recent snapshots across regions and write a JSON report
    Backup(commands::backup::Args),
}
