use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tetris_gym_env::EnvConfig;
use tracing::Level;
use tracing_subscriber::prelude::*;

use crate::util;

use self::{play::PlayArg, rollout::RolloutArg};

mod play;
mod rollout;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
    #[clap(flatten)]
    global: GlobalArg,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GlobalArg {
    /// Increase log verbosity on stderr (-v = INFO, -vv = DEBUG, -vvv = TRACE)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Environment configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Seed for the piece sequence (and the agent, where there is one)
    #[arg(long, global = true)]
    seed: Option<u64>,
}

impl GlobalArg {
    pub(crate) fn env_config(&self) -> anyhow::Result<EnvConfig> {
        let Some(path) = &self.config else {
            return Ok(EnvConfig::default());
        };
        let config = util::read_json_file::<EnvConfig, _>("config", path)?;
        config
            .board
            .validate()
            .with_context(|| format!("Invalid board in config file: {}", path.display()))?;
        Ok(config)
    }

    pub(crate) fn seed(&self) -> Option<u64> {
        self.seed
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play interactively in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Run episodes with a uniformly random agent and report statistics
    Rollout(#[clap(flatten)] RolloutArg),
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.global.verbose);

    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&args.global, &arg)?,
        Mode::Rollout(arg) => rollout::run(&args.global, &arg)?,
    }
    Ok(())
}
