use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;
use tetris_gym_engine::{GameStats, PieceSeed};
use tetris_gym_env::{Action, EnvConfig, TetrisEnv};

use crate::{command::GlobalArg, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RolloutArg {
    /// Number of episodes to run
    #[clap(long, short = 'n', default_value_t = 10)]
    episodes: usize,
    /// Override the step limit from the config (0 disables truncation)
    #[clap(long)]
    max_steps: Option<u64>,
    /// Print each final board to stderr
    #[clap(long)]
    show_final_board: bool,
    /// Write the JSON report to this file instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct RolloutReport {
    started_at: DateTime<Utc>,
    seed: u64,
    config: EnvConfig,
    episodes: Vec<EpisodeReport>,
    summary: Summary,
}

#[derive(Debug, Clone, Serialize)]
struct EpisodeReport {
    steps: u64,
    total_reward: i64,
    terminated: bool,
    truncated: bool,
    stats: GameStats,
}

#[derive(Debug, Clone, Default, Serialize)]
struct Summary {
    episodes: usize,
    terminated: usize,
    truncated: usize,
    mean_steps: f64,
    mean_reward: f64,
    mean_score: f64,
    mean_lines: f64,
    best_score: u64,
}

impl Summary {
    #[expect(clippy::cast_precision_loss)]
    fn from_episodes(episodes: &[EpisodeReport]) -> Self {
        if episodes.is_empty() {
            return Self::default();
        }
        let n = episodes.len() as f64;
        let mean = |f: fn(&EpisodeReport) -> f64| episodes.iter().map(f).sum::<f64>() / n;
        Self {
            episodes: episodes.len(),
            terminated: episodes.iter().filter(|e| e.terminated).count(),
            truncated: episodes.iter().filter(|e| e.truncated).count(),
            mean_steps: mean(|e| e.steps as f64),
            mean_reward: mean(|e| e.total_reward as f64),
            mean_score: mean(|e| e.stats.score() as f64),
            mean_lines: mean(|e| e.stats.lines_cleared() as f64),
            best_score: episodes.iter().map(|e| e.stats.score()).max().unwrap_or(0),
        }
    }
}

/// Plays one episode to termination or truncation with uniformly random actions.
fn run_episode(env: &mut TetrisEnv, agent: &mut Pcg32) -> EpisodeReport {
    let mut total_reward = 0;
    loop {
        let action: Action = agent.random();
        let step = env.step(action);
        total_reward += step.reward;
        if step.is_done() {
            return EpisodeReport {
                steps: env.elapsed_steps(),
                total_reward,
                terminated: step.terminated,
                truncated: step.truncated,
                stats: env.board().stats().clone(),
            };
        }
    }
}

pub(crate) fn run(global: &GlobalArg, arg: &RolloutArg) -> anyhow::Result<()> {
    let RolloutArg {
        episodes,
        max_steps,
        show_final_board,
        output,
    } = arg;

    let mut config = global.env_config()?;
    if let Some(max_steps) = *max_steps {
        config.max_episode_steps = (max_steps > 0).then_some(max_steps);
    }
    let seed = global.seed().unwrap_or_else(|| rand::rng().random());
    let mut master = Pcg32::seed_from_u64(seed);
    let piece_seed: PieceSeed = master.random();
    let mut agent = Pcg32::from_rng(&mut master);

    let started_at = Utc::now();
    tracing::info!(seed, episodes, "starting rollout");

    let mut env = TetrisEnv::with_seed(config, piece_seed)?;
    let mut reports = Vec::with_capacity(*episodes);
    for episode in 0..*episodes {
        env.reset(None);
        let report = run_episode(&mut env, &mut agent);
        tracing::info!(
            episode,
            steps = report.steps,
            reward = report.total_reward,
            score = report.stats.score(),
            lines = report.stats.lines_cleared(),
            truncated = report.truncated,
            "episode finished"
        );
        if *show_final_board {
            eprintln!("episode {episode}:");
            eprint!("{}", env.render_framed());
        }
        reports.push(report);
    }

    let report = RolloutReport {
        started_at,
        seed,
        config,
        summary: Summary::from_episodes(&reports),
        episodes: reports,
    };
    Output::save_json(&report, output.clone())?;
    Ok(())
}
