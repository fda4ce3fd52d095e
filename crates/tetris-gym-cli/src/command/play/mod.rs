use tetris_gym_engine::{Board, PieceSeed};

use crate::{command::GlobalArg, tui::Tui};

use self::app::PlayApp;

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Hide the landing preview of the falling piece
    #[clap(long)]
    no_ghost: bool,
}

pub(crate) fn run(global: &GlobalArg, arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { no_ghost } = arg;

    let config = global.env_config()?;
    let board = match global.seed() {
        Some(seed) => Board::with_seed(config.board, PieceSeed::from_u64(seed))?,
        None => Board::new(config.board)?,
    };

    let mut app = PlayApp::new(board, !*no_ghost);
    Tui::new().run(&mut app)?;

    let stats = app.board().stats();
    println!(
        "Final score: {} (lines: {}, pieces: {})",
        stats.score(),
        stats.lines_cleared(),
        stats.locked_pieces()
    );
    Ok(())
}
