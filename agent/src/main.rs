//! Agent - host process for the Connect Four MCTS bot
//!
//! Runs on a single-threaded tokio runtime and drives every search
//! cooperatively, one chunk of simulations at a time.
//!
//! Two modes:
//! 1. `--moves 3,3,4` replays a game prefix and prints the bot's reply
//! 2. Otherwise plays `--games` matches against a random opponent or itself

use anyhow::{bail, Context, Result};
use clap::Parser;
use games_connect4::{Board, Player};
use mcts::StrongBot;
use tracing::info;

mod config;
mod host;
mod play;

use crate::config::Config;
use crate::host::select_move_cooperative;
use crate::play::{run_match, MatchSettings};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

/// Apply `moves` from the empty board, Red first.
fn replay(moves: &[u8]) -> Result<Board> {
    let mut board = Board::new();
    let mut player = Player::Red;
    for (ply, &column) in moves.iter().enumerate() {
        if let Some(winner) = board.winner() {
            bail!("move {} played after {winner} already won", ply + 1);
        }
        board
            .apply_move(column, player)
            .with_context(|| format!("move {} ({player} in column {column})", ply + 1))?;
        player = player.opponent();
    }
    Ok(board)
}

async fn reply_to(config: &Config, moves: &[u8]) -> Result<()> {
    let board = replay(moves)?;
    println!("{board}");

    if let Some(winner) = board.winner() {
        println!("Game over: {winner} wins");
        return Ok(());
    }
    if board.is_full() {
        println!("Game over: draw");
        return Ok(());
    }

    let to_move = board.next_player();
    let mut bot = match config.seed() {
        Some(seed) => StrongBot::with_seed(config.mcts_config(), to_move, seed),
        None => StrongBot::new(config.mcts_config(), to_move),
    };

    let legal = board.legal_moves();
    let column = select_move_cooperative(&mut bot, &board, &legal, config.simulations).await?;
    info!(player = %to_move, column, "Bot reply");

    let after = board.with_move(column, to_move)?;
    println!("{to_move} plays column {column}");
    println!("{after}");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Validate configuration
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    if let Some(moves) = config.parsed_moves()? {
        return reply_to(&config, &moves).await;
    }

    let settings = MatchSettings {
        mcts: config.mcts_config(),
        player: config.agent_player()?,
        opponent: config.opponent()?,
        games: config.games,
        seed: config.seed(),
    };
    info!(
        player = %settings.player,
        opponent = %settings.opponent,
        games = settings.games,
        simulations = settings.mcts.num_simulations,
        "Starting match"
    );

    let tally = run_match(&settings).await?;
    info!(
        wins = tally.wins,
        losses = tally.losses,
        draws = tally.draws,
        "Match complete"
    );
    println!("{tally}");

    Ok(())
}
