//! Match play: the bot against a random mover or against itself.
//!
//! Results are only tallied in memory and logged.

use anyhow::{anyhow, Context, Result};
use games_connect4::{Board, Player};
use mcts::{MctsConfig, StrongBot};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::host::select_move_cooperative;

/// Who the bot plays against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opponent {
    /// Uniformly random legal moves.
    Random,
    /// A second bot with its own tree and seed.
    SelfPlay,
}

impl FromStr for Opponent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Opponent::Random),
            "self" | "self-play" | "selfplay" => Ok(Opponent::SelfPlay),
            other => Err(anyhow!(
                "invalid opponent '{other}', expected 'random' or 'self'"
            )),
        }
    }
}

impl fmt::Display for Opponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opponent::Random => write!(f, "random"),
            Opponent::SelfPlay => write!(f, "self"),
        }
    }
}

/// One side of the board.
pub enum Seat {
    Bot(Box<StrongBot>),
    Random(ChaCha20Rng),
}

impl Seat {
    pub fn bot(config: MctsConfig, player: Player, seed: Option<u64>) -> Self {
        let bot = match seed {
            Some(seed) => StrongBot::with_seed(config, player, seed),
            None => StrongBot::new(config, player),
        };
        Seat::Bot(Box::new(bot))
    }

    pub fn random(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Seat::Random(rng)
    }

    async fn choose(&mut self, board: &Board, legal: &[u8], budget: u32) -> Result<u8> {
        match self {
            Seat::Bot(bot) => Ok(select_move_cooperative(&mut **bot, board, legal, budget).await?),
            Seat::Random(rng) => legal
                .choose(rng)
                .copied()
                .ok_or_else(|| anyhow!("no legal moves for random player")),
        }
    }
}

/// A finished game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub moves: Vec<u8>,
    pub winner: Option<Player>,
    pub board: Board,
}

/// Play one game from the empty board, Red moving first.
pub async fn play_game(red: &mut Seat, yellow: &mut Seat, budget: u32) -> Result<GameRecord> {
    let mut board = Board::new();
    let mut moves = Vec::new();
    let mut to_move = Player::Red;

    loop {
        let legal = board.legal_moves();
        let seat = match to_move {
            Player::Red => &mut *red,
            Player::Yellow => &mut *yellow,
        };
        let column = seat.choose(&board, &legal, budget).await?;
        let row = board
            .apply_move(column, to_move)
            .with_context(|| format!("{to_move} chose column {column}"))?;
        moves.push(column);
        debug!(player = %to_move, column, ply = moves.len(), "Move played");

        if board.wins_at(column as usize, row) {
            return Ok(GameRecord {
                moves,
                winner: Some(to_move),
                board,
            });
        }
        if board.is_full() {
            return Ok(GameRecord {
                moves,
                winner: None,
                board,
            });
        }
        to_move = to_move.opponent();
    }
}

/// Win/loss/draw counts from the bot's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchTally {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl MatchTally {
    pub fn record(&mut self, winner: Option<Player>, bot: Player) {
        match winner {
            Some(p) if p == bot => self.wins += 1,
            Some(_) => self.losses += 1,
            None => self.draws += 1,
        }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

impl fmt::Display for MatchTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{} L{} D{}", self.wins, self.losses, self.draws)
    }
}

/// Everything a match needs, resolved from the CLI.
#[derive(Debug, Clone)]
pub struct MatchSettings {
    pub mcts: MctsConfig,
    pub player: Player,
    pub opponent: Opponent,
    pub games: u32,
    pub seed: Option<u64>,
}

/// Play `settings.games` games and tally them for the bot on `settings.player`.
///
/// Both seats persist across games so bots keep their trees warm.
pub async fn run_match(settings: &MatchSettings) -> Result<MatchTally> {
    let budget = settings.mcts.num_simulations;
    let other_seed = settings.seed.map(|s| s.wrapping_add(1));

    let mut ours = Seat::bot(settings.mcts.clone(), settings.player, settings.seed);
    let mut theirs = match settings.opponent {
        Opponent::Random => Seat::random(other_seed),
        Opponent::SelfPlay => Seat::bot(
            settings.mcts.clone(),
            settings.player.opponent(),
            other_seed,
        ),
    };

    let mut tally = MatchTally::default();
    for game in 1..=settings.games {
        let record = match settings.player {
            Player::Red => play_game(&mut ours, &mut theirs, budget).await?,
            Player::Yellow => play_game(&mut theirs, &mut ours, budget).await?,
        };
        tally.record(record.winner, settings.player);

        let result = match record.winner {
            Some(p) => format!("{p} wins"),
            None => "draw".to_string(),
        };
        info!(
            game,
            plies = record.moves.len(),
            result = %result,
            tally = %tally,
            "Game finished"
        );
        if let Seat::Bot(bot) = &ours {
            debug!(
                game,
                tree_nodes = bot.tree_len(),
                cache_entries = bot.cache_len(),
                cache_clears = bot.cache_clears(),
                "Bot search state"
            );
        }
    }

    Ok(tally)
}
