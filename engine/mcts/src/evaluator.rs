//! Evaluator trait for leaf evaluation.
//!
//! The evaluator scores a non-terminal leaf from the point of view of the
//! player to move there. The engine ships a random-rollout evaluator; the
//! trait keeps the search independent of how the estimate is produced.

use games_connect4::{Board, Player, RulesError};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

use crate::node::{DRAW_SCORE, LOSS_SCORE, WIN_SCORE};

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Rollout hit an illegal move: {0}")]
    IllegalMove(#[from] RulesError),

    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),
}

/// Trait for leaf evaluators.
///
/// Implementations could be:
/// - RolloutEvaluator: Random playout to a finished game
/// - Heuristic or learned evaluators plugged in by the host
pub trait Evaluator: Send + Sync {
    /// Score `board` for `to_move`: `WIN_SCORE` means `to_move` wins,
    /// `LOSS_SCORE` means it loses, `DRAW_SCORE` a draw.
    ///
    /// An error makes the current iteration void: nothing is backpropagated.
    fn evaluate(
        &self,
        board: &Board,
        to_move: Player,
        rng: &mut ChaCha20Rng,
    ) -> Result<f32, EvaluatorError>;
}

/// Outcome of a single random playout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolloutOutcome {
    /// Final score for the player to move at the start of the playout
    pub score: f32,

    /// Number of discs dropped during the playout
    pub plies: usize,
}

/// Play uniformly random legal moves, alternating from `to_move`, until a
/// player connects four or the board fills up.
///
/// Works on a private copy; `board` itself is never modified. A playout
/// drops at most one disc per empty cell, so it is bounded by 42 plies.
pub fn rollout(
    board: &Board,
    to_move: Player,
    rng: &mut ChaCha20Rng,
) -> Result<RolloutOutcome, EvaluatorError> {
    let perspective = |winner: Player| {
        if winner == to_move {
            WIN_SCORE
        } else {
            LOSS_SCORE
        }
    };

    if let Some(winner) = board.winner() {
        return Ok(RolloutOutcome {
            score: perspective(winner),
            plies: 0,
        });
    }

    let mut board = board.clone();
    let mut player = to_move;
    let mut plies = 0;

    loop {
        let legal = board.legal_moves();
        let Some(&column) = legal.choose(rng) else {
            return Ok(RolloutOutcome {
                score: DRAW_SCORE,
                plies,
            });
        };

        let row = board.apply_move(column, player)?;
        plies += 1;

        if board.wins_at(column as usize, row) {
            return Ok(RolloutOutcome {
                score: perspective(player),
                plies,
            });
        }
        player = player.opponent();
    }
}

/// Random rollout evaluator that plays random moves to a terminal state.
/// Returns the game outcome as the value estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolloutEvaluator;

impl RolloutEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for RolloutEvaluator {
    fn evaluate(
        &self,
        board: &Board,
        to_move: Player,
        rng: &mut ChaCha20Rng,
    ) -> Result<f32, EvaluatorError> {
        rollout(board, to_move, rng).map(|outcome| outcome.score)
    }
}
