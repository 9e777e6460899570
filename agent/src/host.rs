//! Cooperative move selection on a tokio runtime.
//!
//! The search runs on the same thread as everything else the host does, so it
//! hands control back to the scheduler after every chunk of simulations.

use games_connect4::Board;
use mcts::{BotError, Evaluator, MoveDecision, SearchProgress, StrongBot};
use tracing::{debug, trace};

/// Select a move, yielding to the runtime between search chunks.
///
/// Behaves like [`StrongBot::select_move`] but never blocks the executor for
/// longer than one chunk.
pub async fn select_move_cooperative<E: Evaluator>(
    bot: &mut StrongBot<E>,
    board: &Board,
    legal: &[u8],
    budget: u32,
) -> Result<u8, BotError> {
    let mut pending = match bot.begin_search(board, legal, budget)? {
        MoveDecision::Immediate(column) => return Ok(column),
        MoveDecision::Search(pending) => pending,
    };

    let mut chunks = 0u32;
    loop {
        match pending.step() {
            SearchProgress::Pending { completed, budget } => {
                chunks += 1;
                trace!(completed, budget, "Yielding between search chunks");
                tokio::task::yield_now().await;
            }
            SearchProgress::Complete => break,
        }
    }

    debug!(chunks, simulations = pending.stats().simulations, "Search finished");
    Ok(pending.finish()?.action)
}
