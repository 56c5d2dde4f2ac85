//! Player abstraction used by the match harness.
//!
//! Every move producer (search engine, random mover, externally driven
//! input) implements `Player` so a game loop can alternate them uniformly.

use crate::errors::ChessResult;
use crate::game_state::board::Board;
use crate::game_state::chess_types::Team;
use crate::moves::chess_move::Move;

pub trait Player: Send {
    fn team(&self) -> Team;

    fn name(&self) -> &str;

    /// Picks a move for `self.team()` on `board`, which is never mutated.
    ///
    /// The returned move is a candidate; the caller validates it by applying
    /// it and may ask again if it turns out to be invalid.
    fn choose_move(&mut self, board: &Board) -> ChessResult<Move>;

    /// Drops any state carried between moves of one game.
    fn new_game(&mut self) {}
}
